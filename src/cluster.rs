//! # Clustering Primitive Trait
//!
//! The density-based clustering algorithm is an external collaborator.
//! This trait is the whole contract between the radius search and it:
//!
//! ```text
//! cluster(points, method, radius, min_neighbors) -> [label; points.len()]
//! ```
//!
//! One label per input row, in input order. A label is a non-negative
//! cluster id or noise. Calls share no state; the search may call the
//! primitive many times with the same points and a shrinking radius.
//!
//! Errors from the primitive are carried unmodified as the source of
//! [`Error::Primitive`](crate::Error::Primitive).

use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use crate::model::{ClusterLabel, FeatureTable};

// ============================================================================
// Parameters
// ============================================================================

/// Which density-clustering method the primitive should run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClusterMethod {
    #[default]
    Dbscan,
    Optics,
}

impl std::fmt::Display for ClusterMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClusterMethod::Dbscan => f.write_str("dbscan"),
            ClusterMethod::Optics => f.write_str("optics"),
        }
    }
}

/// Arguments of one primitive call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusterParams {
    pub method: ClusterMethod,
    /// Neighborhood radius (eps).
    pub radius: f64,
    /// Minimum neighborhood size for a core point.
    pub min_neighbors: usize,
}

// ============================================================================
// Clusterer trait
// ============================================================================

/// A blocking, stateless density-clustering primitive.
pub trait Clusterer {
    /// Failure type of the primitive.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Label every row of `points`.
    fn cluster(
        &self,
        points: &FeatureTable,
        params: &ClusterParams,
    ) -> std::result::Result<Vec<ClusterLabel>, Self::Error>;
}

impl<C: Clusterer + ?Sized> Clusterer for &C {
    type Error = C::Error;

    fn cluster(
        &self,
        points: &FeatureTable,
        params: &ClusterParams,
    ) -> std::result::Result<Vec<ClusterLabel>, Self::Error> {
        (**self).cluster(points, params)
    }
}

// ============================================================================
// Closure adapter
// ============================================================================

/// Adapts a closure into a [`Clusterer`]. Build one with [`clusterer_fn`].
pub struct FnClusterer<F, E> {
    f: F,
    _error: PhantomData<fn() -> E>,
}

impl<F: Clone, E> Clone for FnClusterer<F, E> {
    fn clone(&self) -> Self {
        Self { f: self.f.clone(), _error: PhantomData }
    }
}

impl<F, E> std::fmt::Debug for FnClusterer<F, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnClusterer").finish_non_exhaustive()
    }
}

impl<F, E> Clusterer for FnClusterer<F, E>
where
    F: Fn(&FeatureTable, &ClusterParams) -> std::result::Result<Vec<ClusterLabel>, E>,
    E: std::error::Error + Send + Sync + 'static,
{
    type Error = E;

    fn cluster(
        &self,
        points: &FeatureTable,
        params: &ClusterParams,
    ) -> std::result::Result<Vec<ClusterLabel>, E> {
        (self.f)(points, params)
    }
}

/// Wrap a closure as a clustering primitive.
///
/// ```
/// use banquet::cluster::{clusterer_fn, Clusterer, ClusterParams, ClusterMethod};
/// use banquet::{ClusterLabel, FeatureTable};
///
/// let all_noise = clusterer_fn(|points: &FeatureTable, _: &ClusterParams| {
///     Ok::<_, std::convert::Infallible>(vec![ClusterLabel::Noise; points.len()])
/// });
/// let points = FeatureTable::new(["x"]).with_row("a", &[0.0]).unwrap();
/// let params = ClusterParams { method: ClusterMethod::Dbscan, radius: 0.1, min_neighbors: 2 };
/// assert_eq!(all_noise.cluster(&points, &params).unwrap(), vec![ClusterLabel::Noise]);
/// ```
pub fn clusterer_fn<F, E>(f: F) -> FnClusterer<F, E>
where
    F: Fn(&FeatureTable, &ClusterParams) -> std::result::Result<Vec<ClusterLabel>, E>,
    E: std::error::Error + Send + Sync + 'static,
{
    FnClusterer { f, _error: PhantomData }
}
