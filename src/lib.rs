//! # banquet: Banquet Table constrained clustering
//!
//! Seats a collection of feature vectors ("attendees") at tables (clusters)
//! so that any two attendees at the same table share at least one nearby
//! reference item ("guest").
//!
//! ## Pipeline
//!
//! ```text
//! attendees + guests + d
//!   → GuestRelation      guests strictly closer than d
//!   → TablemateGraph     attendees sharing a guest
//!   → Classification     lonely / outsider / clustered
//!   → EpsilonSearch      primitive(radius) until every table is a clique
//!   → Tabling            one seat per attendee
//!   → MetricsRecord      guest-sharing statistics
//! ```
//!
//! ## Design Principles
//!
//! 1. **Trait-first**: `Clusterer` is the contract with the external
//!    density-clustering primitive. The crate never implements one.
//! 2. **Index arenas**: every stage addresses attendees and guests by row
//!    index into a `FeatureTable`, never by reference.
//! 3. **Immutable stages**: each stage consumes its inputs and produces a
//!    new value; nothing is updated in place or shared between runs.
//!
//! ## Quick Start
//!
//! ```rust
//! use banquet::{Banquet, FeatureTable, Seat, SearchConfig, ClusterLabel};
//! use banquet::cluster::{clusterer_fn, ClusterParams};
//!
//! # fn main() -> banquet::Result<()> {
//! let attendees = FeatureTable::new(["x"])
//!     .with_row("A1", &[0.0])?
//!     .with_row("A2", &[1.0])?
//!     .with_row("A3", &[2.0])?
//!     .with_row("A4", &[10.0])?;
//! let guests = FeatureTable::new(["x"])
//!     .with_row("R1", &[0.5])?
//!     .with_row("R2", &[1.5])?
//!     .with_row("R3", &[9.5])?;
//!
//! // Any density-clustering primitive; here one that leaves everything unseated.
//! let primitive = clusterer_fn(|points: &FeatureTable, _: &ClusterParams| {
//!     Ok::<_, std::convert::Infallible>(vec![ClusterLabel::Noise; points.len()])
//! });
//!
//! let banquet = Banquet::new(primitive).with_config(SearchConfig::default());
//! let seating = banquet.seat(&attendees, &guests, &["x"], 1.0)?;
//! assert_eq!(seating.tabling.seat_of("A4"), Some(Seat::Outsider));
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod relation;
pub mod graph;
pub mod constraint;
pub mod cluster;
pub mod search;
pub mod metrics;
pub mod inflection;
pub mod sweep;
pub mod export;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{
    ItemId, FeatureTable, DistanceMatrix, AxisBounds, FeatureBounds,
    ClusterLabel, Seat, Tabling, MetricsRecord,
};

// ============================================================================
// Re-exports: Pipeline stages
// ============================================================================

pub use relation::GuestRelation;
pub use graph::{TablemateGraph, Classification, AttendeeClass};
pub use constraint::{validate, is_tabling_allowable, Violation};
pub use cluster::{Clusterer, ClusterParams, ClusterMethod};
pub use search::{EpsilonSearch, SearchConfig, SearchState, SearchOutcome};
pub use metrics::compute_metrics;
pub use inflection::{find_inflections, InflectionConfig};

// ============================================================================
// Top-level Banquet handle
// ============================================================================

/// The primary entry point. A `Banquet` wraps a clustering primitive and
/// the search configuration, and seats collections with them.
pub struct Banquet<C: Clusterer> {
    clusterer: C,
    config: SearchConfig,
}

impl<C: Clusterer> Banquet<C> {
    /// Create a Banquet over the given primitive with default search settings.
    pub fn new(clusterer: C) -> Self {
        Self { clusterer, config: SearchConfig::default() }
    }

    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Access the underlying primitive.
    pub fn clusterer(&self) -> &C {
        &self.clusterer
    }

    /// Seat `attendees` against `guests` in the feature space spanned by `axes`.
    ///
    /// Both tables are aligned by axis name first, so they may carry other
    /// columns in any order.
    pub fn seat(
        &self,
        attendees: &FeatureTable,
        guests: &FeatureTable,
        axes: &[&str],
        d: f64,
    ) -> Result<Seating> {
        let attendees = attendees.project(axes)?;
        let guests = guests.project(axes)?;
        self.seat_aligned(&attendees, &guests, d)
    }

    /// Seat two tables whose columns are already the same feature axes.
    pub fn seat_aligned(
        &self,
        attendees: &FeatureTable,
        guests: &FeatureTable,
        d: f64,
    ) -> Result<Seating> {
        // Phase 1: Relation
        let relation = GuestRelation::build(attendees, guests, d)?;

        // Phase 2: Graph + classes
        let graph = TablemateGraph::from_relation(&relation);
        let classification = Classification::classify(&relation, &graph);

        // Phase 3: Search
        let points = attendees.subset(&classification.clustered);
        let outcome = EpsilonSearch::new(
            &self.clusterer,
            &self.config,
            &points,
            &classification.clustered,
            &graph,
        )?
        .run()?;

        // Phase 4: Seat everyone
        let mut seats = vec![Seat::Noise; attendees.len()];
        for &a in &classification.lonely {
            seats[a] = Seat::Lonely;
        }
        for &a in &classification.outsider {
            seats[a] = Seat::Outsider;
        }
        for (&a, label) in classification.clustered.iter().zip(&outcome.labels) {
            seats[a] = Seat::from(*label);
        }
        let tabling = Tabling::new(attendees.ids().to_vec(), seats);

        Ok(Seating {
            relation,
            graph,
            classification,
            tabling,
            radius: outcome.radius,
            iterations: outcome.iterations,
        })
    }

    /// Seat at every threshold and collect one metrics record per threshold.
    pub fn sweep(
        &self,
        attendees: &FeatureTable,
        guests: &FeatureTable,
        axes: &[&str],
        thresholds: &[f64],
    ) -> Result<Vec<MetricsRecord>> {
        sweep::sweep_thresholds(self, attendees, guests, axes, thresholds)
    }
}

/// Everything one seating produced.
#[derive(Debug, Clone)]
pub struct Seating {
    pub relation: GuestRelation,
    pub graph: TablemateGraph,
    pub classification: Classification,
    pub tabling: Tabling,
    /// Radius of the accepted labeling.
    pub radius: f64,
    /// Primitive calls the search made.
    pub iterations: usize,
}

impl Seating {
    /// Guest-sharing metrics of this seating.
    pub fn metrics(&self) -> MetricsRecord {
        compute_metrics(&self.relation, &self.tabling)
    }

    pub fn threshold(&self) -> f64 {
        self.relation.threshold()
    }
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Shape mismatch: attendees have {attendee_axes} feature axes, guests have {guest_axes}")]
    ShapeMismatch { attendee_axes: usize, guest_axes: usize },

    #[error("Unknown feature axis: {0}")]
    UnknownAxis(String),

    #[error("Row '{id}' has {got} values, expected {expected}")]
    RowWidth { id: String, expected: usize, got: usize },

    #[error("Duplicate item id: {0}")]
    DuplicateId(String),

    #[error("Invalid threshold: {0} (must be finite and > 0)")]
    InvalidThreshold(f64),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Clustering primitive returned {got} labels for {expected} points")]
    LabelCount { expected: usize, got: usize },

    #[error("Radius search exhausted at radius {radius} after {iterations} iterations")]
    SearchExhausted { radius: f64, iterations: usize },

    #[error("Clustering primitive failed: {0}")]
    Primitive(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
