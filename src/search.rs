//! # Radius search
//!
//! Runs the clustering primitive at a shrinking radius until the labeling
//! satisfies the Banquet Table constraint.
//!
//! ```text
//!            ┌──────────── invalid: radius -= eps_step ───────────┐
//!            ▼                                                     │
//! Searching { radius = eps0 } ── cluster + validate ──────────────┤
//!            │                                                     │
//!            │ valid                          radius <= floor or   │
//!            ▼                                cap reached          ▼
//!        Accepted                                         SearchExhausted
//! ```
//!
//! ## Known limitation
//!
//! The search is linear and stops at the *first* radius below `eps0` that
//! validates. It assumes a smaller radius never makes the constraint harder
//! to satisfy. Density clustering does not guarantee that, so the accepted
//! radius is the largest valid one reached from `eps0`, not a proven minimum
//! or optimum over all radii.

use serde::{Deserialize, Serialize};

use crate::cluster::{ClusterMethod, ClusterParams, Clusterer};
use crate::constraint;
use crate::graph::TablemateGraph;
use crate::model::{ClusterLabel, FeatureTable};
use crate::{Error, Result};

// ============================================================================
// Configuration
// ============================================================================

/// Default starting radius.
pub const DEFAULT_EPS0: f64 = 0.164;
/// Default radius decrement.
pub const DEFAULT_EPS_STEP: f64 = 0.0001;
/// Default minimum neighborhood size.
pub const DEFAULT_MIN_NEIGHBORS: usize = 2;

/// Parameters of the radius search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Starting radius.
    pub eps0: f64,
    /// Amount the radius shrinks after each rejected labeling.
    pub eps_step: f64,
    /// Density threshold handed to the primitive.
    pub min_neighbors: usize,
    pub method: ClusterMethod,
    /// The search fails once the radius is at or below this value.
    pub radius_floor: f64,
    /// Optional cap on primitive calls.
    pub max_iterations: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            eps0: DEFAULT_EPS0,
            eps_step: DEFAULT_EPS_STEP,
            min_neighbors: DEFAULT_MIN_NEIGHBORS,
            method: ClusterMethod::Dbscan,
            radius_floor: 0.0,
            max_iterations: None,
        }
    }
}

impl SearchConfig {
    pub fn with_eps0(mut self, eps0: f64) -> Self {
        self.eps0 = eps0;
        self
    }

    pub fn with_eps_step(mut self, eps_step: f64) -> Self {
        self.eps_step = eps_step;
        self
    }

    pub fn with_min_neighbors(mut self, min_neighbors: usize) -> Self {
        self.min_neighbors = min_neighbors;
        self
    }

    pub fn with_method(mut self, method: ClusterMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_radius_floor(mut self, floor: f64) -> Self {
        self.radius_floor = floor;
        self
    }

    pub fn with_max_iterations(mut self, cap: usize) -> Self {
        self.max_iterations = Some(cap);
        self
    }

    /// Reject configurations the search cannot run with.
    pub fn validate(&self) -> Result<()> {
        if !(self.eps0.is_finite() && self.eps_step.is_finite() && self.radius_floor.is_finite()) {
            return Err(Error::InvalidConfig("eps0, eps_step and radius_floor must be finite".into()));
        }
        if self.eps_step <= 0.0 {
            return Err(Error::InvalidConfig(format!("eps_step must be > 0, got {}", self.eps_step)));
        }
        if self.eps0 - self.eps_step == self.eps0 {
            return Err(Error::InvalidConfig(format!(
                "eps_step ({}) is too small to change eps0 ({})",
                self.eps_step, self.eps0
            )));
        }
        if self.eps0 <= self.radius_floor {
            return Err(Error::InvalidConfig(format!(
                "eps0 ({}) must exceed radius_floor ({})",
                self.eps0, self.radius_floor
            )));
        }
        if self.min_neighbors == 0 {
            return Err(Error::InvalidConfig("min_neighbors must be >= 1".into()));
        }
        if self.max_iterations == Some(0) {
            return Err(Error::InvalidConfig("max_iterations must be >= 1".into()));
        }
        Ok(())
    }

    /// Radius tried at iteration `k` (0-based).
    ///
    /// Computed from `eps0` each time, so rounding does not accumulate.
    pub fn radius_at(&self, k: usize) -> f64 {
        self.eps0 - k as f64 * self.eps_step
    }

    fn params(&self, radius: f64) -> ClusterParams {
        ClusterParams { method: self.method, radius, min_neighbors: self.min_neighbors }
    }
}

// ============================================================================
// State machine
// ============================================================================

/// Where the search currently is.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchState {
    /// Next primitive call will use `radius`; `iteration` calls made so far.
    Searching { radius: f64, iteration: usize },
    /// Labeling accepted at `radius` after `iterations` primitive calls.
    Accepted { radius: f64, iterations: usize, labels: Vec<ClusterLabel> },
}

/// Result of a successful search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// Radius of the accepted labeling.
    pub radius: f64,
    /// Number of primitive calls made.
    pub iterations: usize,
    /// One label per clustered row, in the order the rows were given.
    pub labels: Vec<ClusterLabel>,
}

/// Radius search over the clustered subset of one collection.
pub struct EpsilonSearch<'a, C: Clusterer> {
    clusterer: &'a C,
    config: &'a SearchConfig,
    /// Feature vectors of the clustered rows.
    points: &'a FeatureTable,
    /// Attendee row of each point.
    rows: &'a [usize],
    graph: &'a TablemateGraph,
    state: SearchState,
}

impl<'a, C: Clusterer> EpsilonSearch<'a, C> {
    /// Prepare a search. `points.row(i)` must be the vector of attendee row `rows[i]`.
    pub fn new(
        clusterer: &'a C,
        config: &'a SearchConfig,
        points: &'a FeatureTable,
        rows: &'a [usize],
        graph: &'a TablemateGraph,
    ) -> Result<Self> {
        config.validate()?;
        debug_assert_eq!(points.len(), rows.len());
        Ok(Self {
            clusterer,
            config,
            points,
            rows,
            graph,
            state: SearchState::Searching { radius: config.eps0, iteration: 0 },
        })
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// Advance one transition. Returns `true` once the state is `Accepted`.
    pub fn step(&mut self) -> Result<bool> {
        let iteration = match self.state {
            SearchState::Accepted { .. } => return Ok(true),
            SearchState::Searching { iteration, .. } => iteration,
        };

        // Nothing to seat: every labeling of zero points is valid.
        if self.points.is_empty() {
            self.state = SearchState::Accepted {
                radius: self.config.eps0,
                iterations: 0,
                labels: Vec::new(),
            };
            return Ok(true);
        }

        let radius = self.config.radius_at(iteration);
        if radius <= self.config.radius_floor
            || self.config.max_iterations.is_some_and(|cap| iteration >= cap)
        {
            tracing::warn!(radius, iterations = iteration, "radius search exhausted");
            return Err(Error::SearchExhausted { radius, iterations: iteration });
        }

        let labels = self
            .clusterer
            .cluster(self.points, &self.config.params(radius))
            .map_err(|e| Error::Primitive(Box::new(e)))?;
        if labels.len() != self.points.len() {
            return Err(Error::LabelCount { expected: self.points.len(), got: labels.len() });
        }

        match constraint::validate(self.rows, &labels, self.graph) {
            None => {
                tracing::info!(
                    radius,
                    iterations = iteration + 1,
                    tables = distinct_tables(&labels),
                    noise = labels.iter().filter(|l| l.is_noise()).count(),
                    "labeling accepted"
                );
                self.state = SearchState::Accepted { radius, iterations: iteration + 1, labels };
                Ok(true)
            }
            Some(violation) => {
                tracing::debug!(radius, iteration, %violation, "labeling rejected");
                self.state = SearchState::Searching {
                    radius: self.config.radius_at(iteration + 1),
                    iteration: iteration + 1,
                };
                Ok(false)
            }
        }
    }

    /// Step until accepted.
    pub fn run(mut self) -> Result<SearchOutcome> {
        loop {
            self.step()?;
            if let SearchState::Accepted { radius, iterations, labels } = self.state {
                return Ok(SearchOutcome { radius, iterations, labels });
            }
        }
    }
}

fn distinct_tables(labels: &[ClusterLabel]) -> usize {
    let mut ids: Vec<u32> = labels.iter().filter_map(|l| l.cluster()).collect();
    ids.sort_unstable();
    ids.dedup();
    ids.len()
}

// ============================================================================
// Tests
// ============================================================================
