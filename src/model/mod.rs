//! # Seating Model
//!
//! Plain data shared by every stage of the pipeline: feature tables,
//! identifiers, cluster labels, seatings and metrics records.
//!
//! Design rule: this module is pure data. No clustering, no I/O, no state.

pub mod id;
pub mod feature;
pub mod distance;
pub mod bounds;
pub mod label;
pub mod record;

pub use id::ItemId;
pub use feature::FeatureTable;
pub use distance::{DistanceMatrix, euclidean_distance, euclidean_distance_squared};
pub use bounds::{AxisBounds, FeatureBounds};
pub use label::{ClusterLabel, Seat, Tabling};
pub use record::MetricsRecord;
