//! Metrics record: guest-sharing statistics for one threshold.

use serde::{Deserialize, Serialize};

/// Guest-sharing statistics of an accepted seating, keyed by threshold `d`.
///
/// All ratios lie in `[0, 1]`; `guest_sharing_differential` in `[-1, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsRecord {
    /// Guest distance threshold the seating was computed at.
    pub d: f64,
    pub tableable_percentage: f64,
    pub noise_percentage: f64,
    pub intra_table_sharing_ratio: f64,
    pub inter_table_sharing_ratio: f64,
    pub guest_sharing_differential: f64,
    pub overlap_coefficient: f64,
    pub jaccard_index: f64,
    pub unique_vs_shared_guests: f64,
}

impl MetricsRecord {
    /// Metric column names, excluding `d`, in export order.
    pub const COLUMNS: [&'static str; 8] = [
        "tableable_percentage",
        "noise_percentage",
        "intra_table_sharing_ratio",
        "inter_table_sharing_ratio",
        "guest_sharing_differential",
        "overlap_coefficient",
        "jaccard_index",
        "unique_vs_shared_guests",
    ];

    /// Metric values in `COLUMNS` order.
    pub fn values(&self) -> [f64; 8] {
        [
            self.tableable_percentage,
            self.noise_percentage,
            self.intra_table_sharing_ratio,
            self.inter_table_sharing_ratio,
            self.guest_sharing_differential,
            self.overlap_coefficient,
            self.jaccard_index,
            self.unique_vs_shared_guests,
        ]
    }

    /// `(name, value)` pairs, excluding `d`.
    pub fn columns(&self) -> impl Iterator<Item = (&'static str, f64)> {
        Self::COLUMNS.into_iter().zip(self.values())
    }

    /// Value of a metric column by name.
    pub fn get(&self, column: &str) -> Option<f64> {
        self.columns().find(|(name, _)| *name == column).map(|(_, v)| v)
    }
}
