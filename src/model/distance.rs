//! # Euclidean distance kernels
//!
//! The guest relation is a threshold over all attendee × guest distances.
//! That is the dominant cost of one seating, so it is computed once, as a
//! single dense matrix, from two row-major slices:
//!
//! ```text
//!            guest 0   guest 1   ...   guest G-1
//! attendee 0 [ d00      d01      ...   d0G ]
//! attendee 1 [ d10      d11      ...   d1G ]
//!    ...
//! ```
//!
//! Rows are attendees, columns are guests. Both tables must share the same
//! axis count; alignment by axis *name* happens earlier, in
//! [`FeatureTable::project`](super::FeatureTable::project).

use super::FeatureTable;
use crate::{Error, Result};

// ============================================================================
// Scalar kernels
// ============================================================================

/// Squared Euclidean distance between two equal-length vectors.
#[inline]
pub fn euclidean_distance_squared(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Euclidean distance between two equal-length vectors.
#[inline]
pub fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    euclidean_distance_squared(a, b).sqrt()
}

// ============================================================================
// Dense pairwise matrix
// ============================================================================

/// Dense `rows × cols` matrix of pairwise Euclidean distances.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl DistanceMatrix {
    /// All distances between rows of `left` and rows of `right`.
    ///
    /// Fails with [`Error::ShapeMismatch`] when the axis counts differ.
    pub fn between(left: &FeatureTable, right: &FeatureTable) -> Result<Self> {
        if left.dim() != right.dim() {
            return Err(Error::ShapeMismatch {
                attendee_axes: left.dim(),
                guest_axes: right.dim(),
            });
        }
        let (rows, cols) = (left.len(), right.len());
        let mut data = vec![0.0; rows * cols];
        fill_pairwise(&mut data, left.as_slice(), right.as_slice(), left.dim(), cols);
        Ok(Self { rows, cols, data })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    /// One row of distances (attendee `row` against every guest).
    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }
}

/// Write `|a_i - b_j|` into `out[i * cols + j]`.
///
/// With `k == 0` every vector is the empty vector and `out` stays zeroed.
fn fill_pairwise(out: &mut [f64], left: &[f64], right: &[f64], k: usize, cols: usize) {
    if k == 0 || cols == 0 {
        return;
    }
    for (out_row, a) in out.chunks_mut(cols).zip(left.chunks_exact(k)) {
        for (cell, b) in out_row.iter_mut().zip(right.chunks_exact(k)) {
            *cell = euclidean_distance(a, b);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
