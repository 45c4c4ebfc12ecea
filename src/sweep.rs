//! Threshold sweep: one full seating per guest threshold.
//!
//! Each threshold gets its own relation, graph and radius search; nothing
//! is carried between runs. The resulting records are what the inflection
//! scan and the plotting front end consume.

use crate::cluster::Clusterer;
use crate::model::{FeatureTable, MetricsRecord};
use crate::{Banquet, Error, Result};

/// Seat the collection at every threshold and collect metrics.
///
/// Thresholds may be given in any order; records come back sorted by
/// ascending `d`. Any non-positive threshold fails the whole sweep before
/// the first search runs.
pub fn sweep_thresholds<C: Clusterer>(
    banquet: &Banquet<C>,
    attendees: &FeatureTable,
    guests: &FeatureTable,
    axes: &[&str],
    thresholds: &[f64],
) -> Result<Vec<MetricsRecord>> {
    if let Some(&bad) = thresholds.iter().find(|d| !(d.is_finite() && **d > 0.0)) {
        return Err(Error::InvalidThreshold(bad));
    }
    let mut sorted = thresholds.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mut records = Vec::with_capacity(sorted.len());
    for d in sorted {
        let seating = banquet.seat(attendees, guests, axes, d)?;
        let record = seating.metrics();
        tracing::trace!(d, radius = seating.radius, tables = seating.tabling.table_count(), "sweep point");
        records.push(record);
    }
    Ok(records)
}

/// `count` evenly spaced thresholds from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            (0..count).map(|i| start + i as f64 * step).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linspace_includes_both_ends() {
        let v = linspace(0.1, 0.5, 5);
        assert_eq!(v.len(), 5);
        assert!((v[0] - 0.1).abs() < 1e-12);
        assert!((v[4] - 0.5).abs() < 1e-12);
        assert!((v[2] - 0.3).abs() < 1e-12);
    }

    #[test]
    fn linspace_degenerate_counts() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(0.2, 1.0, 1), vec![0.2]);
    }
}
