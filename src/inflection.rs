//! # Inflection points of a threshold sweep
//!
//! Finds thresholds where several metrics jump at once. A jump is an
//! increase between consecutive records larger than `diff_threshold`; the
//! later record's `d` is flagged. A flagged `d` is kept only when at least
//! `min_confirmations` distinct metric columns flag it.

use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};

use crate::model::MetricsRecord;
use crate::{Error, Result};

/// Tuning of the inflection scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InflectionConfig {
    /// Minimum increase between consecutive records to count as a jump.
    pub diff_threshold: f64,
    /// Decimal digits flagged thresholds are rounded to.
    #[serde(default = "default_precision")]
    pub precision: u32,
    /// Number of metric columns that must flag the same `d`.
    #[serde(default = "default_confirmations")]
    pub min_confirmations: usize,
}

fn default_precision() -> u32 {
    3
}

fn default_confirmations() -> usize {
    2
}

impl InflectionConfig {
    pub fn new(diff_threshold: f64) -> Self {
        Self {
            diff_threshold,
            precision: default_precision(),
            min_confirmations: default_confirmations(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.diff_threshold.is_finite() {
            return Err(Error::InvalidConfig("diff_threshold must be finite".into()));
        }
        if self.precision > 15 {
            return Err(Error::InvalidConfig(format!(
                "precision must be <= 15 digits, got {}",
                self.precision
            )));
        }
        Ok(())
    }
}

/// Thresholds where at least `min_confirmations` metrics jump.
///
/// `records` must be sorted by ascending `d`. The result keeps one entry per
/// flagging metric, in column order then sweep order, so a confirmed `d`
/// appears as many times as it was flagged.
pub fn find_inflections(records: &[MetricsRecord], config: &InflectionConfig) -> Result<Vec<f64>> {
    config.validate()?;
    let scale = 10f64.powi(config.precision as i32);

    // (rounded d, flagging column) in column order then sweep order
    let mut flagged: Vec<(i64, usize)> = Vec::new();
    for col in 0..MetricsRecord::COLUMNS.len() {
        for pair in records.windows(2) {
            let (before, after) = (pair[0].values()[col], pair[1].values()[col]);
            if after - before > config.diff_threshold {
                flagged.push(((pair[1].d * scale).round() as i64, col));
            }
        }
    }

    let mut columns: HashMap<i64, HashSet<usize>> = HashMap::new();
    for &(key, col) in &flagged {
        columns.entry(key).or_default().insert(col);
    }

    let confirmed: Vec<f64> = flagged
        .into_iter()
        .filter(|(key, _)| columns[key].len() >= config.min_confirmations)
        .map(|(key, _)| key as f64 / scale)
        .collect();
    tracing::debug!(records = records.len(), confirmed = confirmed.len(), "inflection scan");
    Ok(confirmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(d: f64, tableable: f64, noise: f64, jaccard: f64) -> MetricsRecord {
        MetricsRecord {
            d,
            tableable_percentage: tableable,
            noise_percentage: noise,
            intra_table_sharing_ratio: 0.0,
            inter_table_sharing_ratio: 0.0,
            guest_sharing_differential: 0.0,
            overlap_coefficient: 0.0,
            jaccard_index: jaccard,
            unique_vs_shared_guests: 0.0,
        }
    }

    #[test]
    fn co_occurring_jumps_are_confirmed() {
        let sweep = [
            record(0.1, 0.10, 0.50, 0.0),
            record(0.2, 0.60, 0.90, 0.0), // tableable and noise jump
            record(0.3, 0.62, 0.20, 0.5), // only jaccard jumps
            record(0.4, 0.63, 0.21, 0.5),
        ];
        let hits = find_inflections(&sweep, &InflectionConfig::new(0.25)).unwrap();
        assert_eq!(hits, vec![0.2, 0.2]);
    }

    #[test]
    fn one_column_cannot_confirm_itself() {
        // 0.1001 and 0.1004 both round to 0.1; only tableable jumps
        let sweep = [
            record(0.0990, 0.0, 0.0, 0.0),
            record(0.1001, 0.5, 0.0, 0.0),
            record(0.1004, 1.0, 0.0, 0.0),
        ];
        assert!(find_inflections(&sweep, &InflectionConfig::new(0.25)).unwrap().is_empty());
    }

    #[test]
    fn decreases_are_not_jumps() {
        let sweep = [record(0.1, 0.9, 0.9, 0.9), record(0.2, 0.1, 0.1, 0.1)];
        assert!(find_inflections(&sweep, &InflectionConfig::new(0.1)).unwrap().is_empty());
    }

    #[test]
    fn flagged_d_is_rounded() {
        let sweep = [record(0.1, 0.0, 0.0, 0.0), record(0.123456, 1.0, 1.0, 0.0)];
        let hits = find_inflections(&sweep, &InflectionConfig::new(0.5)).unwrap();
        assert_eq!(hits, vec![0.123, 0.123]);
    }

    #[test]
    fn single_metric_confirmation_can_be_requested() {
        let sweep = [record(0.1, 0.0, 0.0, 0.0), record(0.2, 0.0, 0.0, 0.9)];
        let mut config = InflectionConfig::new(0.5);
        assert!(find_inflections(&sweep, &config).unwrap().is_empty());
        config.min_confirmations = 1;
        assert_eq!(find_inflections(&sweep, &config).unwrap(), vec![0.2]);
    }

    #[test]
    fn short_sweeps_have_no_inflections() {
        let config = InflectionConfig::new(0.0);
        assert!(find_inflections(&[], &config).unwrap().is_empty());
        assert!(find_inflections(&[record(0.1, 1.0, 1.0, 1.0)], &config).unwrap().is_empty());
    }

    #[test]
    fn non_finite_threshold_is_rejected() {
        let err = find_inflections(&[], &InflectionConfig::new(f64::NAN)).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }
}
