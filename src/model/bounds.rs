//! Normalization bounds for feature axes.
//!
//! Thresholds are only meaningful in a common scale, so raw measurements
//! (thickness in mm, gloss units, colour b*) are usually rescaled to
//! `[0, 1]` before guest relations are built. The bounds are always an
//! explicit value the caller owns and passes in; nothing here is global.

use std::collections::BTreeMap;

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use super::FeatureTable;
use crate::{Error, Result};

/// `(min, range)` of one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisBounds {
    pub min: f64,
    pub range: f64,
}

impl AxisBounds {
    /// Bounds spanning every value in `values`. `None` if empty.
    pub fn spanning(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        let (lo, hi) = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })?;
        Some(Self { min: lo, range: hi - lo })
    }

    /// `(v - min) / range`, or 0 for a degenerate axis.
    #[inline]
    pub fn normalize(&self, v: f64) -> f64 {
        if self.range == 0.0 { 0.0 } else { (v - self.min) / self.range }
    }

    fn merge(self, other: Self) -> Self {
        let lo = self.min.min(other.min);
        let hi = (self.min + self.range).max(other.min + other.range);
        Self { min: lo, range: hi - lo }
    }
}

/// Per-axis normalization table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureBounds {
    axes: BTreeMap<String, AxisBounds>,
    /// Axes where larger raw values mean "less" (e.g. gloss).
    #[serde(default)]
    inverted: HashSet<String>,
}

impl FeatureBounds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_axis(mut self, axis: impl Into<String>, bounds: AxisBounds) -> Self {
        self.axes.insert(axis.into(), bounds);
        self
    }

    /// Mark an axis as inverted: its normalized value becomes `1 - norm`.
    pub fn with_inverted(mut self, axis: impl Into<String>) -> Self {
        self.inverted.insert(axis.into());
        self
    }

    /// Bounds of every axis of `table`, from its own values.
    pub fn from_table(table: &FeatureTable) -> Self {
        let k = table.dim();
        let mut out = Self::new();
        for (col, axis) in table.axes().iter().enumerate() {
            let column = table.as_slice().iter().skip(col).step_by(k.max(1)).copied();
            if let Some(b) = AxisBounds::spanning(column) {
                out.axes.insert(axis.clone(), b);
            }
        }
        out
    }

    /// Bounds covering both `self` and `other`, axis by axis.
    pub fn union(&self, other: &FeatureBounds) -> FeatureBounds {
        let mut out = self.clone();
        for (axis, b) in &other.axes {
            out.axes
                .entry(axis.clone())
                .and_modify(|cur| *cur = cur.merge(*b))
                .or_insert(*b);
        }
        out.inverted.extend(other.inverted.iter().cloned());
        out
    }

    pub fn get(&self, axis: &str) -> Option<AxisBounds> {
        self.axes.get(axis).copied()
    }

    pub fn is_inverted(&self, axis: &str) -> bool {
        self.inverted.contains(axis)
    }

    /// Normalize every axis of `table`. Fails if an axis has no bounds.
    pub fn normalize(&self, table: &FeatureTable) -> Result<FeatureTable> {
        let per_axis = table
            .axes()
            .iter()
            .map(|axis| {
                let b = self.get(axis).ok_or_else(|| Error::UnknownAxis(axis.clone()))?;
                Ok((b, self.is_inverted(axis)))
            })
            .collect::<Result<Vec<_>>>()?;

        let k = table.dim();
        let mut values = Vec::with_capacity(table.as_slice().len());
        for (i, v) in table.as_slice().iter().enumerate() {
            let (b, inverted) = per_axis[i % k];
            let norm = b.normalize(*v);
            values.push(if inverted { 1.0 - norm } else { norm });
        }

        Ok(FeatureTable::from_parts(
            table.axes().to_vec(),
            table.ids().to_vec(),
            values,
        ))
    }
}
