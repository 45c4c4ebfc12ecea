//! Feature tables: dense, row-major collections of feature vectors.
//!
//! A `FeatureTable` is the arena every other component indexes into:
//! row `i` is addressed by a stable `usize`, never by reference, so guest
//! and attendee identity stays decoupled from any particular snapshot.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use super::ItemId;
use crate::{Error, Result};

/// A table of items keyed by id, with one `f64` column per named axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFeatureTable")]
pub struct FeatureTable {
    axes: Vec<String>,
    ids: Vec<ItemId>,
    /// Row-major, `ids.len() * axes.len()` values.
    values: Vec<f64>,
    #[serde(skip)]
    index: HashMap<ItemId, usize>,
}

impl FeatureTable {
    /// Create an empty table over the given axes.
    pub fn new(axes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            axes: axes.into_iter().map(Into::into).collect(),
            ids: Vec::new(),
            values: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Append a row. Fails on a duplicate id or a row of the wrong width.
    pub fn push(&mut self, id: impl Into<ItemId>, row: &[f64]) -> Result<usize> {
        let id = id.into();
        if row.len() != self.axes.len() {
            return Err(Error::RowWidth {
                id: id.to_string(),
                expected: self.axes.len(),
                got: row.len(),
            });
        }
        if self.index.contains_key(&id) {
            return Err(Error::DuplicateId(id.to_string()));
        }
        let idx = self.ids.len();
        self.index.insert(id.clone(), idx);
        self.ids.push(id);
        self.values.extend_from_slice(row);
        Ok(idx)
    }

    /// Builder-style `push` for literals and tests.
    pub fn with_row(mut self, id: impl Into<ItemId>, row: &[f64]) -> Result<Self> {
        self.push(id, row)?;
        Ok(self)
    }

    pub fn axes(&self) -> &[String] {
        &self.axes
    }

    pub fn dim(&self) -> usize {
        self.axes.len()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[ItemId] {
        &self.ids
    }

    pub fn id(&self, row: usize) -> &ItemId {
        &self.ids[row]
    }

    /// Row index of an id, if present.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Feature vector of row `row`.
    pub fn row(&self, row: usize) -> &[f64] {
        let k = self.dim();
        &self.values[row * k..(row + 1) * k]
    }

    /// Iterate `(id, vector)` in insertion order.
    pub fn rows(&self) -> impl Iterator<Item = (&ItemId, &[f64])> {
        let k = self.dim().max(1);
        self.ids.iter().zip(self.values.chunks(k).chain(std::iter::repeat(&[][..])))
    }

    /// Raw row-major storage.
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Column index of a named axis.
    pub fn axis_index(&self, axis: &str) -> Option<usize> {
        self.axes.iter().position(|a| a == axis)
    }

    /// Select `axes` by name, in the given order.
    ///
    /// This is how an attendee table and a guest table carrying different
    /// metadata columns are aligned onto one shared feature space.
    pub fn project(&self, axes: &[&str]) -> Result<FeatureTable> {
        let cols = axes
            .iter()
            .map(|a| self.axis_index(a).ok_or_else(|| Error::UnknownAxis((*a).to_owned())))
            .collect::<Result<Vec<_>>>()?;

        let mut out = FeatureTable::new(axes.iter().copied());
        out.values.reserve(self.len() * cols.len());
        for (row, id) in self.ids.iter().enumerate() {
            let src = self.row(row);
            out.values.extend(cols.iter().map(|&c| src[c]));
            out.index.insert(id.clone(), row);
            out.ids.push(id.clone());
        }
        Ok(out)
    }

    /// Sub-table of the given rows, in the given order.
    pub fn subset(&self, rows: &[usize]) -> FeatureTable {
        let mut out = FeatureTable::new(self.axes.iter().cloned());
        out.values.reserve(rows.len() * self.dim());
        for (new_row, &row) in rows.iter().enumerate() {
            let id = self.ids[row].clone();
            out.values.extend_from_slice(self.row(row));
            out.index.insert(id.clone(), new_row);
            out.ids.push(id);
        }
        out
    }

    /// Construct a table from parts already laid out row-major.
    pub(crate) fn from_parts(axes: Vec<String>, ids: Vec<ItemId>, values: Vec<f64>) -> Self {
        debug_assert_eq!(ids.len() * axes.len(), values.len());
        let index = ids.iter().enumerate().map(|(i, id)| (id.clone(), i)).collect();
        Self { axes, ids, values, index }
    }
}

/// Wire form of [`FeatureTable`]; checked and re-indexed on load.
#[derive(Deserialize)]
struct RawFeatureTable {
    axes: Vec<String>,
    ids: Vec<ItemId>,
    values: Vec<f64>,
}

impl TryFrom<RawFeatureTable> for FeatureTable {
    type Error = Error;

    fn try_from(raw: RawFeatureTable) -> Result<Self> {
        let k = raw.axes.len();
        if raw.values.len() != raw.ids.len() * k {
            return Err(Error::InvalidConfig(format!(
                "{} values for {} rows of {} axes",
                raw.values.len(),
                raw.ids.len(),
                k
            )));
        }
        let mut table = FeatureTable::new(raw.axes);
        if k == 0 {
            for id in raw.ids {
                table.push(id, &[])?;
            }
        } else {
            for (id, row) in raw.ids.into_iter().zip(raw.values.chunks_exact(k)) {
                table.push(id, row)?;
            }
        }
        Ok(table)
    }
}
