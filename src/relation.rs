//! # Guest relation
//!
//! A guest of an attendee is a reference item strictly closer than `d`:
//!
//! ```text
//! guests(a) = { g : |a - g| < d }
//! ```
//!
//! The relation is recomputed in full for every `(attendees, guests, d)`
//! triple. It is never updated in place.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::model::{DistanceMatrix, FeatureTable, ItemId};
use crate::{Error, Result};

/// Guest row indices of one attendee, ascending.
pub type GuestSet = SmallVec<[usize; 8]>;

/// Mapping attendee → set of guests within the threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuestRelation {
    threshold: f64,
    attendees: Vec<ItemId>,
    guests: Vec<ItemId>,
    /// `sets[a]` holds guest row indices for attendee row `a`.
    sets: Vec<GuestSet>,
}

impl GuestRelation {
    /// Build the relation between two tables already aligned on the same axes.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidThreshold`] if `d` is not a positive finite number.
    /// - [`Error::ShapeMismatch`] if the tables differ in axis count.
    pub fn build(attendees: &FeatureTable, guests: &FeatureTable, d: f64) -> Result<Self> {
        check_threshold(d)?;
        let distances = DistanceMatrix::between(attendees, guests)?;

        let sets: Vec<GuestSet> = (0..attendees.len())
            .map(|a| {
                distances
                    .row(a)
                    .iter()
                    .enumerate()
                    .filter(|(_, dist)| **dist < d)
                    .map(|(g, _)| g)
                    .collect::<GuestSet>()
            })
            .collect();

        let relation = Self {
            threshold: d,
            attendees: attendees.ids().to_vec(),
            guests: guests.ids().to_vec(),
            sets,
        };
        tracing::debug!(
            d,
            attendees = relation.attendees.len(),
            guests = relation.guests.len(),
            pairs = relation.pair_count(),
            lonely = relation.sets.iter().filter(|s| s.is_empty()).count(),
            "built guest relation"
        );
        Ok(relation)
    }

    /// Project both tables onto `axes` by name, then [`build`](Self::build).
    pub fn build_on_axes(
        attendees: &FeatureTable,
        guests: &FeatureTable,
        axes: &[&str],
        d: f64,
    ) -> Result<Self> {
        check_threshold(d)?;
        Self::build(&attendees.project(axes)?, &guests.project(axes)?, d)
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Number of attendees (rows), including lonely ones.
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn guest_count(&self) -> usize {
        self.guests.len()
    }

    /// Guest row indices of attendee row `attendee`.
    pub fn guests_of(&self, attendee: usize) -> &[usize] {
        &self.sets[attendee]
    }

    /// Guest ids of attendee row `attendee`.
    pub fn guest_ids_of(&self, attendee: usize) -> impl Iterator<Item = &ItemId> {
        self.sets[attendee].iter().map(|&g| &self.guests[g])
    }

    pub fn attendee_id(&self, attendee: usize) -> &ItemId {
        &self.attendees[attendee]
    }

    pub fn guest_id(&self, guest: usize) -> &ItemId {
        &self.guests[guest]
    }

    pub fn attendee_ids(&self) -> &[ItemId] {
        &self.attendees
    }

    /// Iterate `(attendee row, guest rows)`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[usize])> {
        self.sets.iter().map(|s| s.as_slice()).enumerate()
    }

    /// Total number of (attendee, guest) pairs.
    pub fn pair_count(&self) -> usize {
        self.sets.iter().map(|s| s.len()).sum()
    }

    /// Whether two attendees share at least one guest.
    ///
    /// Both sets are sorted, so this is a linear merge.
    pub fn shares_guest(&self, a: usize, b: usize) -> bool {
        let (x, y) = (&self.sets[a], &self.sets[b]);
        let (mut i, mut j) = (0, 0);
        while i < x.len() && j < y.len() {
            match x[i].cmp(&y[j]) {
                std::cmp::Ordering::Equal => return true,
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
            }
        }
        false
    }
}

fn check_threshold(d: f64) -> Result<()> {
    if d.is_finite() && d > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidThreshold(d))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn line(points: &[(&str, f64)]) -> FeatureTable {
        let mut t = FeatureTable::new(["x"]);
        for (id, x) in points {
            t.push(*id, &[*x]).unwrap();
        }
        t
    }

    fn guest_names(rel: &GuestRelation, a: usize) -> Vec<&str> {
        rel.guest_ids_of(a).map(|g| g.as_str()).collect()
    }

    #[test]
    fn four_attendees_three_guests() {
        let attendees = line(&[("A1", 0.0), ("A2", 1.0), ("A3", 2.0), ("A4", 10.0)]);
        let guests = line(&[("R1", 0.5), ("R2", 1.5), ("R3", 9.5)]);
        let rel = GuestRelation::build(&attendees, &guests, 1.0).unwrap();

        assert_eq!(guest_names(&rel, 0), vec!["R1"]);
        assert_eq!(guest_names(&rel, 1), vec!["R1", "R2"]);
        assert_eq!(guest_names(&rel, 2), vec!["R2"]);
        assert_eq!(guest_names(&rel, 3), vec!["R3"]);
        assert_eq!(rel.pair_count(), 5);
    }

    #[test]
    fn boundary_distance_is_excluded() {
        let attendees = line(&[("a", 0.0)]);
        let guests = line(&[("on", 1.0), ("inside", 0.999)]);
        let rel = GuestRelation::build(&attendees, &guests, 1.0).unwrap();
        assert_eq!(guest_names(&rel, 0), vec!["inside"]);
    }

    #[test]
    fn non_positive_threshold_is_rejected() {
        let t = line(&[("a", 0.0)]);
        for d in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                GuestRelation::build(&t, &t, d),
                Err(Error::InvalidThreshold(_))
            ));
        }
    }

    #[test]
    fn empty_reference_leaves_everyone_without_guests() {
        let attendees = line(&[("a", 0.0), ("b", 1.0)]);
        let rel = GuestRelation::build(&attendees, &line(&[]), 5.0).unwrap();
        assert_eq!(rel.len(), 2);
        assert!(rel.iter().all(|(_, g)| g.is_empty()));
    }

    #[test]
    fn axes_are_aligned_by_name() {
        let attendees = FeatureTable::new(["x", "y", "year"])
            .with_row("a", &[0.0, 0.0, 1900.0]).unwrap();
        let guests = FeatureTable::new(["y", "x"])
            .with_row("g", &[0.0, 0.5]).unwrap();
        let rel = GuestRelation::build_on_axes(&attendees, &guests, &["x", "y"], 1.0).unwrap();
        assert_eq!(guest_names(&rel, 0), vec!["g"]);
    }

    #[test]
    fn mismatched_axes_are_a_shape_error() {
        let a = FeatureTable::new(["x", "y"]);
        let g = FeatureTable::new(["x"]);
        assert!(matches!(
            GuestRelation::build(&a, &g, 1.0),
            Err(Error::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn relation_reads_back_from_json() {
        let attendees = line(&[("A1", 0.0), ("A2", 1.0)]);
        let guests = line(&[("R1", 0.5)]);
        let rel = GuestRelation::build(&attendees, &guests, 1.0).unwrap();
        let back: GuestRelation = serde_json::from_str(&serde_json::to_string(&rel).unwrap()).unwrap();
        assert_eq!(back, rel);
    }

    #[test]
    fn shares_guest_merges_sorted_sets() {
        let attendees = line(&[("A1", 0.0), ("A2", 1.0), ("A3", 2.0)]);
        let guests = line(&[("R1", 0.5), ("R2", 1.5)]);
        let rel = GuestRelation::build(&attendees, &guests, 1.0).unwrap();
        assert!(rel.shares_guest(0, 1));
        assert!(rel.shares_guest(1, 2));
        assert!(!rel.shares_guest(0, 2));
    }
}
