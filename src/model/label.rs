//! Cluster labels and the final seating of a collection.

use std::collections::BTreeMap;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use super::ItemId;

/// Label emitted by the clustering primitive for one point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ClusterLabel {
    /// Non-negative cluster id.
    Cluster(u32),
    /// Not assigned to any cluster.
    Noise,
}

impl ClusterLabel {
    pub fn is_noise(self) -> bool {
        matches!(self, ClusterLabel::Noise)
    }

    pub fn cluster(self) -> Option<u32> {
        match self {
            ClusterLabel::Cluster(c) => Some(c),
            ClusterLabel::Noise => None,
        }
    }
}

/// Conventional integer labels: any negative value (usually `-1`) is noise.
impl From<i64> for ClusterLabel {
    fn from(raw: i64) -> Self {
        match u32::try_from(raw) {
            Ok(c) => ClusterLabel::Cluster(c),
            Err(_) => ClusterLabel::Noise,
        }
    }
}

/// Where one attendee ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Seat {
    /// Seated at a table (cluster id).
    Table(u32),
    /// Submitted to clustering but left unseated.
    Noise,
    /// No guests at all.
    Lonely,
    /// Guests, but no allowable tablemate.
    Outsider,
}

impl From<ClusterLabel> for Seat {
    fn from(label: ClusterLabel) -> Self {
        match label {
            ClusterLabel::Cluster(c) => Seat::Table(c),
            ClusterLabel::Noise => Seat::Noise,
        }
    }
}

impl std::fmt::Display for Seat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Seat::Table(c) => write!(f, "{c}"),
            Seat::Noise => f.write_str("-1"),
            Seat::Lonely => f.write_str("lonely"),
            Seat::Outsider => f.write_str("outsider"),
        }
    }
}

/// Immutable seating of a whole collection, in collection order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawTabling")]
pub struct Tabling {
    ids: Vec<ItemId>,
    seats: Vec<Seat>,
    #[serde(skip)]
    index: HashMap<ItemId, usize>,
}

impl Tabling {
    /// Pair ids with seats. Both slices are in collection row order.
    pub fn new(ids: Vec<ItemId>, seats: Vec<Seat>) -> Self {
        debug_assert_eq!(ids.len(), seats.len());
        let index = ids.iter().enumerate().map(|(i, id)| (id.clone(), i)).collect();
        Self { ids, seats, index }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Seat of an attendee by id.
    pub fn seat_of(&self, id: &str) -> Option<Seat> {
        self.index.get(id).map(|&i| self.seats[i])
    }

    /// Seat of row `row`.
    pub fn seat(&self, row: usize) -> Seat {
        self.seats[row]
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub fn ids(&self) -> &[ItemId] {
        &self.ids
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ItemId, Seat)> {
        self.ids.iter().zip(self.seats.iter().copied())
    }

    /// Rows seated at each table, ordered by table id.
    pub fn tables(&self) -> BTreeMap<u32, Vec<usize>> {
        let mut tables: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
        for (row, seat) in self.seats.iter().enumerate() {
            if let Seat::Table(t) = seat {
                tables.entry(*t).or_default().push(row);
            }
        }
        tables
    }

    pub fn table_count(&self) -> usize {
        self.tables().len()
    }

    pub fn count(&self, kind: Seat) -> usize {
        self.seats
            .iter()
            .filter(|s| std::mem::discriminant(*s) == std::mem::discriminant(&kind))
            .count()
    }

    pub fn noise_count(&self) -> usize {
        self.count(Seat::Noise)
    }

    pub fn lonely_count(&self) -> usize {
        self.count(Seat::Lonely)
    }

    pub fn outsider_count(&self) -> usize {
        self.count(Seat::Outsider)
    }
}

/// Wire form of [`Tabling`]; the id index is rebuilt on load.
#[derive(Deserialize)]
struct RawTabling {
    ids: Vec<ItemId>,
    seats: Vec<Seat>,
}

impl From<RawTabling> for Tabling {
    fn from(raw: RawTabling) -> Self {
        Tabling::new(raw.ids, raw.seats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tabling() -> Tabling {
        Tabling::new(
            vec!["a".into(), "b".into(), "c".into(), "d".into(), "e".into()],
            vec![Seat::Table(1), Seat::Noise, Seat::Table(0), Seat::Lonely, Seat::Table(1)],
        )
    }

    #[test]
    fn negative_raw_labels_are_noise() {
        assert_eq!(ClusterLabel::from(-1), ClusterLabel::Noise);
        assert_eq!(ClusterLabel::from(-7), ClusterLabel::Noise);
        assert_eq!(ClusterLabel::from(3), ClusterLabel::Cluster(3));
    }

    #[test]
    fn tables_group_rows_by_label() {
        let t = tabling();
        let tables: Vec<_> = t.tables().into_iter().collect();
        assert_eq!(tables, vec![(0, vec![2]), (1, vec![0, 4])]);
        assert_eq!(t.table_count(), 2);
    }

    #[test]
    fn counts_by_seat_kind() {
        let t = tabling();
        assert_eq!(t.noise_count(), 1);
        assert_eq!(t.lonely_count(), 1);
        assert_eq!(t.outsider_count(), 0);
        assert_eq!(t.count(Seat::Table(99)), 3);
    }

    #[test]
    fn seat_lookup_by_id() {
        let t = tabling();
        assert_eq!(t.seat_of("e"), Some(Seat::Table(1)));
        assert_eq!(t.seat_of("zz"), None);
    }

    #[test]
    fn lookup_survives_json() {
        let json = serde_json::to_string(&tabling()).unwrap();
        let back: Tabling = serde_json::from_str(&json).unwrap();
        assert_eq!(back.seat_of("c"), Some(Seat::Table(0)));
    }

    #[test]
    fn seat_display_matches_sheet_conventions() {
        assert_eq!(Seat::Table(4).to_string(), "4");
        assert_eq!(Seat::Noise.to_string(), "-1");
        assert_eq!(Seat::Outsider.to_string(), "outsider");
    }
}
