//! # Banquet Table constraint
//!
//! A labeling of the clustered attendees is allowable iff every non-noise
//! table is a clique in the tablemate graph: each member shares a guest
//! with every other member. Noise is exempt. One non-adjacent pair is
//! enough to reject a table, whatever its size.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::graph::TablemateGraph;
use crate::model::ClusterLabel;

/// First non-adjacent pair found at one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Offending cluster id.
    pub table: u32,
    /// Attendee rows that share a table but no guest.
    pub a: usize,
    pub b: usize,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "table {} seats rows {} and {} without a shared guest", self.table, self.a, self.b)
    }
}

/// Check a candidate labeling.
///
/// `rows[i]` is the attendee row that received `labels[i]`; only clustered
/// rows are ever passed here. Returns the first violation, or `None` if the
/// labeling is allowable.
pub fn validate(rows: &[usize], labels: &[ClusterLabel], graph: &TablemateGraph) -> Option<Violation> {
    debug_assert_eq!(rows.len(), labels.len());

    let mut tables: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
    for (&row, label) in rows.iter().zip(labels) {
        if let ClusterLabel::Cluster(t) = label {
            tables.entry(*t).or_default().push(row);
        }
    }

    for (table, members) in &tables {
        for &m in members {
            let mates = graph.neighbors(m);
            if let Some(&other) = members
                .iter()
                .find(|&&o| o != m && mates.binary_search(&o).is_err())
            {
                return Some(Violation { table: *table, a: m, b: other });
            }
        }
    }
    None
}

/// `true` iff [`validate`] finds no violation.
pub fn is_tabling_allowable(rows: &[usize], labels: &[ClusterLabel], graph: &TablemateGraph) -> bool {
    validate(rows, labels, graph).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ClusterLabel::{Cluster, Noise};

    /// A1-A2-A3 path, A1 and A3 not adjacent.
    fn path() -> TablemateGraph {
        TablemateGraph::from_edges(4, [(0, 1), (1, 2)])
    }

    const ROWS: [usize; 3] = [0, 1, 2];

    #[test]
    fn whole_path_at_one_table_is_rejected() {
        let v = validate(&ROWS, &[Cluster(0), Cluster(0), Cluster(0)], &path()).unwrap();
        assert_eq!(v.table, 0);
        assert_eq!((v.a, v.b), (0, 2));
    }

    #[test]
    fn split_path_is_allowed() {
        assert!(is_tabling_allowable(&ROWS, &[Cluster(0), Cluster(0), Cluster(1)], &path()));
    }

    #[test]
    fn all_noise_is_vacuously_allowed() {
        assert!(is_tabling_allowable(&ROWS, &[Noise, Noise, Noise], &path()));
    }

    #[test]
    fn noise_members_are_never_checked() {
        // A1 and A3 would conflict, but A3 is noise.
        assert!(is_tabling_allowable(&ROWS, &[Cluster(5), Cluster(5), Noise], &path()));
    }

    #[test]
    fn singleton_tables_are_allowed() {
        assert!(is_tabling_allowable(&ROWS, &[Cluster(0), Cluster(1), Cluster(2)], &path()));
    }

    #[test]
    fn rows_are_attendee_indices_not_positions() {
        // Rows 1 and 2 are adjacent; positions 0 and 1 in the slice.
        assert!(is_tabling_allowable(&[1, 2], &[Cluster(0), Cluster(0)], &path()));
        assert!(!is_tabling_allowable(&[0, 2], &[Cluster(0), Cluster(0)], &path()));
    }

    #[test]
    fn violation_displays_rows() {
        let v = Violation { table: 3, a: 1, b: 7 };
        assert_eq!(v.to_string(), "table 3 seats rows 1 and 7 without a shared guest");
    }
}
