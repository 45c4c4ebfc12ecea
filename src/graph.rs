//! # Tablemate graph and attendee classes
//!
//! Two attendees are *tablemates* (allowed to share a table) when their
//! guest sets intersect. The graph is undirected, has no self-loops, and is
//! keyed by attendee row index.
//!
//! ```text
//! guest → attendees holding it      (inverted index)
//!   R1  → [A1, A2]                  ⇒ A1-A2
//!   R2  → [A2, A3]                  ⇒ A2-A3
//!   R3  → [A4]                      ⇒ (nothing)
//! ```
//!
//! Pairing only attendees that co-occur on some guest keeps construction
//! near-linear in the number of relation entries instead of quadratic in
//! the number of attendees.

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::model::ItemId;
use crate::relation::GuestRelation;

// ============================================================================
// TablemateGraph
// ============================================================================

/// Undirected adjacency over attendee row indices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TablemateGraph {
    /// `neighbors[a]` is sorted ascending and never contains `a`.
    neighbors: Vec<Vec<usize>>,
}

impl TablemateGraph {
    /// Derive the tablemate graph from a guest relation.
    pub fn from_relation(relation: &GuestRelation) -> Self {
        let mut holders: Vec<Vec<usize>> = vec![Vec::new(); relation.guest_count()];
        for (attendee, guests) in relation.iter() {
            for &g in guests {
                holders[g].push(attendee);
            }
        }

        let mut sets: Vec<HashSet<usize>> = vec![HashSet::new(); relation.len()];
        for attendees in holders.iter().filter(|h| h.len() > 1) {
            for (i, &a) in attendees.iter().enumerate() {
                for &b in &attendees[i + 1..] {
                    sets[a].insert(b);
                    sets[b].insert(a);
                }
            }
        }

        let neighbors = sets
            .into_iter()
            .map(|set| {
                let mut v: Vec<usize> = set.into_iter().collect();
                v.sort_unstable();
                v
            })
            .collect();

        let graph = Self { neighbors };
        tracing::debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "built tablemate graph"
        );
        graph
    }

    /// Build directly from an edge list over `n` nodes. Self-loops are dropped.
    pub fn from_edges(n: usize, edges: impl IntoIterator<Item = (usize, usize)>) -> Self {
        let mut neighbors = vec![Vec::new(); n];
        for (a, b) in edges {
            if a != b {
                neighbors[a].push(b);
                neighbors[b].push(a);
            }
        }
        for v in &mut neighbors {
            v.sort_unstable();
            v.dedup();
        }
        Self { neighbors }
    }

    pub fn node_count(&self) -> usize {
        self.neighbors.len()
    }

    pub fn edge_count(&self) -> usize {
        self.neighbors.iter().map(Vec::len).sum::<usize>() / 2
    }

    /// Tablemates of `a`, ascending.
    pub fn neighbors(&self, a: usize) -> &[usize] {
        &self.neighbors[a]
    }

    pub fn degree(&self, a: usize) -> usize {
        self.neighbors[a].len()
    }

    pub fn is_adjacent(&self, a: usize, b: usize) -> bool {
        self.neighbors[a].binary_search(&b).is_ok()
    }

    /// Unordered edges as `(low, high)` pairs, sorted.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.neighbors.iter().enumerate().flat_map(|(a, ns)| {
            ns.iter().filter(move |&&b| b > a).map(move |&b| (a, b))
        })
    }

    /// Whether every pair in `members` is adjacent.
    pub fn is_clique(&self, members: &[usize]) -> bool {
        members.iter().enumerate().all(|(i, &a)| {
            members[i + 1..].iter().all(|&b| self.is_adjacent(a, b))
        })
    }
}

// ============================================================================
// Classification
// ============================================================================

/// Which class an attendee falls in before clustering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttendeeClass {
    /// No guests.
    Lonely,
    /// Guests, but no tablemate.
    Outsider,
    /// Eligible for clustering.
    Clustered,
}

/// Disjoint, exhaustive partition of attendee rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub lonely: Vec<usize>,
    pub outsider: Vec<usize>,
    pub clustered: Vec<usize>,
}

impl Classification {
    /// Split attendees into lonely, outsider and clustered rows.
    pub fn classify(relation: &GuestRelation, graph: &TablemateGraph) -> Self {
        let mut out = Self { lonely: Vec::new(), outsider: Vec::new(), clustered: Vec::new() };
        for (a, guests) in relation.iter() {
            match class_of(guests.is_empty(), graph.degree(a)) {
                AttendeeClass::Lonely => out.lonely.push(a),
                AttendeeClass::Outsider => out.outsider.push(a),
                AttendeeClass::Clustered => out.clustered.push(a),
            }
        }
        tracing::debug!(
            lonely = out.lonely.len(),
            outsider = out.outsider.len(),
            clustered = out.clustered.len(),
            "classified attendees"
        );
        out
    }

    pub fn total(&self) -> usize {
        self.lonely.len() + self.outsider.len() + self.clustered.len()
    }

    /// Class of attendee row `a`, if it was classified.
    pub fn class_of(&self, a: usize) -> Option<AttendeeClass> {
        if self.clustered.binary_search(&a).is_ok() {
            Some(AttendeeClass::Clustered)
        } else if self.outsider.binary_search(&a).is_ok() {
            Some(AttendeeClass::Outsider)
        } else if self.lonely.binary_search(&a).is_ok() {
            Some(AttendeeClass::Lonely)
        } else {
            None
        }
    }

    /// Ids of rows in one class, resolved through the relation.
    pub fn ids<'r>(&self, class: AttendeeClass, relation: &'r GuestRelation) -> Vec<&'r ItemId> {
        let rows = match class {
            AttendeeClass::Lonely => &self.lonely,
            AttendeeClass::Outsider => &self.outsider,
            AttendeeClass::Clustered => &self.clustered,
        };
        rows.iter().map(|&a| relation.attendee_id(a)).collect()
    }
}

fn class_of(no_guests: bool, degree: usize) -> AttendeeClass {
    if no_guests {
        AttendeeClass::Lonely
    } else if degree == 0 {
        AttendeeClass::Outsider
    } else {
        AttendeeClass::Clustered
    }
}

// ============================================================================
// Tests
// ============================================================================
