//! # Guest-sharing metrics
//!
//! Quantifies how guests are distributed over the tables of an accepted
//! seating. Noise, lonely and outsider attendees sit at no table and so
//! contribute no guests to any table set.
//!
//! | Metric | Per | Formula |
//! |--------|-----|---------|
//! | `tableable_percentage` | collection | `(n - lonely - outsider) / n` |
//! | `noise_percentage` | clustered | `noise / (n - lonely - outsider)` |
//! | `intra_table_sharing_ratio` | table, averaged | guests held by ≥2 members / distinct guests |
//! | `inter_table_sharing_ratio` | collection | guests at ≥2 tables / distinct guests at any table |
//! | `guest_sharing_differential` | collection | intra − inter |
//! | `overlap_coefficient` | table pair, averaged | `|A ∩ B| / min(|A|, |B|)` |
//! | `jaccard_index` | table pair, averaged | `|A ∩ B| / |A ∪ B|` |
//! | `unique_vs_shared_guests` | collection | guests at ≥2 tables / distinct guests at any table |
//!
//! Every ratio with a zero denominator is 0.

use hashbrown::{HashMap, HashSet};

use crate::model::{MetricsRecord, Tabling};
use crate::relation::GuestRelation;

/// Compute the metrics record of a finished seating.
///
/// `tabling` and `relation` must describe the same collection, row for row.
pub fn compute_metrics(relation: &GuestRelation, tabling: &Tabling) -> MetricsRecord {
    debug_assert_eq!(relation.len(), tabling.len());

    let total = tabling.len();
    let submitted = total - tabling.lonely_count() - tabling.outsider_count();

    let tables: Vec<Vec<usize>> = tabling.tables().into_values().collect();
    let table_guests: Vec<HashSet<usize>> = tables
        .iter()
        .map(|members| {
            members
                .iter()
                .flat_map(|&m| relation.guests_of(m).iter().copied())
                .collect()
        })
        .collect();

    let intra = intra_table_sharing(relation, &tables);
    let shared = shared_across_tables(&table_guests);
    // Guests held only by noise, lonely or outsider rows are not counted.
    let seated_guests = table_guests.iter().flatten().collect::<HashSet<_>>().len();
    let inter = ratio(shared, seated_guests);

    let (overlap, jaccard) = pairwise_similarity(&table_guests);

    let record = MetricsRecord {
        d: relation.threshold(),
        tableable_percentage: ratio(submitted, total),
        noise_percentage: ratio(tabling.noise_count(), submitted),
        intra_table_sharing_ratio: intra,
        inter_table_sharing_ratio: inter,
        guest_sharing_differential: intra - inter,
        overlap_coefficient: overlap,
        jaccard_index: jaccard,
        unique_vs_shared_guests: ratio(shared, seated_guests),
    };
    tracing::trace!(d = record.d, tables = tables.len(), ?record, "computed metrics");
    record
}

/// `num / den`, or 0 when `den` is 0.
fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

/// Mean over tables of (guests held by more than one member / distinct guests).
fn intra_table_sharing(relation: &GuestRelation, tables: &[Vec<usize>]) -> f64 {
    if tables.is_empty() {
        return 0.0;
    }
    let sum: f64 = tables
        .iter()
        .map(|members| {
            let mut counts: HashMap<usize, usize> = HashMap::new();
            for &m in members {
                for &g in relation.guests_of(m) {
                    *counts.entry(g).or_default() += 1;
                }
            }
            let repeated = counts.values().filter(|&&c| c > 1).count();
            ratio(repeated, counts.len())
        })
        .sum();
    sum / tables.len() as f64
}

/// Number of distinct guests present in more than one table's guest set.
fn shared_across_tables(table_guests: &[HashSet<usize>]) -> usize {
    let mut seen_at: HashMap<usize, usize> = HashMap::new();
    for set in table_guests {
        for &g in set {
            *seen_at.entry(g).or_default() += 1;
        }
    }
    seen_at.values().filter(|&&c| c > 1).count()
}

/// Mean overlap coefficient and mean Jaccard index over all table pairs.
/// Both are 0 with fewer than two tables.
fn pairwise_similarity(table_guests: &[HashSet<usize>]) -> (f64, f64) {
    if table_guests.len() < 2 {
        return (0.0, 0.0);
    }
    let (mut overlap, mut jaccard, mut pairs) = (0.0, 0.0, 0usize);
    for (i, a) in table_guests.iter().enumerate() {
        for b in &table_guests[i + 1..] {
            let inter = a.intersection(b).count();
            let union = a.len() + b.len() - inter;
            overlap += ratio(inter, a.len().min(b.len()));
            jaccard += ratio(inter, union);
            pairs += 1;
        }
    }
    (overlap / pairs as f64, jaccard / pairs as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FeatureTable, Seat};

    fn line(points: &[(&str, f64)]) -> FeatureTable {
        let mut t = FeatureTable::new(["x"]);
        for (id, x) in points {
            t.push(*id, &[*x]).unwrap();
        }
        t
    }

    fn guests() -> FeatureTable {
        line(&[("g1", 0.0), ("g2", 10.0), ("g3", 20.0)])
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn two_tables_sharing_one_guest() {
        // a at 5 → {g1, g2}; b at 15 → {g2, g3}
        let attendees = line(&[("a", 5.0), ("b", 15.0)]);
        let rel = GuestRelation::build(&attendees, &guests(), 6.0).unwrap();
        let tabling = Tabling::new(attendees.ids().to_vec(), vec![Seat::Table(0), Seat::Table(1)]);

        let m = compute_metrics(&rel, &tabling);
        assert!(close(m.overlap_coefficient, 0.5));
        assert!(close(m.jaccard_index, 1.0 / 3.0));
        assert!(close(m.unique_vs_shared_guests, 1.0 / 3.0));
        assert!(close(m.inter_table_sharing_ratio, 1.0 / 3.0));
        assert!(close(m.intra_table_sharing_ratio, 0.0));
        assert!(close(m.guest_sharing_differential, -1.0 / 3.0));
        assert!(close(m.tableable_percentage, 1.0));
        assert!(close(m.noise_percentage, 0.0));
        assert_eq!(m.d, 6.0);
    }

    #[test]
    fn guests_of_noise_rows_do_not_dilute_sharing() {
        // n at 100 → {g4} only, and is left as noise
        let guests = line(&[("g1", 0.0), ("g2", 10.0), ("g3", 20.0), ("g4", 100.0)]);
        let attendees = line(&[("a", 5.0), ("b", 15.0), ("n", 100.0)]);
        let rel = GuestRelation::build(&attendees, &guests, 6.0).unwrap();
        assert_eq!(rel.guests_of(2), [3]);
        let tabling = Tabling::new(
            attendees.ids().to_vec(),
            vec![Seat::Table(0), Seat::Table(1), Seat::Noise],
        );

        let m = compute_metrics(&rel, &tabling);
        assert!(close(m.inter_table_sharing_ratio, 1.0 / 3.0));
        assert!(close(m.unique_vs_shared_guests, 1.0 / 3.0));
        assert!(close(m.guest_sharing_differential, -1.0 / 3.0));
    }

    #[test]
    fn intra_counts_guests_held_twice_at_one_table() {
        // a at 4.5 → {g1, g2}; b at 6 → {g2}
        let attendees = line(&[("a", 4.5), ("b", 6.0)]);
        let rel = GuestRelation::build(&attendees, &guests(), 6.0).unwrap();
        let tabling = Tabling::new(attendees.ids().to_vec(), vec![Seat::Table(0), Seat::Table(0)]);

        let m = compute_metrics(&rel, &tabling);
        assert!(close(m.intra_table_sharing_ratio, 0.5));
        // single table: nothing shared across tables, no pairs
        assert!(close(m.inter_table_sharing_ratio, 0.0));
        assert!(close(m.overlap_coefficient, 0.0));
        assert!(close(m.jaccard_index, 0.0));
        assert!(close(m.guest_sharing_differential, 0.5));
    }

    #[test]
    fn percentages_count_lonely_outsider_and_noise() {
        let attendees = line(&[("a", 1.0), ("b", 2.0), ("c", 100.0), ("d", 3.0)]);
        let rel = GuestRelation::build(&attendees, &guests(), 6.0).unwrap();
        let tabling = Tabling::new(
            attendees.ids().to_vec(),
            vec![Seat::Table(0), Seat::Noise, Seat::Lonely, Seat::Noise],
        );
        let m = compute_metrics(&rel, &tabling);
        assert!(close(m.tableable_percentage, 0.75));
        assert!(close(m.noise_percentage, 2.0 / 3.0));
    }

    #[test]
    fn empty_collection_is_all_zero() {
        let attendees = line(&[]);
        let rel = GuestRelation::build(&attendees, &guests(), 1.0).unwrap();
        let m = compute_metrics(&rel, &Tabling::new(Vec::new(), Vec::new()));
        assert!(m.values().iter().all(|v| *v == 0.0));
    }

    #[test]
    fn everyone_lonely_has_no_tableable_share() {
        let attendees = line(&[("a", 500.0), ("b", 600.0)]);
        let rel = GuestRelation::build(&attendees, &guests(), 1.0).unwrap();
        let tabling = Tabling::new(attendees.ids().to_vec(), vec![Seat::Lonely, Seat::Lonely]);
        let m = compute_metrics(&rel, &tabling);
        assert_eq!(m.tableable_percentage, 0.0);
        assert_eq!(m.noise_percentage, 0.0);
    }
}
