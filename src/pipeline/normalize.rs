//! Record normalisation: order-preserving dedupe, then a stable
//! three-key sort.
//!
//! ## Why dedupe before sorting?
//!
//! "First occurrence wins" is defined against *input* order — the
//! report sometimes repeats a (guarantee, suffix, job) row with a
//! corrected amount further down, and the original figure is the one
//! that counts. Deduplicating first, with an order-preserving filter,
//! pins that down; sorting afterwards (stably) cannot change which
//! duplicate survived, so the whole composition is deterministic.

use crate::record::Record;
use std::collections::HashSet;
use tracing::debug;

/// Deduplicate on the (guarantee_number, suffix, job) triple — first
/// occurrence wins — then sort ascending by guarantee number, suffix
/// and job, each text column under its own best-effort numeric key.
pub fn normalize(mut records: Vec<Record>) -> Vec<Record> {
    let before = records.len();

    let mut seen = HashSet::new();
    records.retain(|r| seen.insert(r.dedupe_key()));

    if records.len() < before {
        debug!("Dropped {} duplicate rows", before - records.len());
    }

    // sort_by_cached_key is stable, so equal-key rows keep input order.
    records.sort_by_cached_key(Record::sort_key);
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(g: &str, s: &str, job: i64, total: i64) -> Record {
        Record {
            guarantee_number: g.into(),
            suffix: s.into(),
            job,
            job_total: total,
        }
    }

    #[test]
    fn first_occurrence_wins_on_duplicate_key() {
        let out = normalize(vec![
            rec("0000123", "001", 1, 100),
            rec("0000123", "001", 1, 999),
        ]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].job_total, 100);
    }

    #[test]
    fn differing_job_total_alone_is_still_a_duplicate() {
        // Identity is the key triple; the amount plays no part.
        let out = normalize(vec![
            rec("0000123", "002", 3, -50),
            rec("0000123", "002", 3, 0),
            rec("0000123", "002", 3, 12),
        ]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].job_total, -50);
    }

    #[test]
    fn sorts_numerically_on_text_columns() {
        let out = normalize(vec![
            rec("0000987", "001", 1, 0),
            rec("0000123", "010", 1, 0),
            rec("0000123", "002", 1, 0),
            rec("0000123", "002", 1, 0), // duplicate
        ]);
        let keys: Vec<(&str, &str)> = out
            .iter()
            .map(|r| (r.guarantee_number.as_str(), r.suffix.as_str()))
            .collect();
        // "002" < "010" numerically; "0000123" < "0000987".
        assert_eq!(
            keys,
            vec![("0000123", "002"), ("0000123", "010"), ("0000987", "001")]
        );
    }

    #[test]
    fn mixed_width_numeric_text_sorts_by_value() {
        let out = normalize(vec![
            rec("123", "1", 1, 0),
            rec("0099", "1", 1, 0),
        ]);
        assert_eq!(out[0].guarantee_number, "0099");
    }

    #[test]
    fn job_breaks_ties_within_a_suffix() {
        let out = normalize(vec![
            rec("0000123", "001", 9, 0),
            rec("0000123", "001", 2, 0),
        ]);
        assert_eq!(out[0].job, 2);
        assert_eq!(out[1].job, 9);
    }

    #[test]
    fn output_is_non_decreasing_under_the_three_key_comparator() {
        let out = normalize(vec![
            rec("0000987", "002", 1, 10),
            rec("0000123", "001", 2, 20),
            rec("0000123", "001", 1, 30),
            rec("0000500", "010", 1, 40),
            rec("0000500", "002", 5, 50),
        ]);
        for pair in out.windows(2) {
            assert!(pair[0].sort_key() <= pair[1].sort_key());
        }
    }

    #[test]
    fn single_record_passes_through() {
        let out = normalize(vec![rec("0000001", "001", 1, 7)]);
        assert_eq!(out.len(), 1);
    }
}
