//! Core data types: one parsed report row and its dedupe/sort keys.
//!
//! ## Why are guarantee number and suffix strings?
//!
//! Both columns carry meaningful leading zeros ("0000123" is a
//! different identifier from "123"). Storing them as integers would
//! destroy identity, so they stay text for storage and equality — and
//! only the *sort* treats them numerically, via [`SortKey`].

use std::cmp::Ordering;

/// One parsed line of the warranty report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// 7-digit guarantee identifier, leading zeros significant.
    pub guarantee_number: String,
    /// Variable-length digit suffix distinguishing claims under the
    /// same guarantee number, leading zeros significant.
    pub suffix: String,
    /// Work-item code within a guarantee/suffix pair. 0 if unparsable.
    pub job: i64,
    /// Monetary amount (whole currency units) for this job line,
    /// possibly negative. 0 if unparsable.
    pub job_total: i64,
}

impl Record {
    /// The identity triple used for deduplication: two records with the
    /// same key are the same row, regardless of `job_total`.
    pub fn dedupe_key(&self) -> (String, String, i64) {
        (self.guarantee_number.clone(), self.suffix.clone(), self.job)
    }

    /// The three-column ascending sort key. Each text column gets an
    /// independent best-effort numeric key (see [`SortKey`]).
    pub fn sort_key(&self) -> (SortKey, SortKey, i64) {
        (
            SortKey::of(&self.guarantee_number),
            SortKey::of(&self.suffix),
            self.job,
        )
    }
}

/// Per-column comparison key: numeric when the whole field is digits,
/// raw text otherwise.
///
/// "0000123" must sort before "0000987" *numerically* even though both
/// are stored as text — and mixed-width values like "123" vs "0987"
/// must not fall into lexicographic order. The fallback to text for
/// non-digit values means a column mixing numeric and non-numeric
/// entries orders the numeric ones first (derived enum order); that is
/// accepted input-shape behaviour, applied independently per column,
/// not something to normalise away.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortKey {
    Numeric(u64),
    Text(String),
}

impl SortKey {
    /// Build the key for one field: full-string integer parse when
    /// every byte is an ASCII digit, text comparison otherwise.
    ///
    /// A digit run too long for u64 also falls back to text — there is
    /// no numeric value to compare it as.
    pub fn of(field: &str) -> Self {
        if !field.is_empty() && field.bytes().all(|b| b.is_ascii_digit()) {
            match field.parse::<u64>() {
                Ok(n) => SortKey::Numeric(n),
                Err(_) => SortKey::Text(field.to_string()),
            }
        } else {
            SortKey::Text(field.to_string())
        }
    }

    /// Convenience for tests and callers that want the comparison
    /// without building tuples.
    pub fn compare(a: &str, b: &str) -> Ordering {
        SortKey::of(a).cmp(&SortKey::of(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_keys_ignore_leading_zeros() {
        assert_eq!(SortKey::compare("0000123", "0000987"), Ordering::Less);
        // Lexicographically "0987" < "123"; numerically it is greater.
        assert_eq!(SortKey::compare("123", "0987"), Ordering::Less);
        assert_eq!(SortKey::compare("0042", "42"), Ordering::Equal);
    }

    #[test]
    fn non_numeric_fields_compare_as_text() {
        assert_eq!(SortKey::compare("abc", "abd"), Ordering::Less);
        assert_eq!(SortKey::compare("12a", "12b"), Ordering::Less);
    }

    #[test]
    fn numeric_sorts_before_text_in_mixed_columns() {
        assert_eq!(SortKey::compare("999999", "abc"), Ordering::Less);
        assert_eq!(SortKey::compare("1x", "0"), Ordering::Greater);
    }

    #[test]
    fn overflowing_digit_run_falls_back_to_text() {
        let huge = "9".repeat(40);
        assert_eq!(SortKey::of(&huge), SortKey::Text(huge.clone()));
    }

    #[test]
    fn dedupe_key_ignores_job_total() {
        let a = Record {
            guarantee_number: "0000123".into(),
            suffix: "001".into(),
            job: 1,
            job_total: 100,
        };
        let b = Record { job_total: 999, ..a.clone() };
        assert_eq!(a.dedupe_key(), b.dedupe_key());
        assert_ne!(a, b);
    }
}
