//! Record extraction: scan raw report text for data rows.
//!
//! ## Why scan instead of parse?
//!
//! The source report is not a clean table — data rows sit between
//! headers, footers, page numbers and free text. Rather than model the
//! surrounding layout (which varies between exports), a single
//! multiline regex picks out exactly the lines that carry a record and
//! ignores the rest. The only hard failure is a file where *nothing*
//! matches: that means "wrong format", not "empty report", and gets a
//! dedicated error.
//!
//! ## Encoding
//!
//! Reports come from a legacy system that writes Latin-1. Every byte
//! in Latin-1 maps 1:1 to a Unicode code point, so decoding is total —
//! stray high bytes in the surrounding noise become accented
//! characters instead of aborting the run, which is exactly the
//! permissive behaviour the drag-and-drop use case needs.

use crate::error::ReportError;
use crate::record::Record;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// A data row: optional leading whitespace, 7-digit guarantee number,
/// digit suffix, digit job, optionally-signed digit job total, then a
/// non-digit boundary. Anchored per line via `(?m)`.
static ROW_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*(\d{7})\s+(\d+)\s+(\d+)\s+(-?\d+)\b").unwrap());

/// Decode raw report bytes as Latin-1 (ISO-8859-1).
///
/// Total by construction: byte 0xNN becomes U+00NN.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Scan `text` for record lines and return them in input order
/// (pre-dedupe, pre-sort).
///
/// Pure function of the text: running it twice yields the same records.
///
/// # Errors
/// [`ReportError::NoValidRecords`] when zero lines match anywhere in
/// the text.
pub fn extract_records(text: &str) -> Result<Vec<Record>, ReportError> {
    let records: Vec<Record> = ROW_RE
        .captures_iter(text)
        .map(|caps| Record {
            guarantee_number: caps[1].to_string(),
            suffix: caps[2].to_string(),
            // Captures are digit runs; a parse failure only means the
            // run overflows i64, and the contract for unparsable
            // values is "default to 0".
            job: caps[3].parse().unwrap_or(0),
            job_total: caps[4].parse().unwrap_or(0),
        })
        .collect();

    if records.is_empty() {
        return Err(ReportError::NoValidRecords);
    }

    debug!("Extracted {} raw record lines", records.len());
    Ok(records)
}
