//! File pipeline driver: run one report file through every stage.
//!
//! The stages themselves are pure (see [`crate::pipeline`]); this
//! module owns the only I/O at the edges — reading the input bytes and
//! handing the renderer an output path derived from the input. Any
//! stage failure propagates unmasked: the caller decides whether to
//! report and abort (the CLI does both).

use crate::error::ReportError;
use crate::pipeline::totals::Totals;
use crate::pipeline::{extract, normalize, render, totals};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// What one successful run produced, for caller-side reporting.
#[derive(Debug, Clone)]
pub struct ReportSummary {
    /// Path of the PDF that was written.
    pub output: PathBuf,
    /// Number of records in the rendered table (post-dedupe).
    pub record_count: usize,
    /// The totals block values.
    pub totals: Totals,
}

/// Derive the output path for an input report:
/// `<stem>_Riepilogo_Garanzie.pdf` in the input's directory (or the
/// current directory when the path has no parent).
pub fn output_path_for(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let dir = match input.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    dir.join(format!("{stem}_Riepilogo_Garanzie.pdf"))
}

/// Convert one report file to its PDF summary.
///
/// Runs read → decode → extract → normalize → totals → render and
/// returns a [`ReportSummary`] describing the output. The input file
/// handle is closed before the output is written; on any failure no
/// partial PDF is left behind.
///
/// # Errors
/// * [`ReportError::Io`] — input unreadable
/// * [`ReportError::NoValidRecords`] — no data rows anywhere in the file
/// * [`ReportError::Render`] — output not writable
pub fn process_file(input: &Path) -> Result<ReportSummary, ReportError> {
    info!("Processing {}", input.display());

    // ── Step 1: Read and decode ──────────────────────────────────────
    let bytes = fs::read(input).map_err(|e| ReportError::Io {
        path: input.to_path_buf(),
        source: e,
    })?;
    let text = extract::decode_latin1(&bytes);
    debug!("Read {} bytes", bytes.len());

    // ── Step 2: Extract record lines ─────────────────────────────────
    let raw = extract::extract_records(&text)?;

    // ── Step 3: Dedupe and sort ──────────────────────────────────────
    let records = normalize::normalize(raw);
    info!("{} records after normalisation", records.len());

    // ── Step 4: Totals ───────────────────────────────────────────────
    let totals = totals::compute_totals(&records);
    debug!(
        "total={} tax={} with_tax={}",
        totals.total, totals.tax, totals.total_with_tax
    );

    // ── Step 5: Render ───────────────────────────────────────────────
    let output = output_path_for(input);
    render::render_pdf(&records, &totals, &output)?;

    Ok(ReportSummary {
        output,
        record_count: records.len(),
        totals,
    })
}
