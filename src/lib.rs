//! # riepilogo-garanzie
//!
//! Convert fixed-layout warranty report `.txt` exports into formatted
//! PDF summaries ("Riepilogo Garanzie").
//!
//! ## Why this crate?
//!
//! The source reports are plain-text dumps from a legacy dealer
//! system: data rows sit between headers, footers and free text, rows
//! get repeated with corrections, and nothing is sorted. This crate
//! extracts the data rows, deduplicates and orders them, computes the
//! 22% VAT totals with exact decimal arithmetic, and renders a clean
//! paginated table document — the one that actually gets attached to
//! the invoice email.
//!
//! ## Pipeline Overview
//!
//! ```text
//! report.txt
//!  │
//!  ├─ 1. Extract    Latin-1 decode + regex scan for record lines
//!  ├─ 2. Normalize  first-wins dedupe on (guarantee, suffix, job), 3-key sort
//!  ├─ 3. Totals     exact i64 sum, 22% VAT half-up at 2 decimals
//!  └─ 4. Render     paginated A4 table + totals block + disclaimer (printpdf)
//! ```
//!
//! The whole pipeline is synchronous and single-threaded: each file is
//! one linear in-memory transformation with file I/O only at the two
//! ends.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use riepilogo_garanzie::process_file;
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let summary = process_file(Path::new("report.txt"))?;
//!     println!(
//!         "{} records → {}",
//!         summary.record_count,
//!         summary.output.display()
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `riepilogo` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library to avoid pulling in
//! CLI-only deps:
//! ```toml
//! riepilogo-garanzie = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod error;
pub mod pipeline;
pub mod process;
pub mod record;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use error::ReportError;
pub use pipeline::extract::{decode_latin1, extract_records};
pub use pipeline::normalize::normalize;
pub use pipeline::render::render_pdf;
pub use pipeline::totals::{compute_totals, format_eur, Totals};
pub use process::{output_path_for, process_file, ReportSummary};
pub use record::{Record, SortKey};
