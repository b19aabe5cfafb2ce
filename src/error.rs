//! Error types for the riepilogo-garanzie library.
//!
//! All failures are local to one input file's processing, so a single
//! enum covers the whole pipeline. The driver never masks or degrades
//! an error: the batch is fail-fast by design, so every variant here
//! surfaces to the user with the offending file named by the caller.
//!
//! Messages carry a short actionable hint after the diagnostic — the
//! typical user dragged a file onto an executable and will only ever
//! see this one line.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the riepilogo-garanzie library.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Input file could not be read (missing, unreadable, permissions).
    #[error("Cannot read report file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input text contained no line matching the record pattern.
    ///
    /// This signals "wrong format", not "empty report" — headers,
    /// footers and free text are expected and skipped, but a file with
    /// zero data rows anywhere is almost certainly not a warranty
    /// report export.
    #[error(
        "No valid record lines found in the report.\n\
         Check the file format: data rows look like '0000123 001 1 100' \
         (7-digit guarantee number, suffix, job, job total)."
    )]
    NoValidRecords,

    /// The output PDF could not be produced or written.
    #[error("Cannot write PDF '{path}': {detail}\nCheck the directory exists and is writable.")]
    Render { path: PathBuf, detail: String },
}
