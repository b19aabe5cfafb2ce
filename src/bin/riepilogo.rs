//! CLI binary for riepilogo-garanzie.
//!
//! A thin shim over the library crate: filter the file arguments,
//! run each through `process_file`, and print results. Built for the
//! drag-a-file-onto-the-executable workflow, so the no-argument case
//! is a friendly hint rather than an error, and every failure names
//! the offending file before the process exits non-zero.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use riepilogo_garanzie::process_file;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert one report (writes report_Riepilogo_Garanzie.pdf next to it)
  riepilogo report.txt

  # Convert a batch — processed in order, aborts on the first failure
  riepilogo january.txt february.txt march.txt

  # Drag-and-drop: dropping .txt files onto the executable passes their
  # paths as arguments, same as above

INPUT FORMAT:
  Plain text (Latin-1) containing data rows of the form

      0000123 001 1 100

  i.e. 7-digit guarantee number, suffix, job, job total (may be
  negative). All other lines — headers, footers, page numbers — are
  skipped. A file with no data rows at all is rejected.

OUTPUT:
  One PDF per input file: <name>_Riepilogo_Garanzie.pdf in the input's
  directory, overwriting any previous run. The document contains the
  deduplicated, sorted record table, the totals block (Totale, IVA 22%,
  Totale IVA inclusa) and a rounding disclaimer.
"#;

/// Convert warranty report text files to PDF summaries.
#[derive(Parser, Debug)]
#[command(
    name = "riepilogo",
    version,
    about = "Convert warranty report text files to PDF summaries",
    long_about = "Convert fixed-layout warranty report .txt exports into paginated PDF \
summaries with deduplicated record tables and 22% VAT totals.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Report text files to convert. Non-existent paths are skipped.
    files: Vec<PathBuf>,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(std::io::stderr)
        .init();

    // Silently drop arguments that are not existing files — the
    // drag-and-drop shell sometimes passes stray tokens along.
    let files: Vec<PathBuf> = cli.files.into_iter().filter(|p| p.is_file()).collect();

    // No input is a usage hint, not an error: double-clicking the
    // executable without dropping a file on it must not look like a crash.
    if files.is_empty() {
        println!("No input files given.");
        println!("Drag a report .txt onto the executable, or run: riepilogo <file.txt> [more files...]");
        return Ok(());
    }

    // ── Process the batch, fail-fast ─────────────────────────────────────
    let bar = batch_bar(files.len(), cli.quiet);
    let mut created: Vec<PathBuf> = Vec::with_capacity(files.len());

    for file in &files {
        if !cli.quiet {
            say(&bar, format!("Processing {}", bold(&file.display().to_string())));
        }

        let summary = process_file(file)
            .inspect_err(|e| {
                say(
                    &bar,
                    format!("{} {}: {}", red("✗"), file.display(), red(&e.to_string())),
                );
            })
            .with_context(|| format!("Failed to process '{}'", file.display()))?;

        if !cli.quiet {
            say(
                &bar,
                format!(
                    "  {} {} records  {}  →  {}",
                    green("✓"),
                    summary.record_count,
                    dim(&format!("totale {}", summary.totals.total)),
                    summary.output.display(),
                ),
            );
        }
        bar.inc(1);
        created.push(summary.output);
    }
    bar.finish_and_clear();

    // ── Done ─────────────────────────────────────────────────────────────
    if !cli.quiet {
        println!(
            "{} {} file{} processed",
            green("✔"),
            bold(&created.len().to_string()),
            if created.len() == 1 { "" } else { "s" }
        );
        for path in &created {
            println!("  created: {}", path.display());
        }
    }

    Ok(())
}

/// Print a line without tearing the progress bar: through the bar when
/// it is drawing, straight to stdout when it is hidden (hidden bars
/// swallow `println`).
fn say(bar: &ProgressBar, msg: String) {
    if bar.is_hidden() {
        println!("{msg}");
    } else {
        bar.println(msg);
    }
}

/// Progress bar across the input-file batch. Hidden for a single file
/// (the per-file lines are feedback enough) and in quiet mode.
fn batch_bar(total: usize, quiet: bool) -> ProgressBar {
    if quiet || total < 2 {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(total as u64);
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} [{bar:42.green/238}] {pos}/{len} files")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  "),
    );
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}
