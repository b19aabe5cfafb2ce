//! Pipeline stages for report-to-PDF conversion.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets
//! us swap implementations (e.g. a different layout backend) without
//! touching other stages.
//!
//! ## Data Flow
//!
//! ```text
//! extract ──▶ normalize ──▶ totals ──▶ render
//! (regex)     (dedupe+sort)  (VAT)     (printpdf)
//! ```
//!
//! 1. [`extract`]   — decode the raw report bytes and scan for record
//!    lines; everything else in the file is silently skipped
//! 2. [`normalize`] — drop duplicate (guarantee, suffix, job) rows
//!    (first occurrence wins) and sort ascending on the three keys
//! 3. [`totals`]    — sum job totals and derive the 22% VAT figures
//!    with exact decimal arithmetic
//! 4. [`render`]    — lay the table, totals block and disclaimer out
//!    into a paginated A4 PDF
//!
//! Stages 1–3 are pure functions of their input; only [`render`]
//! touches the file system, and only to write the finished document.

pub mod extract;
pub mod normalize;
pub mod render;
pub mod totals;
