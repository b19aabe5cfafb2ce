//! Document rendering: lay the record table, totals block and
//! disclaimer out into a paginated A4 PDF via printpdf.
//!
//! ## Why build in memory first?
//!
//! The driver contract says a failed run must never leave a partial
//! PDF behind. printpdf can serialise the whole document to a byte
//! buffer (`save_to_bytes`), so every layout decision happens before
//! the output file is even created; the only file-system side effect
//! is a single `fs::write` at the very end.
//!
//! ## Geometry
//!
//! All layout constants are in millimetres on an A4 portrait page,
//! matching the original report template: 28pt side margins, 36pt
//! top/bottom margins, column widths at 28/32/12/28% of the content
//! width, 0.25pt grid strokes. printpdf's coordinate origin is the
//! *bottom-left* corner, so the cursor starts at the top margin and
//! walks down.
//!
//! printpdf exposes no text metrics for its built-in fonts, so the
//! centred and right-aligned cells use a small per-glyph-class width
//! estimate (Helvetica digits and most lowercase are 0.556 em). For
//! the all-digit columns this document contains, the estimate is
//! visually exact.

use crate::error::ReportError;
use crate::pipeline::totals::{format_eur, Totals};
use crate::record::Record;
use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Rect, Rgb,
};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

// ── Page geometry (mm) ───────────────────────────────────────────────────

const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;
const MARGIN_SIDE: f32 = 9.9; // 28 pt
const MARGIN_TOP: f32 = 12.7; // 36 pt
const MARGIN_BOTTOM: f32 = 12.7;
const CONTENT_W: f32 = PAGE_W - 2.0 * MARGIN_SIDE;

const COL_FRACTIONS: [f32; 4] = [0.28, 0.32, 0.12, 0.28];
const TOTALS_FRACTIONS: [f32; 2] = [0.55, 0.45];

const TITLE_PT: f32 = 12.0;
const HEADER_PT: f32 = 9.0;
const BODY_PT: f32 = 8.0;
const TOTALS_PT: f32 = 9.0;
const DISCLAIMER_PT: f32 = 7.0;

const HEADER_ROW_H: f32 = 7.0;
const ROW_H: f32 = 6.0;
const TOTALS_ROW_H: f32 = 6.5;
const CELL_PAD: f32 = 1.6;
const GRID_PT: f32 = 0.25;

const PT_TO_MM: f32 = 0.352_778;

const TABLE_HEADER: [&str; 4] = ["NUMERO GARANZIA", "SUFFISSO", "JOB", "TOTALE JOB"];

const DISCLAIMER: [&str; 2] = [
    "Disclaimer: I totali riportati nel presente documento sono stati calcolati automaticamente.",
    "A causa di possibili arrotondamenti e differenze di calcolo, potrebbero verificarsi \
     scostamenti minimi di qualche euro rispetto ai valori ufficiali di fatturazione.",
];

// ── Public entry point ───────────────────────────────────────────────────

/// Render the summary document and write it to `out_path`, overwriting
/// any existing file.
///
/// # Errors
/// [`ReportError::Render`] when the document cannot be built or the
/// output path is not writable. On failure no partial file is left at
/// `out_path`.
pub fn render_pdf(records: &[Record], totals: &Totals, out_path: &Path) -> Result<(), ReportError> {
    let render_err = |detail: String| ReportError::Render {
        path: out_path.to_path_buf(),
        detail,
    };

    let bytes = build_document(records, totals).map_err(render_err)?;
    fs::write(out_path, &bytes).map_err(|e| render_err(e.to_string()))?;

    info!("Wrote {} ({} bytes)", out_path.display(), bytes.len());
    Ok(())
}

// ── Document assembly ────────────────────────────────────────────────────

/// Cell text alignment within its column.
#[derive(Clone, Copy)]
enum Align {
    Left,
    Center,
    Right,
}

/// Per-record column alignment: text columns left, JOB centred,
/// TOTALE JOB right-aligned.
const COL_ALIGN: [Align; 4] = [Align::Left, Align::Left, Align::Center, Align::Right];

/// Cursor over the growing document: current layer plus the y position
/// (mm above the page bottom) where the next block starts.
struct PageCursor<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    y: f32,
    pages: usize,
}

impl PageCursor<'_> {
    /// Start a fresh page and reset the cursor below the top margin.
    fn break_page(&mut self) {
        self.pages += 1;
        let (page, layer) = self
            .doc
            .add_page(mm(PAGE_W), mm(PAGE_H), format!("Page {}", self.pages));
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_H - MARGIN_TOP;
    }

    /// True when a block of `height` mm no longer fits above the
    /// bottom margin.
    fn needs_break(&self, height: f32) -> bool {
        self.y - height < MARGIN_BOTTOM
    }
}

fn build_document(records: &[Record], totals: &Totals) -> Result<Vec<u8>, String> {
    let (doc, page, layer) = PdfDocument::new("Riepilogo Garanzie", mm(PAGE_W), mm(PAGE_H), "Page 1");

    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| e.to_string())?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| e.to_string())?;
    let italic = doc
        .add_builtin_font(BuiltinFont::HelveticaOblique)
        .map_err(|e| e.to_string())?;

    let mut cur = PageCursor {
        doc: &doc,
        layer: doc.get_page(page).get_layer(layer),
        y: PAGE_H - MARGIN_TOP,
        pages: 1,
    };

    // ── Title ────────────────────────────────────────────────────────
    cur.y -= TITLE_PT * PT_TO_MM;
    cur.layer
        .use_text("Riepilogo Garanzie", TITLE_PT.into(), mm(MARGIN_SIDE), mm(cur.y), &bold);
    cur.y -= 3.0;

    // ── Record table ─────────────────────────────────────────────────
    let col_w: Vec<f32> = COL_FRACTIONS.iter().map(|f| f * CONTENT_W).collect();

    draw_table_header(&cur.layer, cur.y, &col_w, &bold);
    cur.y -= HEADER_ROW_H;

    for record in records {
        if cur.needs_break(ROW_H) {
            cur.break_page();
            // The header row repeats on every page the table spans.
            draw_table_header(&cur.layer, cur.y, &col_w, &bold);
            cur.y -= HEADER_ROW_H;
        }

        let cells = [
            record.guarantee_number.clone(),
            record.suffix.clone(),
            record.job.to_string(),
            record.job_total.to_string(),
        ];
        let mut x = MARGIN_SIDE;
        for (i, cell) in cells.iter().enumerate() {
            draw_cell(
                &cur.layer,
                x,
                cur.y,
                col_w[i],
                ROW_H,
                cell,
                BODY_PT,
                COL_ALIGN[i],
                &regular,
                None,
            );
            x += col_w[i];
        }
        cur.y -= ROW_H;
    }

    // ── Totals block ─────────────────────────────────────────────────
    let totals_h = 3.5 + 3.0 * TOTALS_ROW_H;
    if cur.needs_break(totals_h) {
        cur.break_page();
    }
    cur.y -= 3.5;

    let totals_w: Vec<f32> = TOTALS_FRACTIONS.iter().map(|f| f * CONTENT_W).collect();
    let totals_rows: [(&str, String); 3] = [
        ("Totale", totals.total.to_string()),
        ("IVA 22%", format_eur(totals.tax)),
        ("Totale IVA inclusa", format_eur(totals.total_with_tax)),
    ];

    for (row_idx, (label, value)) in totals_rows.iter().enumerate() {
        // Light shading on the first totals row only.
        let shade = (row_idx == 0).then(|| Rgb::new(0.96, 0.96, 0.96, None));
        draw_cell(
            &cur.layer,
            MARGIN_SIDE,
            cur.y,
            totals_w[0],
            TOTALS_ROW_H,
            label,
            TOTALS_PT,
            Align::Right,
            &regular,
            shade.clone(),
        );
        draw_cell(
            &cur.layer,
            MARGIN_SIDE + totals_w[0],
            cur.y,
            totals_w[1],
            TOTALS_ROW_H,
            value,
            TOTALS_PT,
            Align::Right,
            &regular,
            shade,
        );
        cur.y -= TOTALS_ROW_H;
    }

    // ── Disclaimer ───────────────────────────────────────────────────
    cur.y -= 3.0;
    let line_h = DISCLAIMER_PT * PT_TO_MM * 1.25;
    for sentence in DISCLAIMER {
        for line in wrap_text(sentence, DISCLAIMER_PT, CONTENT_W) {
            if cur.needs_break(line_h) {
                cur.break_page();
            }
            cur.y -= line_h;
            cur.layer
                .use_text(line, DISCLAIMER_PT.into(), mm(MARGIN_SIDE), mm(cur.y), &italic);
        }
    }

    debug!("Document laid out across {} page(s)", cur.pages);
    doc.save_to_bytes().map_err(|e| e.to_string())
}

/// Draw the shaded, bold, centred table header row with `y` as its top
/// edge.
fn draw_table_header(layer: &PdfLayerReference, y: f32, col_w: &[f32], bold: &IndirectFontRef) {
    let mut x = MARGIN_SIDE;
    for (i, label) in TABLE_HEADER.iter().enumerate() {
        draw_cell(
            layer,
            x,
            y,
            col_w[i],
            HEADER_ROW_H,
            label,
            HEADER_PT,
            Align::Center,
            bold,
            Some(Rgb::new(0.83, 0.83, 0.83, None)),
        );
        x += col_w[i];
    }
}

/// Draw one gridded cell: optional background fill, 0.25pt border, and
/// aligned text. `y` is the cell's top edge.
#[allow(clippy::too_many_arguments)]
fn draw_cell(
    layer: &PdfLayerReference,
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    text: &str,
    font_pt: f32,
    align: Align,
    font: &IndirectFontRef,
    background: Option<Rgb>,
) {
    if let Some(rgb) = background {
        layer.set_fill_color(Color::Rgb(rgb));
        layer.add_rect(Rect::new(mm(x), mm(y - h), mm(x + w), mm(y)).with_mode(PaintMode::Fill));
        // Restore the fill colour for the text that follows.
        layer.set_fill_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
    }

    layer.set_outline_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
    layer.set_outline_thickness(GRID_PT.into());
    layer.add_rect(Rect::new(mm(x), mm(y - h), mm(x + w), mm(y)).with_mode(PaintMode::Stroke));

    let text_w = text_width_mm(text, font_pt);
    let text_x = match align {
        Align::Left => x + CELL_PAD,
        Align::Center => x + (w - text_w) / 2.0,
        Align::Right => x + w - CELL_PAD - text_w,
    };
    // Vertically centre the cap height within the row.
    let baseline = y - h + (h - font_pt * PT_TO_MM * 0.72) / 2.0;
    layer.use_text(text, font_pt.into(), mm(text_x), mm(baseline), font);
}

// ── Text measurement ─────────────────────────────────────────────────────

/// Approximate advance width of one Helvetica glyph in em units.
fn glyph_width_em(c: char) -> f32 {
    match c {
        'i' | 'j' | 'l' | '\'' | '|' | '!' => 0.24,
        ' ' | '.' | ',' | ':' | ';' => 0.28,
        '-' | 'f' | 't' | 'r' | '(' | ')' | '[' | ']' => 0.33,
        'm' | 'w' | 'M' | 'W' => 0.87,
        c if c.is_ascii_uppercase() => 0.68,
        _ => 0.556,
    }
}

/// Estimated rendered width of `text` at `font_pt` points, in mm.
fn text_width_mm(text: &str, font_pt: f32) -> f32 {
    let em: f32 = text.chars().map(glyph_width_em).sum();
    em * font_pt * PT_TO_MM
}

/// Greedy word-wrap to `max_w` mm. A single over-long word gets its own
/// line rather than being split.
fn wrap_text(text: &str, font_pt: f32, max_w: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if text_width_mm(&candidate, font_pt) > max_w && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// `Mm` constructor that stays agnostic over printpdf's float width:
/// the layout maths runs in f32 and `Into` widens if the crate's unit
/// type is f64.
fn mm(v: f32) -> Mm {
    Mm(v.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::totals::compute_totals;
    use tempfile::TempDir;

    fn rec(g: &str, s: &str, job: i64, total: i64) -> Record {
        Record {
            guarantee_number: g.into(),
            suffix: s.into(),
            job,
            job_total: total,
        }
    }

    fn sample_records(n: usize) -> Vec<Record> {
        (0..n)
            .map(|i| rec(&format!("{:07}", 100 + i), "001", 1, (i as i64) * 3 - 10))
            .collect()
    }

    #[test]
    fn writes_a_pdf_file() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out.pdf");
        let records = sample_records(3);
        let totals = compute_totals(&records);

        render_pdf(&records, &totals, &out).unwrap();

        let bytes = std::fs::read(&out).unwrap();
        assert!(bytes.starts_with(b"%PDF"), "output must be a PDF");
        assert!(bytes.len() > 500, "suspiciously small document");
    }

    #[test]
    fn overwrites_an_existing_file() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out.pdf");
        std::fs::write(&out, b"stale content").unwrap();

        let records = sample_records(1);
        render_pdf(&records, &compute_totals(&records), &out).unwrap();

        let bytes = std::fs::read(&out).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn long_table_spans_multiple_pages() {
        // ~45 rows fit on the first page; 200 forces several breaks,
        // each of which redraws the header row.
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("long.pdf");
        let records = sample_records(200);
        render_pdf(&records, &compute_totals(&records), &out).unwrap();

        let short = dir.path().join("short.pdf");
        let few = sample_records(2);
        render_pdf(&few, &compute_totals(&few), &short).unwrap();

        let long_len = std::fs::metadata(&out).unwrap().len();
        let short_len = std::fs::metadata(&short).unwrap().len();
        assert!(long_len > short_len, "more rows must produce a larger document");
    }

    #[test]
    fn unwritable_path_is_a_render_error() {
        let out = Path::new("/nonexistent-dir/never/out.pdf");
        let records = sample_records(1);
        let err = render_pdf(&records, &compute_totals(&records), out).unwrap_err();
        assert!(matches!(err, ReportError::Render { .. }));
    }

    #[test]
    fn wrap_respects_width() {
        let lines = wrap_text(
            "A causa di possibili arrotondamenti e differenze di calcolo, potrebbero \
             verificarsi scostamenti minimi di qualche euro",
            DISCLAIMER_PT,
            60.0,
        );
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width_mm(line, DISCLAIMER_PT) <= 60.0);
        }
    }

    #[test]
    fn width_estimate_tracks_length() {
        assert!(text_width_mm("1.234.567,89 €", BODY_PT) > text_width_mm("0,00 €", BODY_PT));
        assert_eq!(text_width_mm("", BODY_PT), 0.0);
    }
}
