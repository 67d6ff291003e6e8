//! PDF rendering: rows go through a handlebars template into monospaced text,
//! which printpdf lays out on A4 pages.

use chrono::{DateTime, Utc};
use handlebars::Handlebars;
use printpdf::{BuiltinFont, Mm, PdfDocument};
use serde_json::json;
use vb_core::aggregates::ReportWindow;

use crate::error::ReportError;
use crate::row::ReportRow;

const TEMPLATE: &str = include_str!("../templates/report.hbs");

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 15.0;
const FONT_SIZE: f32 = 9.0;
const LINE_HEIGHT: f32 = 4.2;
const COLUMN_GAP: &str = "  ";

/// Document header values.
#[derive(Debug, Clone)]
pub struct ReportMeta {
    pub organization: String,
    pub generated_at: DateTime<Utc>,
    pub window: ReportWindow,
}

/// Render `rows` into PDF bytes.
///
/// # Errors
///
/// `ReportError::Empty` for no rows; `Template`/`Pdf` if rendering fails.
pub fn render_pdf<R: ReportRow>(rows: &[R], meta: &ReportMeta) -> Result<Vec<u8>, ReportError> {
    if rows.is_empty() {
        return Err(ReportError::Empty);
    }
    let text = render_text(rows, meta)?;
    let lines: Vec<&str> = text.lines().collect();

    let (doc, first_page, first_layer) = PdfDocument::new(
        R::TITLE,
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "Layer 1",
    );
    let font = doc
        .add_builtin_font(BuiltinFont::Courier)
        .map_err(|e| ReportError::Pdf(e.to_string()))?;

    let chunks = paginate(&lines, lines_per_page());
    let page_count = chunks.len();
    for (index, chunk) in chunks.into_iter().enumerate() {
        let (page, layer) = if index == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1")
        };
        let layer = doc.get_page(page).get_layer(layer);
        let mut y = PAGE_HEIGHT - MARGIN;
        for line in chunk {
            if !line.is_empty() {
                layer.use_text(*line, FONT_SIZE, Mm(MARGIN), Mm(y), &font);
            }
            y -= LINE_HEIGHT;
        }
    }

    let bytes = doc
        .save_to_bytes()
        .map_err(|e| ReportError::Pdf(e.to_string()))?;
    tracing::debug!(rows = rows.len(), pages = page_count, bytes = bytes.len(), "pdf report rendered");
    Ok(bytes)
}

/// The report as plain monospaced text, one table row per line.
fn render_text<R: ReportRow>(rows: &[R], meta: &ReportMeta) -> Result<String, ReportError> {
    let cells: Vec<Vec<String>> = rows.iter().map(ReportRow::cells).collect();
    let widths = column_widths(R::HEADERS, &cells);

    let header = pad_row(R::HEADERS.iter().map(|h| (*h).to_string()), &widths);
    let rule = "-".repeat(header.chars().count());
    let lines: Vec<String> = cells
        .into_iter()
        .map(|row| pad_row(row.into_iter(), &widths))
        .collect();

    let mut hb = Handlebars::new();
    hb.set_strict_mode(true);
    hb.register_escape_fn(handlebars::no_escape);
    hb.register_template_string("report", TEMPLATE)
        .map_err(|e| ReportError::Template(e.to_string()))?;

    let data = json!({
        "organization": meta.organization,
        "title": R::TITLE,
        "generated_at": meta.generated_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        "window": describe_window(&meta.window),
        "header": header,
        "rule": rule,
        "lines": lines,
        "count": rows.len(),
    });
    hb.render("report", &data)
        .map_err(|e| ReportError::Template(e.to_string()))
}

fn column_widths(headers: &[&str], rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }
    widths
}

fn pad_row(cells: impl Iterator<Item = String>, widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect();
    padded.join(COLUMN_GAP).trim_end().to_string()
}

fn describe_window(window: &ReportWindow) -> String {
    match (window.from, window.to) {
        (Some(from), Some(to)) => format!("{from} to {to}"),
        (Some(from), None) => format!("from {from}"),
        (None, Some(to)) => format!("until {to}"),
        (None, None) => String::new(),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn lines_per_page() -> usize {
    ((PAGE_HEIGHT - 2.0 * MARGIN) / LINE_HEIGHT).floor() as usize
}

fn paginate<'a>(lines: &'a [&'a str], per_page: usize) -> Vec<&'a [&'a str]> {
    if lines.is_empty() {
        return vec![lines];
    }
    lines.chunks(per_page.max(1)).collect()
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use rust_decimal::Decimal;
    use vb_core::aggregates::SlotDemand;

    use super::*;

    fn meta(window: ReportWindow) -> ReportMeta {
        ReportMeta {
            organization: "Venuebook Events".into(),
            generated_at: Utc.with_ymd_and_hms(2025, 12, 1, 9, 30, 0).unwrap(),
            window,
        }
    }

    fn slots(n: i64) -> Vec<SlotDemand> {
        (1..=n)
            .map(|i| SlotDemand {
                slot_id: i,
                venue_title: "Grand Hall".into(),
                slot_window: "18:00-23:00".into(),
                bookings: i,
                share_pct: Decimal::new(3333, 2),
            })
            .collect()
    }

    fn date(s: &str) -> Option<NaiveDate> {
        Some(s.parse().unwrap())
    }

    #[test]
    fn text_has_header_rows_and_count() {
        let text = render_text(&slots(2), &meta(ReportWindow::default())).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Venuebook Events");
        assert_eq!(lines[1], "Slot demand");
        assert_eq!(lines[2], "Generated 2025-12-01 09:30 UTC");
        assert!(text.contains("slot_id  venue       slot         bookings  share_pct"));
        assert!(text.contains("1        Grand Hall  18:00-23:00  1         33.33"));
        assert!(text.trim_end().ends_with("2 row(s)"));
    }

    #[test]
    fn window_is_printed_when_set() {
        let window = ReportWindow {
            from: date("2025-11-01"),
            to: date("2025-11-30"),
        };
        let text = render_text(&slots(1), &meta(window)).unwrap();
        assert!(text.contains("Generated 2025-12-01 09:30 UTC  |  2025-11-01 to 2025-11-30"));
    }

    #[rstest]
    #[case(None, None, "")]
    #[case(Some("2025-11-01"), None, "from 2025-11-01")]
    #[case(None, Some("2025-11-30"), "until 2025-11-30")]
    fn describes_partial_windows(
        #[case] from: Option<&str>,
        #[case] to: Option<&str>,
        #[case] expected: &str,
    ) {
        let window = ReportWindow {
            from: from.and_then(date),
            to: to.and_then(date),
        };
        assert_eq!(describe_window(&window), expected);
    }

    #[test]
    fn long_reports_span_pages() {
        let lines = vec!["x"; 130];
        let pages = paginate(&lines, 60);
        assert_eq!(pages.iter().map(|p| p.len()).collect::<Vec<_>>(), vec![60, 60, 10]);
    }

    #[test]
    fn pdf_bytes_have_pdf_magic() {
        let bytes = render_pdf(&slots(150), &meta(ReportWindow::default())).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn empty_rows_are_refused() {
        let err = render_pdf::<SlotDemand>(&[], &meta(ReportWindow::default())).unwrap_err();
        assert!(matches!(err, ReportError::Empty));
    }
}
