//! Flattened text rendering of a whole workbook.
//!
//! The chat pathway embeds this text verbatim into the instruction payload
//! sent to the completion service, so the output is plain aligned text with
//! one header line per sheet and no row or column filtering.

use crate::workbook::{Sheet, Workbook};
use std::path::Path;

/// Renders every sheet of the workbook, in workbook order.
pub fn summarize(workbook: &Workbook) -> String {
    let mut summary = String::new();
    for sheet in workbook.sheets() {
        summary.push_str(&format!("\nSheet: {}\n", sheet.name));
        summary.push_str(&render_sheet(sheet));
    }
    summary
}

/// Opens and summarizes a workbook file.
///
/// Degrades to text on failure: an unreadable workbook yields the error's
/// description instead of an `Err`, so the caller always has something to
/// embed downstream. The returned string is therefore not guaranteed to be
/// tabular data.
pub fn summarize_path<P: AsRef<Path>>(path: P) -> String {
    match Workbook::open(&path) {
        Ok(workbook) => summarize(&workbook),
        Err(error) => {
            tracing::error!(path = %path.as_ref().display(), %error, "error reading file");
            error.to_string()
        }
    }
}

/// Column-aligned dump of all rows and columns of one sheet.
fn render_sheet(sheet: &Sheet) -> String {
    let cells: Vec<Vec<String>> = sheet
        .rows
        .iter()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect();

    let mut widths = vec![0usize; sheet.width()];
    for row in &cells {
        for (index, value) in row.iter().enumerate() {
            widths[index] = widths[index].max(value.chars().count());
        }
    }

    let mut rendered = String::new();
    for row in &cells {
        let mut line = String::new();
        for (index, value) in row.iter().enumerate() {
            if index > 0 {
                line.push_str("  ");
            }
            line.push_str(value);
            // Pad to the column width, except after the last column
            if index + 1 < row.len() {
                for _ in value.chars().count()..widths[index] {
                    line.push(' ');
                }
            }
        }
        rendered.push_str(line.trim_end());
        rendered.push('\n');
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workbook::CellValue;

    fn text(value: &str) -> CellValue {
        CellValue::Text(value.to_owned())
    }

    #[test]
    fn renders_every_sheet_in_order() {
        let workbook = Workbook::from_sheets(vec![
            Sheet::new(
                "Sold Flips",
                vec![
                    vec![text("Address"), text("Price")],
                    vec![text("12 Oak St"), CellValue::Number(100000.0)],
                ],
            ),
            Sheet::new("Notes", vec![vec![text("call the lender")]]),
        ]);
        let summary = summarize(&workbook);
        assert!(summary.starts_with("\nSheet: Sold Flips\n"));
        let flips = summary.find("Sheet: Sold Flips").unwrap();
        let notes = summary.find("Sheet: Notes").unwrap();
        assert!(flips < notes);
        assert!(summary.contains("12 Oak St  100000"));
        assert!(summary.contains("call the lender"));
    }

    #[test]
    fn unreadable_workbook_degrades_to_error_text() {
        let summary = summarize_path("does-not-exist.xlsx");
        assert!(!summary.is_empty());
        assert!(!summary.contains("Sheet:"));
    }
}
