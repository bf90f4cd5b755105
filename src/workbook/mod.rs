//! Workbook loading and tabular access.
//!
//! A [`Workbook`] is an ordered set of named sheets, loaded once per request
//! from a local `.xlsx`/`.xls` file and immutable afterwards. Sheets keep
//! their absolute origin so header offsets are plain zero-based row indexes.

pub mod cell;
pub mod table;

pub use cell::CellValue;
pub use table::{Columns, RowView, SheetLayout, Table};

use crate::error::FlipfolioError;
use calamine::{open_workbook, Data, Range, Reader, Xls, Xlsx};
use std::ffi::OsStr;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Buffered file reader used by the spreadsheet engine
type FileReader = BufReader<File>;

/// Format-specific spreadsheet readers, selected by file extension.
enum Spreadsheet {
    /// Excel 2007+ format (.xlsx, .xlsm, .xlam)
    Xlsx(Xlsx<FileReader>),
    /// Legacy Excel format (.xls, .xla)
    Xls(Xls<FileReader>),
}

impl Spreadsheet {
    fn open<P: AsRef<Path>>(path: P) -> Result<Spreadsheet, FlipfolioError> {
        match path.as_ref().extension().and_then(OsStr::to_str) {
            Some("xlsx") | Some("xlsm") | Some("xlam") => Ok(Self::Xlsx(open_workbook(path)?)),
            Some("xls") | Some("xla") => Ok(Self::Xls(open_workbook(path)?)),
            _ => Err(FlipfolioError::InvalidFileFormat {
                name: path.as_ref().to_string_lossy().to_string(),
            }),
        }
    }

    fn sheet_names(&self) -> Vec<String> {
        match self {
            Self::Xlsx(xlsx) => xlsx.sheet_names(),
            Self::Xls(xls) => xls.sheet_names(),
        }
    }

    fn worksheet_range(&mut self, sheet_name: &str) -> Result<Range<Data>, FlipfolioError> {
        match self {
            Self::Xlsx(xlsx) => Ok(xlsx.worksheet_range(sheet_name)?),
            Self::Xls(xls) => Ok(xls.worksheet_range(sheet_name)?),
        }
    }
}

/// One named sheet: rows of cells in original order, padded to a rectangle
/// anchored at cell A1.
#[derive(Clone, Debug)]
pub struct Sheet {
    /// Sheet name
    pub name: String,
    /// All rows, each padded to the same width
    pub rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let mut rows = rows;
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(width, CellValue::Empty);
        }
        Sheet {
            name: name.into(),
            rows,
        }
    }

    /// Number of columns (rectangular by construction).
    pub fn width(&self) -> usize {
        self.rows.first().map(Vec::len).unwrap_or(0)
    }

    /// Builds a sheet from the engine's used range, re-anchoring it at A1 so
    /// row indexes stay absolute.
    fn from_range(name: &str, range: &Range<Data>) -> Self {
        let (row_offset, col_offset) = range
            .start()
            .map(|(row, col)| (row as usize, col as usize))
            .unwrap_or((0, 0));
        let mut rows: Vec<Vec<CellValue>> = Vec::with_capacity(row_offset + range.height());
        for _ in 0..row_offset {
            rows.push(Vec::new());
        }
        for source in range.rows() {
            let mut row = Vec::with_capacity(col_offset + source.len());
            row.resize(col_offset, CellValue::Empty);
            row.extend(source.iter().cloned().map(CellValue::from));
            rows.push(row);
        }
        Sheet::new(name, rows)
    }
}

/// An ordered collection of sheets loaded from one spreadsheet file.
#[derive(Debug)]
pub struct Workbook {
    sheets: Vec<Sheet>,
}

impl Workbook {
    /// Opens a workbook from a local path, reading every sheet eagerly.
    ///
    /// The format is detected from the file extension; anything other than an
    /// Excel workbook fails with `InvalidFileFormat`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Workbook, FlipfolioError> {
        tracing::info!(path = %path.as_ref().display(), "loading workbook");
        let mut spreadsheet = Spreadsheet::open(&path)?;
        let mut sheets = Vec::new();
        for name in spreadsheet.sheet_names() {
            let range = spreadsheet.worksheet_range(&name)?;
            sheets.push(Sheet::from_range(&name, &range));
        }
        Ok(Workbook { sheets })
    }

    /// Builds a workbook directly from sheets. Intended for in-memory use in
    /// tests and for callers that already hold parsed data.
    pub fn from_sheets(sheets: Vec<Sheet>) -> Workbook {
        Workbook { sheets }
    }

    /// All sheets in workbook order.
    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    /// Looks a sheet up by exact, case-sensitive name.
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheets_keep_order_and_rectangularity() {
        let workbook = Workbook::from_sheets(vec![
            Sheet::new(
                "B",
                vec![
                    vec![CellValue::Number(1.0)],
                    vec![CellValue::Number(2.0), CellValue::Number(3.0)],
                ],
            ),
            Sheet::new("A", vec![]),
        ]);
        assert_eq!(workbook.sheets()[0].name, "B");
        assert_eq!(workbook.sheets()[1].name, "A");
        assert_eq!(workbook.sheets()[0].width(), 2);
        assert_eq!(workbook.sheets()[0].rows[0][1], CellValue::Empty);
        assert!(workbook.sheet("B").is_some());
        assert!(workbook.sheet("b").is_none());
    }

    #[test]
    fn open_rejects_unknown_extensions() {
        let error = Workbook::open("portfolio.csv").unwrap_err();
        assert!(matches!(error, FlipfolioError::InvalidFileFormat { .. }));
    }
}
