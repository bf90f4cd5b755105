use crate::error::FlipfolioError;
use crate::workbook::cell::CellValue;
use crate::workbook::Workbook;

/// Per-sheet loading contract: where the sheet lives and how its header is laid out.
#[derive(Clone, Copy, Debug)]
pub struct SheetLayout {
    /// Exact sheet name (case-sensitive)
    pub name: &'static str,
    /// Zero-based row index holding the column titles
    pub header_row: usize,
    /// Discard auto-titled `Unnamed: N` columns after reading the header
    pub drop_unnamed: bool,
}

/// Prefix given to columns whose header cell is empty, matching the
/// `Unnamed: N` convention the source data was produced against.
const UNNAMED_PREFIX: &str = "Unnamed:";

/// A sheet narrowed to a header row plus the data rows below it, with
/// columns addressable by title.
#[derive(Debug)]
pub struct Table {
    sheet_name: String,
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Locates `layout.name` in the workbook and shapes it into a table.
    ///
    /// Rows before the header row are discarded. Fails with `SheetNotFound`
    /// when the sheet is absent and `MalformedSheet` when the header row is
    /// missing or yields no usable column titles.
    pub fn load(workbook: &Workbook, layout: &SheetLayout) -> Result<Table, FlipfolioError> {
        let sheet = workbook
            .sheet(layout.name)
            .ok_or_else(|| FlipfolioError::SheetNotFound {
                name: layout.name.to_owned(),
            })?;
        tracing::debug!(sheet = layout.name, header_row = layout.header_row, "loading table");

        if sheet.rows.len() <= layout.header_row {
            return Err(FlipfolioError::MalformedSheet {
                name: layout.name.to_owned(),
                reason: format!("header row {} is beyond the sheet data", layout.header_row),
            });
        }

        let header = &sheet.rows[layout.header_row];
        let mut keep: Vec<usize> = Vec::with_capacity(header.len());
        let mut columns: Vec<String> = Vec::with_capacity(header.len());
        for (index, cell) in header.iter().enumerate() {
            let title = match cell {
                CellValue::Empty => format!("{} {}", UNNAMED_PREFIX, index),
                other => other.to_string(),
            };
            if layout.drop_unnamed && title.starts_with(UNNAMED_PREFIX) {
                continue;
            }
            keep.push(index);
            columns.push(title);
        }
        if columns.is_empty() {
            return Err(FlipfolioError::MalformedSheet {
                name: layout.name.to_owned(),
                reason: format!("header row {} has no named columns", layout.header_row),
            });
        }

        let rows = sheet.rows[layout.header_row + 1..]
            .iter()
            .map(|row| keep.iter().map(|&index| row[index].clone()).collect())
            .collect();

        Ok(Table {
            sheet_name: layout.name.to_owned(),
            columns,
            rows,
        })
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    /// Column titles in sheet order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of data rows (header excluded).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn column_index(&self, column: &str) -> Result<usize, FlipfolioError> {
        self.columns
            .iter()
            .position(|title| title == column)
            .ok_or_else(|| FlipfolioError::ColumnNotFound {
                sheet: self.sheet_name.clone(),
                column: column.to_owned(),
            })
    }

    /// Extracts the requested columns, dropping any row with an empty cell in
    /// one of them and then applying `keep` to the survivors.
    ///
    /// Column names are validated up front so a typo fails once at extraction
    /// time rather than per row. Original row order is preserved.
    pub fn extract<F>(&self, columns: &[&str], keep: F) -> Result<Columns, FlipfolioError>
    where
        F: Fn(&RowView<'_>) -> bool,
    {
        let indexes = columns
            .iter()
            .map(|column| self.column_index(column))
            .collect::<Result<Vec<usize>, FlipfolioError>>()?;

        let mut series: Vec<Vec<CellValue>> = vec![Vec::new(); columns.len()];
        for row in &self.rows {
            if indexes.iter().any(|&index| row[index].is_empty()) {
                continue;
            }
            let view = RowView { table: self, row };
            if !keep(&view) {
                continue;
            }
            for (slot, &index) in series.iter_mut().zip(&indexes) {
                slot.push(row[index].clone());
            }
        }

        Ok(Columns {
            sheet_name: self.sheet_name.clone(),
            names: columns.iter().map(|column| (*column).to_owned()).collect(),
            series,
        })
    }
}

/// Read-only view of one data row, addressable by column title.
pub struct RowView<'a> {
    table: &'a Table,
    row: &'a [CellValue],
}

impl RowView<'_> {
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.table
            .columns
            .iter()
            .position(|title| title == column)
            .map(|index| &self.row[index])
    }
}

/// Result of a column extraction: per-column value vectors of equal length,
/// in the order they were requested.
#[derive(Debug)]
pub struct Columns {
    sheet_name: String,
    names: Vec<String>,
    series: Vec<Vec<CellValue>>,
}

impl Columns {
    /// Values of one extracted column.
    pub fn column(&self, name: &str) -> Result<&[CellValue], FlipfolioError> {
        self.names
            .iter()
            .position(|title| title == name)
            .map(|index| self.series[index].as_slice())
            .ok_or_else(|| FlipfolioError::ColumnNotFound {
                sheet: self.sheet_name.clone(),
                column: name.to_owned(),
            })
    }

    /// Number of surviving rows; identical across all extracted columns.
    pub fn len(&self) -> usize {
        self.series.first().map(Vec::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
