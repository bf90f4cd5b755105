//! Chart series builders and the aggregate chart bundle.
//!
//! Everything here is a pure function from extracted columns to one labeled
//! series; [`extract_charts`] wires the four builders to the fixed sheet and
//! column contract the uploaded portfolio workbooks follow.

use crate::currency;
use crate::error::FlipfolioError;
use crate::workbook::{SheetLayout, Table, Workbook};
use serde::Serialize;

/// "Sold Flips" carries a title row above its header.
pub const SOLD_FLIPS: SheetLayout = SheetLayout {
    name: "Sold Flips",
    header_row: 1,
    drop_unnamed: false,
};

/// "Kiavi Loans" carries two metadata rows and auto-generated unnamed
/// columns that must be discarded.
pub const KIAVI_LOANS: SheetLayout = SheetLayout {
    name: "Kiavi Loans",
    header_row: 2,
    drop_unnamed: true,
};

/// "Flip Inventory Sheet" carries a title row above its header.
pub const FLIP_INVENTORY: SheetLayout = SheetLayout {
    name: "Flip Inventory Sheet",
    header_row: 1,
    drop_unnamed: false,
};

/// Column titles the extraction contract depends on.
pub mod col {
    pub const SOLD_DATE: &str = "Sold Date";
    pub const SALE_PRICE: &str = "Property Sale Price";
    pub const PROPERTY_ADDRESS: &str = "Property Address";
    pub const PURCHASE_PRICE: &str = "Property Purchase Price";
    pub const ADDRESS: &str = "Address";
    pub const TOTAL: &str = "Total";
    pub const LEAD: &str = "Lead";
}

/// One labeled chart series. Index `i` of `labels` and `data` describes the
/// same data point; the lengths are always equal.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Series<T = f64> {
    pub labels: Vec<String>,
    pub data: Vec<T>,
}

impl<T> Series<T> {
    pub fn new() -> Self {
        Series {
            labels: Vec::new(),
            data: Vec::new(),
        }
    }

    fn with_capacity(capacity: usize) -> Self {
        Series {
            labels: Vec::with_capacity(capacity),
            data: Vec::with_capacity(capacity),
        }
    }

    fn push(&mut self, label: String, value: T) {
        self.labels.push(label);
        self.data.push(value);
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl<T> Default for Series<T> {
    fn default() -> Self {
        Series::new()
    }
}

/// The four named series one chart request produces. Serializes to the fixed
/// JSON contract the charting frontend consumes.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartBundle {
    #[serde(rename = "historyChart")]
    pub history: Series,
    #[serde(rename = "scatterChart")]
    pub scatter: Series,
    #[serde(rename = "cashFlowChart")]
    pub cash_flow: Series,
    #[serde(rename = "leadChannelChart")]
    pub lead_channel: Series<u64>,
}

/// Time series of sale prices by sold date, in original (chronological) row
/// order. A non-date cell under `Sold Date` is a malformed sheet.
pub fn history_series(table: &Table) -> Result<Series, FlipfolioError> {
    let columns = table.extract(&[col::SOLD_DATE, col::SALE_PRICE], |_| true)?;
    let dates = columns.column(col::SOLD_DATE)?;
    let prices = columns.column(col::SALE_PRICE)?;

    let mut series = Series::with_capacity(columns.len());
    for (date, price) in dates.iter().zip(prices) {
        let label = date
            .as_date_label()
            .ok_or_else(|| FlipfolioError::MalformedSheet {
                name: table.sheet_name().to_owned(),
                reason: format!("'{}' in column '{}' is not a date", date, col::SOLD_DATE),
            })?;
        series.push(label, currency::normalize(price)?);
    }
    Ok(series)
}

/// Purchase price per property address, one point per row, no aggregation.
pub fn scatter_series(table: &Table) -> Result<Series, FlipfolioError> {
    labeled_amounts(table, col::PROPERTY_ADDRESS, col::PURCHASE_PRICE)
}

/// Loan totals per address. Despite the name this stays row-level: each row
/// becomes one labeled point, with no grouping by address.
pub fn cash_flow_series(table: &Table) -> Result<Series, FlipfolioError> {
    labeled_amounts(table, col::ADDRESS, col::TOTAL)
}

fn labeled_amounts(table: &Table, label: &str, amount: &str) -> Result<Series, FlipfolioError> {
    let columns = table.extract(&[label, amount], |_| true)?;
    let labels = columns.column(label)?;
    let amounts = columns.column(amount)?;

    let mut series = Series::with_capacity(columns.len());
    for (cell, value) in labels.iter().zip(amounts) {
        series.push(cell.to_string(), currency::normalize(value)?);
    }
    Ok(series)
}

/// Occurrence counts of lead channels, most common first.
///
/// The `Lead` column mixes textual channel labels with stray numeric
/// artifacts; numeric-parseable values are filtered out before counting.
/// Ties keep first-encountered order.
pub fn lead_channel_series(table: &Table) -> Result<Series<u64>, FlipfolioError> {
    let columns = table.extract(&[col::ADDRESS, col::LEAD], |row| {
        row.get(col::LEAD).map(|cell| !cell.is_numeric()).unwrap_or(false)
    })?;
    let leads = columns.column(col::LEAD)?;

    let mut counts: Vec<(String, u64)> = Vec::new();
    for lead in leads {
        let label = lead.to_string();
        match counts.iter_mut().find(|(seen, _)| *seen == label) {
            Some((_, count)) => *count += 1,
            None => counts.push((label, 1)),
        }
    }
    counts.sort_by(|left, right| right.1.cmp(&left.1)); // stable: ties keep insertion order

    let mut series = Series::with_capacity(counts.len());
    for (label, count) in counts {
        series.push(label, count);
    }
    Ok(series)
}

/// Builds the complete four-series bundle from one workbook.
///
/// Any failure (missing sheet, missing column, unparseable amount) aborts the
/// whole bundle; a partial response is never produced.
pub fn extract_charts(workbook: &Workbook) -> Result<ChartBundle, FlipfolioError> {
    tracing::info!("extracting chart data");
    let sold_flips = Table::load(workbook, &SOLD_FLIPS)?;
    let kiavi_loans = Table::load(workbook, &KIAVI_LOANS)?;
    let flip_inventory = Table::load(workbook, &FLIP_INVENTORY)?;

    Ok(ChartBundle {
        history: history_series(&sold_flips)?,
        scatter: scatter_series(&sold_flips)?,
        cash_flow: cash_flow_series(&kiavi_loans)?,
        lead_channel: lead_channel_series(&flip_inventory)?,
    })
}
