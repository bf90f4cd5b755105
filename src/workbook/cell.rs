use calamine::Data;
use chrono::{DateTime, NaiveDateTime};
use std::fmt::Display;

/// A single cell value after loading, decoupled from the spreadsheet engine.
///
/// Raw calamine data is converted exactly once when a workbook is opened, so
/// the extraction pipeline (and tests) only ever deal with this enum.
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    /// Missing cell or empty value
    Empty,
    /// Boolean values (true/false)
    Bool(bool),
    /// Numeric values; integers are widened to f64
    Number(f64),
    /// String values
    Text(String),
    /// Date/time values resolved from Excel serial or ISO representations
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// True when the cell counts as missing for "drop rows with any null" semantics.
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Extracts the numeric value, if the cell holds one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    /// True when the cell is numeric-parseable: a native number, or text that
    /// parses as a decimal numeral. Mirrors `pd.to_numeric(errors="coerce")`,
    /// used to separate categorical labels from numeric artifacts.
    pub fn is_numeric(&self) -> bool {
        match self {
            CellValue::Number(_) => true,
            CellValue::Text(value) => value.trim().parse::<f64>().is_ok(),
            _ => false,
        }
    }

    /// Formats the cell as a `YYYY-MM-DD` date label.
    ///
    /// Accepts real date/time cells as well as text cells already holding an
    /// ISO-formatted date. Returns None for anything else.
    pub fn as_date_label(&self) -> Option<String> {
        match self {
            CellValue::DateTime(datetime) => Some(datetime.format("%Y-%m-%d").to_string()),
            CellValue::Text(value) => chrono::NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
                .ok()
                .map(|date| date.format("%Y-%m-%d").to_string()),
            _ => None,
        }
    }
}

impl From<Data> for CellValue {
    /// Converts the engine's cell data, resolving Excel date serials through
    /// chrono. Error cells degrade to `Empty` so they are dropped with the
    /// other missing values instead of poisoning a whole sheet.
    fn from(data: Data) -> Self {
        match data {
            Data::Empty => CellValue::Empty,
            Data::Error(_) => CellValue::Empty,
            Data::Bool(value) => CellValue::Bool(value),
            Data::Int(value) => CellValue::Number(value as f64),
            Data::Float(value) => CellValue::Number(value),
            Data::String(value) => CellValue::Text(value),
            Data::DateTime(value) => match value.as_datetime() {
                Some(datetime) => CellValue::DateTime(datetime),
                None => CellValue::Number(value.as_f64()),
            },
            Data::DateTimeIso(value) => parse_iso_datetime(&value)
                .map(CellValue::DateTime)
                .unwrap_or(CellValue::Text(value)),
            Data::DurationIso(value) => CellValue::Text(value),
        }
    }
}

fn parse_iso_datetime(value: &str) -> Option<NaiveDateTime> {
    if value.contains('T') {
        NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .or_else(|| {
                DateTime::parse_from_rfc3339(value)
                    .ok()
                    .map(|datetime| datetime.naive_local())
            })
    } else {
        chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
    }
}

impl Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Bool(value) => write!(f, "{}", value),
            CellValue::Number(value) => {
                if value.fract() == 0.0 && value.abs() < 1e15 {
                    write!(f, "{}", *value as i64)
                } else {
                    write!(f, "{}", value)
                }
            }
            CellValue::Text(value) => write!(f, "{}", value),
            CellValue::DateTime(datetime) => {
                let time = datetime.time();
                if time == chrono::NaiveTime::MIN {
                    write!(f, "{}", datetime.format("%Y-%m-%d"))
                } else {
                    write!(f, "{}", datetime.format("%Y-%m-%d %H:%M:%S"))
                }
            }
        }
    }
}
