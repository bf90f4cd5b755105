//! Currency normalization.
//!
//! Portfolio spreadsheets store amounts as display text ("$1,234.50",
//! "(500)") as often as real numbers. Everything funnels through
//! [`normalize`] before a value reaches a chart series.

use crate::error::FlipfolioError;
use crate::workbook::CellValue;
use once_cell::sync::Lazy;
use regex::Regex;

/// Formatting characters stripped before the numeric parse.
static FORMATTING: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\(\)\$,]").expect("Hardcoded pattern"));

/// Converts a cell into a signed amount.
///
/// Already-numeric cells pass through as `f64`. Text cells are stripped of
/// `$`, `,` and parentheses, with a `(...)` wrapping negating the result.
/// Anything that still fails to parse propagates as `CurrencyParse`; invalid
/// amounts are never zeroed or silently dropped.
pub fn normalize(cell: &CellValue) -> Result<f64, FlipfolioError> {
    match cell {
        CellValue::Number(value) => Ok(*value),
        CellValue::Text(raw) => {
            let trimmed = raw.trim();
            let negated = trimmed.starts_with('(') && trimmed.ends_with(')');
            let stripped = FORMATTING.replace_all(trimmed, "");
            let value = stripped
                .trim()
                .parse::<f64>()
                .map_err(|_| FlipfolioError::CurrencyParse { value: raw.clone() })?;
            Ok(if negated { -value } else { value })
        }
        other => Err(FlipfolioError::CurrencyParse {
            value: other.to_string(),
        }),
    }
}
