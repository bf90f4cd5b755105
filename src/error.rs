use thiserror::Error;

/// Main error type for the flipfolio pipeline.
/// Covers workbook acquisition, sheet loading, column extraction and
/// currency normalization failures.
#[derive(Error, Debug)]
pub enum FlipfolioError {
    // Workbook acquisition / parsing
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid xlsx file format: {0}")]
    InvalidXlsxFileFormat(#[from] calamine::XlsxError),

    #[error("Invalid xls file format: {0}")]
    InvalidXlsFileFormat(#[from] calamine::XlsError),

    /// Unsupported or unrecognized file format
    #[error("Cannot detect file format for '{name}'")]
    InvalidFileFormat { name: String },

    /// The user has no uploaded workbook associated with them.
    /// Distinct from extraction failures so callers can answer "not found".
    #[error("No uploaded file found for '{user}'")]
    WorkbookNotFound { user: String },

    // Extraction
    #[error("Sheet '{name}' not found in workbook")]
    SheetNotFound { name: String },

    #[error("Sheet '{name}' is malformed: {reason}")]
    MalformedSheet { name: String, reason: String },

    #[error("Column '{column}' not found in sheet '{sheet}'")]
    ColumnNotFound { sheet: String, column: String },

    #[error("Cannot parse '{value}' as a currency amount")]
    CurrencyParse { value: String },
}

impl FlipfolioError {
    /// Generic user-facing message for any chart extraction failure.
    /// The failing sheet/column stays in the internal log only.
    pub const EXTRACTION_FAILED: &'static str = "Error extracting data from Excel file.";
}
