//! # flipfolio
//!
//! Turns an uploaded real-estate portfolio workbook (`.xlsx`, `.xls`) into
//! chart-ready data series and a flattened text summary.
//!
//! ## Features
//!
//! - **Chart extraction**: four fixed series (sale history, inventory vs.
//!   price, loan cash flow, lead channels) built from named sheets with
//!   per-sheet header offsets
//! - **Currency normalization**: display-formatted amounts ("$1,234.50",
//!   "(500)") cleaned into signed numbers
//! - **Typed column access**: requested columns validated once at load time,
//!   rows with missing values dropped before filtering
//! - **Text summarization**: every sheet rendered to plain text for embedding
//!   into a completion-service prompt, degrading to the error description
//!   instead of failing
//! - **Injected storage**: workbook acquisition behind a capability trait,
//!   with a local-directory implementation
//!
//! The chart pipeline fails loud with typed errors; the summarizer fails as
//! text. That asymmetry is deliberate and matches the system this crate
//! serves.

pub mod charts;
pub mod currency;
pub mod error;
pub mod store;
pub mod summary;
pub mod workbook;

pub use charts::{extract_charts, ChartBundle, Series};
pub use error::FlipfolioError;
pub use store::{chart_data_for, summary_for, LocalStore, WorkbookStore};
pub use summary::{summarize, summarize_path};
pub use workbook::{CellValue, Sheet, SheetLayout, Table, Workbook};
