//! Workbook acquisition.
//!
//! Which workbook belongs to which user is owned by an external storage
//! collaborator; the core only needs a readable local path. The collaborator
//! is injected through [`WorkbookStore`] so the pipeline can run against an
//! in-memory fake in tests.

use crate::charts::{self, ChartBundle};
use crate::error::FlipfolioError;
use crate::summary;
use crate::workbook::Workbook;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Text returned by the summary pathway when the user has no upload.
pub const NO_UPLOAD_SUMMARY: &str = "No uploaded file found.";
/// Text returned by the summary pathway when the upload cannot be retrieved.
pub const UNRETRIEVABLE_SUMMARY: &str = "Error: File could not be retrieved.";

/// Resolves a user identity to their uploaded workbook file.
pub trait WorkbookStore {
    /// Returns a readable local path to the user's workbook, or
    /// `WorkbookNotFound` when the user has no upload.
    fn resolve(&self, user: &str) -> Result<PathBuf, FlipfolioError>;
}

/// Directory-backed store. Uploads are stored under the hex SHA-256 of the
/// user identity so file names never leak the identity itself.
pub struct LocalStore {
    root: PathBuf,
}

/// Extensions accepted for uploaded workbooks.
const UPLOAD_EXTENSIONS: [&str; 2] = ["xlsx", "xls"];

impl LocalStore {
    pub fn new<P: AsRef<Path>>(root: P) -> LocalStore {
        LocalStore {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Path an upload for `user` would be stored at, for the given extension.
    pub fn upload_path(&self, user: &str, extension: &str) -> PathBuf {
        let digest = Sha256::digest(user.as_bytes());
        let name = digest.iter().fold(String::new(), |mut hex, byte| {
            hex.push_str(&format!("{:02x}", byte));
            hex
        });
        self.root.join(name).with_extension(extension)
    }
}

impl WorkbookStore for LocalStore {
    fn resolve(&self, user: &str) -> Result<PathBuf, FlipfolioError> {
        for extension in UPLOAD_EXTENSIONS {
            let path = self.upload_path(user, extension);
            if path.is_file() {
                return Ok(path);
            }
        }
        Err(FlipfolioError::WorkbookNotFound {
            user: user.to_owned(),
        })
    }
}

/// Resolves, loads and extracts the chart bundle for one user.
///
/// Failure detail (which sheet or column broke) is logged here; callers are
/// expected to surface only [`FlipfolioError::EXTRACTION_FAILED`], except for
/// the distinct not-found case.
pub fn chart_data_for(store: &dyn WorkbookStore, user: &str) -> Result<ChartBundle, FlipfolioError> {
    let path = store.resolve(user)?;
    let bundle = Workbook::open(&path).and_then(|workbook| charts::extract_charts(&workbook));
    if let Err(error) = &bundle {
        tracing::error!(user, %error, "error processing chart data");
    }
    bundle
}

/// Resolves and summarizes the workbook for one user.
///
/// Never fails: a missing upload and an unretrievable upload each degrade to
/// a fixed sentence, and parse failures degrade to the error description.
pub fn summary_for(store: &dyn WorkbookStore, user: &str) -> String {
    match store.resolve(user) {
        Ok(path) => summary::summarize_path(path),
        Err(FlipfolioError::WorkbookNotFound { .. }) => NO_UPLOAD_SUMMARY.to_owned(),
        Err(error) => {
            tracing::error!(user, %error, "error retrieving file");
            UNRETRIEVABLE_SUMMARY.to_owned()
        }
    }
}
