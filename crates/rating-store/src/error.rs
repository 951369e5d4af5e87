//! Error types for the rating-store crate.
//!
//! Only the I/O and parsing edges can fail. Everything inside the store
//! and the predictor is total: missing data is answered with `0.0`.

use thiserror::Error;

/// Errors that can occur while loading records or writing predictions
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading or writing
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Line in a data file couldn't be parsed
    ///
    /// Raised for unparseable numbers and for an invalid field separator.
    /// Nothing from the offending line is kept.
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// Expected number of fields in a line doesn't match actual
    #[error("Expected {expected} fields but found {found} at line {line} in {file}")]
    FieldCountMismatch {
        file: String,
        expected: usize,
        found: usize,
        line: usize,
    },
}

impl DataLoadError {
    /// True for errors caused by the content of a record rather than by I/O
    pub fn is_malformed_record(&self) -> bool {
        matches!(
            self,
            DataLoadError::ParseError { .. } | DataLoadError::FieldCountMismatch { .. }
        )
    }
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
