//! Error types for the ENA formats library.

use std::path::PathBuf;
use thiserror::Error;

use crate::pipeline::Stage;

/// Main error type for ENA format operations.
#[derive(Debug, Error)]
pub enum EnaError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The text could not be parsed into the expected tabular or XML shape.
    #[error("Format error: {0}")]
    Format(String),

    /// The text parsed but failed a content rule.
    #[error("{0}")]
    Validation(String),

    /// A pipeline operation was invoked in the wrong stage.
    #[error("Invalid pipeline state: expected {expected}, found {found}")]
    InvalidState { expected: Stage, found: Stage },
}

impl EnaError {
    /// Whether this is a content-rule failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, EnaError::Validation(_))
    }

    /// Whether this is a shape/parse failure.
    pub fn is_format(&self) -> bool {
        matches!(self, EnaError::Format(_))
    }
}

impl From<csv::Error> for EnaError {
    fn from(err: csv::Error) -> Self {
        EnaError::Format(format!("CSV error: {}", err))
    }
}

/// Result type alias for ENA format operations.
pub type Result<T> = std::result::Result<T, EnaError>;
