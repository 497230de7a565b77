//! Seed import error types

use thiserror::Error;

use crate::storage::StorageError;

/// Errors that can occur while importing seed data
#[derive(Error, Debug)]
pub enum ImportError {
    /// Importing is switched off in configuration
    #[error("Seed import is disabled")]
    Disabled,

    #[error("Seed source unreachable: {0}")]
    Unavailable(String),

    #[error("Seed request timed out")]
    Timeout,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Source answered with a non-success status
    #[error("Seed source returned {status}: {message}")]
    Upstream { status: u16, message: String },

    /// Payload is not a JSON array of sale records
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<serde_json::Error> for ImportError {
    fn from(e: serde_json::Error) -> Self {
        ImportError::Parse(e.to_string())
    }
}

/// Result type for import operations
pub type ImportResult<T> = Result<T, ImportError>;
