//! Error types shared by the catalog tools.

use thiserror::Error;

/// Result type alias using StacError.
pub type StacResult<T> = Result<T, StacError>;

/// Primary error type for catalog record handling.
#[derive(Debug, Error)]
pub enum StacError {
    #[error("Invalid time specification: {0}")]
    InvalidTime(String),

    #[error("Invalid template '{template}': {message}")]
    Template { template: String, message: String },

    #[error("Unknown template field '{field}' in '{template}'")]
    UnknownTemplateField { template: String, field: String },

    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    #[error("Failed to read data: {0}")]
    DataReadError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
