//! Error types for NetCDF inspection.

use stac_common::StacError;
use thiserror::Error;

/// Result type for NetCDF parser operations.
pub type NetCdfResult<T> = Result<T, NetCdfError>;

/// Error types for NetCDF parsing.
#[derive(Error, Debug)]
pub enum NetCdfError {
    /// File I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error reported by libnetcdf
    #[error("NetCDF error: {0}")]
    NetCdf(#[from] netcdf::Error),

    /// Missing required variable or attribute
    #[error("Missing required data: {0}")]
    MissingData(String),

    /// Invalid data format
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    /// Time axis could not be decoded
    #[error("Invalid time axis: {0}")]
    InvalidTime(#[from] StacError),

    /// External reference generator failed
    #[error("Command execution failed: {0}")]
    CommandError(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<NetCdfError> for StacError {
    fn from(err: NetCdfError) -> Self {
        match err {
            NetCdfError::InvalidTime(inner) => inner,
            other => StacError::DataReadError(other.to_string()),
        }
    }
}
