//! Error types for the ingestion crate.

use netcdf_parser::NetCdfError;
use renderer::RenderError;
use stac_common::StacError;
use thiserror::Error;

/// Errors that can occur while converting files to STAC records.
#[derive(Error, Debug)]
pub enum IngestionError {
    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A configuration key needed by an enabled feature is absent
    #[error("Missing configuration key '{0}'")]
    MissingConfig(&'static str),

    #[error("Invalid input pattern: {0}")]
    InvalidPattern(String),

    #[error("Failed to inspect NetCDF data: {0}")]
    NetCdf(#[from] NetCdfError),

    #[error("Failed to render thumbnail: {0}")]
    Render(#[from] RenderError),

    #[error(transparent)]
    Stac(#[from] StacError),
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestionError>;
