//! Error types for thumbnail rendering.

use stac_common::StacError;
use thiserror::Error;

pub type RenderResult<T> = Result<T, RenderError>;

#[derive(Error, Debug)]
pub enum RenderError {
    /// No colormap file with this name
    #[error("Colormap not found: {0}")]
    ColormapNotFound(String),

    #[error("Invalid colormap {name}: {message}")]
    InvalidColormap { name: String, message: String },

    /// The variable is not 2-D after dropping length-one axes
    #[error("too many dimensions to plot {variable}: {dims:?}")]
    Dimensionality { variable: String, dims: Vec<String> },

    #[error("Coordinate mismatch: {0}")]
    Coordinates(String),

    #[error("Data error: {0}")]
    Data(#[from] StacError),

    #[error("PNG encoding failed: {0}")]
    Encode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
