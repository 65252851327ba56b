//! Thumbnail rendering for gridded data.
//!
//! A variable is squeezed to two dimensions, rasterized onto a fixed-width
//! canvas by nearest-neighbour lookup, colored with a linear colormap and
//! written as PNG.

pub mod colormap;
pub mod error;
pub mod png;
pub mod raster;
pub mod thumbnail;

pub use colormap::Colormap;
pub use error::{RenderError, RenderResult};
pub use thumbnail::{Thumbnail, ThumbnailSettings};
