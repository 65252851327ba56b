//! NetCDF inspection for catalog generation.
//!
//! Opens one gridded NetCDF file and pulls out what a STAC item needs:
//! global attributes, the bounding box, the reference time and the vertical
//! levels. The inspector also serves whole variables to the thumbnail
//! renderer through [`stac_common::FieldSource`].
//!
//! The [`kerchunk`] module writes chunked-reference ("kerchunk") side files.

pub mod attributes;
pub mod error;
pub mod inspector;
pub mod kerchunk;
pub mod native;

pub use error::{NetCdfError, NetCdfResult};
pub use inspector::{InspectorOptions, NcFileInspector, VariableProperties};
pub use kerchunk::{ExternalReferenceGenerator, InlineReferenceGenerator, ReferenceGenerator};
pub use native::silence_hdf5_errors;
