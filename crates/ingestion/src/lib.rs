//! NetCDF to STAC conversion.
//!
//! Merges layered JSON configuration, inspects each input file, and writes
//! one STAC item per file plus a collection covering them all. Optional side
//! files per item: a chunked-reference ("kerchunk") JSON and a PNG thumbnail.
//!
//! Processing is sequential. The collection extent is an explicit value:
//! [`Converter::process_item`] takes the running extent and returns it
//! widened, and [`Converter::finalise_collection`] writes it once at the end.

pub mod config;
pub mod context;
pub mod converter;
pub mod error;
pub mod layout;

// Re-exports
pub use config::{load_config, merge, ConverterConfig, Defaults};
pub use context::PropertyContext;
pub use converter::{ConvertOptions, Converter, ItemOutcome, RunSummary};
pub use error::{IngestionError, Result};
pub use layout::{collection_href, expand_inputs, ItemPaths};
