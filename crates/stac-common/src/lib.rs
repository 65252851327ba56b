//! Common types and utilities shared across the NetCDF to STAC tools.

pub mod bbox;
pub mod extent;
pub mod error;
pub mod grid;
pub mod stac;
pub mod template;
pub mod time;

pub use bbox::BoundingBox;
pub use extent::CollectionExtent;
pub use error::{StacError, StacResult};
pub use grid::{FieldSource, GridField};
pub use stac::{Asset, Collection, Extent, Geometry, Item, Link, SpatialExtent, TemporalExtent};
pub use template::{expand_date_template, expand_template, DateFields, TemplateFields, TemplateValue};
pub use time::{day_of_year, ClimatologyInterval, CfTimeUnits};
