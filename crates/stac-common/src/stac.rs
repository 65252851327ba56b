//! STAC item and collection records.
//!
//! Only the parts of the STAC 1.0 object model the converter writes are
//! typed; anything else found in an existing collection document is kept in
//! `extra_fields` and written back unchanged.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::bbox::BoundingBox;
use crate::error::StacResult;

pub const STAC_VERSION: &str = "1.0.0";

/// Schema URL of the STAC CF extension stamped on items and collections.
pub const CF_EXTENSION: &str = "https://stac-extensions.github.io/cf/v0.2.0/schema.json";

/// A hyperlink to a related resource.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Link {
    /// The relationship type (e.g., "collection", "root").
    pub rel: String,

    /// The URI of the linked resource.
    pub href: String,

    /// The media type of the linked resource.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,

    /// A human-readable title for the link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Link {
    /// Create a new link with required fields.
    pub fn new(href: impl Into<String>, rel: impl Into<String>) -> Self {
        Self {
            rel: rel.into(),
            href: href.into(),
            type_: None,
            title: None,
        }
    }

    /// Set the media type.
    pub fn with_type(mut self, type_: impl Into<String>) -> Self {
        self.type_ = Some(type_.into());
        self
    }
}

/// GeoJSON polygon geometry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub type_: String,
    pub coordinates: Vec<Vec<[f64; 2]>>,
}

impl Geometry {
    pub fn polygon(rings: Vec<Vec<[f64; 2]>>) -> Self {
        Self {
            type_: "Polygon".to_string(),
            coordinates: rings,
        }
    }
}

/// A file referenced by an item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Asset {
    pub href: String,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,

    #[serde(flatten)]
    pub extra_fields: Map<String, Value>,
}

impl Asset {
    pub fn new(href: impl Into<String>, media_type: impl Into<String>, roles: &[&str]) -> Self {
        Self {
            href: href.into(),
            media_type: Some(media_type.into()),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            extra_fields: Map::new(),
        }
    }

    /// Merge configured defaults into the asset.
    ///
    /// Keys that name a typed field (`href`, `type`, `roles`) replace it;
    /// everything else becomes an extra field.
    pub fn with_extra_fields(mut self, fields: &Map<String, Value>) -> Self {
        for (key, value) in fields {
            match (key.as_str(), value) {
                ("href", Value::String(href)) => self.href = href.clone(),
                ("type", Value::String(media_type)) => self.media_type = Some(media_type.clone()),
                ("roles", Value::Array(roles)) => {
                    self.roles = roles
                        .iter()
                        .filter_map(|r| r.as_str().map(str::to_string))
                        .collect();
                }
                _ => {
                    self.extra_fields.insert(key.clone(), value.clone());
                }
            }
        }
        self
    }
}

/// A STAC item (GeoJSON feature) describing one input file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    #[serde(rename = "type")]
    pub type_: String,
    pub stac_version: String,
    #[serde(default)]
    pub stac_extensions: Vec<String>,
    pub id: String,
    pub geometry: Geometry,
    pub bbox: BoundingBox,
    pub properties: Map<String, Value>,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub assets: BTreeMap<String, Asset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
}

impl Item {
    /// Create an item whose geometry is the bbox rectangle.
    pub fn new(id: impl Into<String>, bbox: BoundingBox, properties: Map<String, Value>) -> Self {
        Self {
            type_: "Feature".to_string(),
            stac_version: STAC_VERSION.to_string(),
            stac_extensions: vec![CF_EXTENSION.to_string()],
            id: id.into(),
            geometry: bbox.to_polygon(),
            bbox,
            properties,
            links: Vec::new(),
            assets: BTreeMap::new(),
            collection: None,
        }
    }

    /// Stamp a single instant as `properties.datetime`.
    pub fn set_datetime(&mut self, dt: &DateTime<Utc>) {
        self.properties
            .insert("datetime".to_string(), datetime_value(dt));
    }

    /// Stamp `start_datetime` / `end_datetime`.
    pub fn set_interval(&mut self, start: &DateTime<Utc>, end: &DateTime<Utc>) {
        self.properties
            .insert("start_datetime".to_string(), datetime_value(start));
        self.properties
            .insert("end_datetime".to_string(), datetime_value(end));
    }

    pub fn add_link(&mut self, link: Link) {
        self.links.push(link);
    }

    pub fn add_asset(&mut self, key: impl Into<String>, asset: Asset) {
        self.assets.insert(key.into(), asset);
    }

    pub fn to_json_pretty(&self) -> StacResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn datetime_value(dt: &DateTime<Utc>) -> Value {
    Value::String(format_datetime(dt))
}

/// RFC 3339 with a `Z` suffix, the form STAC documents use.
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(chrono::SecondsFormat::AutoSi, true)
}

/// The spatial extent of a collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpatialExtent {
    pub bbox: Vec<BoundingBox>,
}

/// The temporal extent of a collection; open ends are `null`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TemporalExtent {
    pub interval: Vec<[Option<DateTime<Utc>>; 2]>,
}

/// The spatial and temporal extent of a collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Extent {
    pub spatial: SpatialExtent,
    pub temporal: TemporalExtent,
}

impl Extent {
    pub fn new(bbox: BoundingBox, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self {
            spatial: SpatialExtent { bbox: vec![bbox] },
            temporal: TemporalExtent {
                interval: vec![[start, end]],
            },
        }
    }

    /// First bbox and first interval, the overall extent by STAC convention.
    pub fn overall(&self) -> (Option<BoundingBox>, Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        let bbox = self.spatial.bbox.first().copied();
        let (start, end) = self
            .temporal
            .interval
            .first()
            .map(|[start, end]| (*start, *end))
            .unwrap_or((None, None));
        (bbox, start, end)
    }
}

/// A STAC collection grouping the converted items.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Collection {
    #[serde(rename = "type")]
    pub type_: String,
    pub id: String,
    pub stac_version: String,
    pub description: String,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub stac_extensions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extent: Option<Extent>,
    pub license: String,
    #[serde(flatten)]
    pub extra_fields: Map<String, Value>,
}

impl Collection {
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            type_: "Collection".to_string(),
            id: id.into(),
            stac_version: STAC_VERSION.to_string(),
            description: description.into(),
            links: Vec::new(),
            stac_extensions: vec![CF_EXTENSION.to_string()],
            extent: None,
            license: "other".to_string(),
            extra_fields: Map::new(),
        }
    }

    /// Load a collection document from disk.
    pub fn from_file(path: impl AsRef<Path>) -> StacResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn to_json_pretty(&self) -> StacResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
