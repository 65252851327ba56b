//! Converter configuration.
//!
//! Configuration is given as one or more JSON documents, merged in order with
//! [`merge`] and then read into a typed [`ConverterConfig`].

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use renderer::ThumbnailSettings;
use serde::Deserialize;
use serde_json::{Map, Value};
use stac_common::ClimatologyInterval;
use tracing::debug;

use crate::error::{IngestionError, Result};

/// One side of a merge, classified by shape.
enum Node {
    Mapping(Map<String, Value>),
    Sequence(Vec<Value>),
    Scalar(Value),
    Absent,
}

impl From<Option<Value>> for Node {
    fn from(value: Option<Value>) -> Self {
        match value {
            None | Some(Value::Null) => Node::Absent,
            Some(Value::Object(map)) => Node::Mapping(map),
            Some(Value::Array(seq)) => Node::Sequence(seq),
            Some(scalar) => Node::Scalar(scalar),
        }
    }
}

impl From<Node> for Option<Value> {
    fn from(node: Node) -> Self {
        match node {
            Node::Mapping(map) => Some(Value::Object(map)),
            Node::Sequence(seq) => Some(Value::Array(seq)),
            Node::Scalar(value) => Some(value),
            Node::Absent => None,
        }
    }
}

fn merge_nodes(left: Node, right: Node) -> Node {
    match (left, right) {
        (left, Node::Absent) => left,
        (Node::Absent, right) => right,
        (Node::Sequence(mut l), Node::Sequence(r)) => {
            l.extend(r);
            Node::Sequence(l)
        }
        (Node::Mapping(mut l), Node::Mapping(r)) => {
            for (key, r_value) in r {
                let l_value = l.remove(&key);
                if let Some(merged) = merge_values(l_value, Some(r_value)) {
                    l.insert(key, merged);
                }
            }
            Node::Mapping(l)
        }
        (_, right) => right,
    }
}

fn merge_values(left: Option<Value>, right: Option<Value>) -> Option<Value> {
    merge_nodes(left.into(), right.into()).into()
}

/// Merge two configuration documents, `right` taking priority.
///
/// Mappings merge key by key, sequences concatenate, `null` counts as
/// absent, and for anything else the right-hand value wins.
pub fn merge(left: Value, right: Value) -> Value {
    merge_values(Some(left), Some(right)).unwrap_or(Value::Null)
}

/// Read and merge the configuration files in order.
pub fn load_config<P: AsRef<Path>>(paths: &[P]) -> Result<Value> {
    paths.iter().try_fold(Value::Object(Map::new()), |acc, path| {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            IngestionError::InvalidConfig(format!("cannot read {}: {}", path.display(), e))
        })?;
        let doc: Value = serde_json::from_str(&text).map_err(|e| {
            IngestionError::InvalidConfig(format!("{} is not valid JSON: {}", path.display(), e))
        })?;
        debug!(path = %path.display(), "Merged configuration file");
        Ok(merge(acc, doc))
    })
}

/// Metadata merged into each kind of record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Defaults {
    #[serde(default)]
    pub item: Map<String, Value>,
    #[serde(default)]
    pub netcdf_asset: Map<String, Value>,
    #[serde(default)]
    pub kerchunk_asset: Map<String, Value>,
    #[serde(default)]
    pub thumbnail_asset: Option<Map<String, Value>>,
}

/// The merged configuration, typed.
#[derive(Debug, Clone, Deserialize)]
pub struct ConverterConfig {
    /// Variable the items describe
    pub variable: String,
    pub dataset_id: String,
    /// Item property that receives `dataset_id`
    pub dset_id_name: String,

    #[serde(default)]
    pub global_attrs: Vec<String>,
    #[serde(default)]
    pub global_attr_map: HashMap<String, String>,
    #[serde(default)]
    pub templated_properties: BTreeMap<String, String>,
    #[serde(default)]
    pub defaults: Defaults,

    pub netcdf_url: Option<String>,
    pub kerchunk_url: Option<String>,
    pub thumbnail_url: Option<String>,

    pub climatology_interval: Option<[String; 2]>,
    pub thumbnail: Option<ThumbnailSettings>,

    pub stac_collection_id: Option<String>,
    pub stac_collection_description: Option<String>,

    /// External reference generator, run as `<cmd..> <input> <url> <output>`
    pub kerchunk_command: Option<Vec<String>>,
}

impl ConverterConfig {
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| IngestionError::InvalidConfig(e.to_string()))
    }

    pub fn from_paths<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        Self::from_value(load_config(paths)?)
    }

    pub fn climatology(&self) -> Result<Option<ClimatologyInterval>> {
        self.climatology_interval
            .as_ref()
            .map(|[start, end]| ClimatologyInterval::from_dates(start, end))
            .transpose()
            .map_err(|e| IngestionError::InvalidConfig(format!("climatology_interval: {}", e)))
    }

    pub fn netcdf_url(&self) -> Result<&str> {
        self.netcdf_url.as_deref().ok_or(IngestionError::MissingConfig("netcdf_url"))
    }

    pub fn kerchunk_url(&self) -> Result<&str> {
        self.kerchunk_url.as_deref().ok_or(IngestionError::MissingConfig("kerchunk_url"))
    }

    pub fn thumbnail_url(&self) -> Result<&str> {
        self.thumbnail_url.as_deref().ok_or(IngestionError::MissingConfig("thumbnail_url"))
    }
}
