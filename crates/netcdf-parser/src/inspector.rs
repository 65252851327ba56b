//! Per-file metadata extraction.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use stac_common::grid::finite_range;
use stac_common::{BoundingBox, CfTimeUnits, FieldSource, GridField, StacResult};
use tracing::debug;

use crate::attributes::{as_f64, normalize_null, to_json};
use crate::error::{NetCdfError, NetCdfResult};
use crate::native;

/// Global attributes that describe the bbox, in `[lon_min, lat_min, lon_max, lat_max]` order.
const GEOSPATIAL_ATTRS: [&str; 4] = [
    "geospatial_lon_min",
    "geospatial_lat_min",
    "geospatial_lon_max",
    "geospatial_lat_max",
];

const LATITUDE_NAMES: [&str; 2] = ["lat", "latitude"];
const LONGITUDE_NAMES: [&str; 2] = ["lon", "longitude"];
const TIME_NAME: &str = "time";

/// CF standard names that mark a vertical coordinate.
const VERTICAL_STANDARD_NAMES: [&str; 8] = [
    "depth",
    "height",
    "altitude",
    "air_pressure",
    "height_above_geopotential_datum",
    "atmosphere_hybrid_sigma_pressure_coordinate",
    "atmosphere_sigma_coordinate",
    "model_level_number",
];

/// Which global attributes become item properties, and under what name.
#[derive(Debug, Clone, Default)]
pub struct InspectorOptions {
    pub global_attrs: Vec<String>,
    pub global_attr_map: HashMap<String, String>,
}

/// Descriptive attributes of the inspected variable.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableProperties {
    pub variable_id: String,
    pub long_name: Option<String>,
    pub units: Option<String>,
    pub standard_name: Option<String>,
}

/// An open NetCDF file plus the variable it is catalogued by.
///
/// The file stays open for the inspector's lifetime so the thumbnail renderer
/// can read from it later; dropping the inspector closes it.
pub struct NcFileInspector {
    file: netcdf::File,
    path: PathBuf,
    var_id: String,
    options: InspectorOptions,
}

impl NcFileInspector {
    /// Open `path`. Fails if the file or `var_id` is missing.
    pub fn open(path: impl AsRef<Path>, var_id: &str, options: InspectorOptions) -> NetCdfResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = native::open(&path)?;

        if file.variable(var_id).is_none() {
            return Err(NetCdfError::MissingData(format!(
                "variable '{}' in {}",
                var_id,
                path.display()
            )));
        }

        Ok(Self {
            file,
            path,
            var_id: var_id.to_string(),
            options,
        })
    }

    /// A global attribute as JSON, or `None` if absent.
    pub fn global_attr(&self, key: &str) -> Option<Value> {
        if !native::has_global_attr(&self.file, key) {
            return None;
        }
        let value = self.file.attribute(key)?.value().ok()?;
        Some(to_json(value))
    }

    /// The configured global attributes, renamed and null-normalized.
    ///
    /// Absent attributes are present in the result as `null`.
    pub fn properties(&self) -> Map<String, Value> {
        let mut props = Map::new();
        for key in &self.options.global_attrs {
            let value = self.global_attr(key).map(normalize_null).unwrap_or(Value::Null);
            let key = self.options.global_attr_map.get(key).unwrap_or(key);
            props.insert(key.clone(), value);
        }
        props
    }

    /// Long name, units and standard name of the inspected variable.
    pub fn variable_properties(&self) -> NetCdfResult<VariableProperties> {
        let var = self.variable(&self.var_id)?;
        Ok(VariableProperties {
            variable_id: self.var_id.clone(),
            long_name: native::get_string_attr(&var, "long_name"),
            units: native::get_string_attr(&var, "units"),
            standard_name: native::get_string_attr(&var, "standard_name"),
        })
    }

    /// The `index`-th value of the time axis as a UTC instant.
    pub fn datetime(&self, index: usize) -> NetCdfResult<DateTime<Utc>> {
        let var = self.variable(TIME_NAME)?;
        let units = native::get_string_attr(&var, "units")
            .ok_or_else(|| NetCdfError::MissingData(format!("units of '{}'", TIME_NAME)))?;
        let units = CfTimeUnits::parse(&units)?;

        let values: Vec<f64> = var.get_values(..)?;
        let value = values.get(index).copied().ok_or_else(|| {
            NetCdfError::MissingData(format!("time index {} of {}", index, values.len()))
        })?;

        Ok(units.to_datetime(value)?)
    }

    /// Bounding box from the geospatial attributes, else from the coordinates.
    pub fn bbox(&self) -> NetCdfResult<BoundingBox> {
        let from_attrs = GEOSPATIAL_ATTRS
            .iter()
            .map(|key| match self.global_attr(key) {
                None => Ok(None),
                Some(value) => as_f64(&value).map(Some).ok_or_else(|| {
                    NetCdfError::InvalidFormat(format!("global attribute '{}' is not numeric: {}", key, value))
                }),
            })
            .collect::<NetCdfResult<Option<Vec<f64>>>>()?;

        if let Some(v) = from_attrs {
            return Ok(BoundingBox::new(v[0], v[1], v[2], v[3]));
        }

        debug!(path = %self.path.display(), "No geospatial metadata, computing bbox from coordinates");

        let (lat_min, lat_max) = self.coordinate_range(&LATITUDE_NAMES)?;
        let (lon_min, lon_max) = self.coordinate_range(&LONGITUDE_NAMES)?;
        Ok(BoundingBox::new(lon_min, lat_min, lon_max, lat_max))
    }

    /// First and last value of the vertical axis, if the file has one.
    pub fn levels(&self) -> Option<[f64; 2]> {
        let var = self.file.variables().find(|v| is_vertical(v))?;
        match var.get_values::<f64, _>(..) {
            Ok(values) => Some([*values.first()?, *values.last()?]),
            Err(e) => {
                debug!(variable = %var.name(), error = %e, "Vertical axis unreadable");
                None
            }
        }
    }

    fn variable(&self, name: &str) -> NetCdfResult<netcdf::Variable<'_>> {
        self.file
            .variable(name)
            .ok_or_else(|| NetCdfError::MissingData(format!("variable '{}' in {}", name, self.path.display())))
    }

    fn coordinate_range(&self, names: &[&str]) -> NetCdfResult<(f64, f64)> {
        let name = names
            .iter()
            .find(|n| self.file.variable(n).is_some())
            .ok_or_else(|| NetCdfError::MissingData(format!("coordinate {}", names.join(" or "))))?;
        let values = native::read_unpacked(&self.variable(name)?)?;
        finite_range(&values)
            .ok_or_else(|| NetCdfError::InvalidFormat(format!("coordinate '{}' has no finite values", name)))
    }
}

fn is_vertical(var: &netcdf::Variable) -> bool {
    if var.dimensions().len() != 1 {
        return false;
    }
    if native::get_string_attr(var, "axis").is_some_and(|a| a.eq_ignore_ascii_case("z")) {
        return true;
    }
    if native::has_attr(var, "positive") {
        return true;
    }
    native::get_string_attr(var, "standard_name")
        .is_some_and(|s| VERTICAL_STANDARD_NAMES.contains(&s.as_str()))
}

impl FieldSource for NcFileInspector {
    fn field(&self, name: &str) -> StacResult<GridField> {
        let var = self.variable(name)?;
        let (dims, shape) = native::dimensions(&var);
        let values = native::read_unpacked(&var)?;
        GridField::new(name, dims, shape, values)
    }

    fn coordinate(&self, name: &str) -> StacResult<Vec<f64>> {
        let var = self.variable(name)?;
        Ok(native::read_unpacked(&var)?)
    }
}
