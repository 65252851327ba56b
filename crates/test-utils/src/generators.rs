//! Test data generators for synthetic gridded NetCDF files.
//!
//! The grids are predictable so tests can check the values that come back
//! out of the inspector, the reference generator and the thumbnail renderer.

use std::path::Path;

/// Creates a sea-surface-temperature-like grid in degrees Celsius.
///
/// Values rise linearly from 0.0 at row 0, col 0 to 30.0 at the last cell,
/// in row-major order.
///
/// # Example
///
/// ```
/// use test_utils::create_sst_grid;
///
/// let grid = create_sst_grid(3, 2);
/// assert_eq!(grid.len(), 6);
/// assert_eq!(grid[0], 0.0);
/// assert_eq!(grid[5], 30.0);
/// ```
pub fn create_sst_grid(width: usize, height: usize) -> Vec<f64> {
    let n = width * height;
    let denom = n.saturating_sub(1).max(1) as f64;
    (0..n).map(|i| 30.0 * i as f64 / denom).collect()
}

/// Creates a grid with NaN values at specified `(col, row)` positions, zeros elsewhere.
pub fn create_grid_with_nans(width: usize, height: usize, nan_positions: &[(usize, usize)]) -> Vec<f64> {
    let mut data = vec![0.0; width * height];
    for &(col, row) in nan_positions {
        if col < width && row < height {
            data[row * width + col] = f64::NAN;
        }
    }
    data
}

/// Evenly spaced values from `start` to `end`, both inclusive.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

/// Value written in place of NaN cells, declared as `missing_value`.
pub const MISSING_VALUE: f64 = -999.0;

/// Builder for a small CF-style NetCDF file.
///
/// The data variable has dimensions `(time, [level,] lat, lon)`. By default the
/// file carries `geospatial_*` global attributes matching the coordinates.
///
/// ```ignore
/// NetcdfFixture::new((-10.0, 40.0, 10.0, 60.0), (5, 4))
///     .on_date("2022-01-01")
///     .with_global_attr("title", "SST")
///     .write(&path)?;
/// ```
#[derive(Debug, Clone)]
pub struct NetcdfFixture {
    pub variable: String,
    pub lon: Vec<f64>,
    pub lat: Vec<f64>,
    pub time_units: String,
    pub times: Vec<f64>,
    pub levels: Option<Vec<f64>>,
    pub data: Option<Vec<f64>>,
    pub global_attrs: Vec<(String, String)>,
    pub geospatial_attrs: bool,
}

impl NetcdfFixture {
    /// A `width` x `height` grid spanning `(min_lon, min_lat, max_lon, max_lat)`.
    pub fn new(bbox: (f64, f64, f64, f64), size: (usize, usize)) -> Self {
        let (min_lon, min_lat, max_lon, max_lat) = bbox;
        let (width, height) = size;
        Self {
            variable: "sst".to_string(),
            lon: linspace(min_lon, max_lon, width),
            lat: linspace(min_lat, max_lat, height),
            time_units: "days since 1970-01-01 00:00:00".to_string(),
            times: vec![0.0],
            levels: None,
            data: None,
            global_attrs: Vec::new(),
            geospatial_attrs: true,
        }
    }

    /// Single time step at midnight of `date` (`YYYY-MM-DD`).
    pub fn on_date(mut self, date: &str) -> Self {
        self.time_units = format!("days since {} 00:00:00", date);
        self.times = vec![0.0];
        self
    }

    pub fn with_times(mut self, units: &str, times: Vec<f64>) -> Self {
        self.time_units = units.to_string();
        self.times = times;
        self
    }

    /// Add a vertical `depth` axis with `positive = "down"`.
    pub fn with_levels(mut self, levels: Vec<f64>) -> Self {
        self.levels = Some(levels);
        self
    }

    /// Explicit data, row-major over `(time, [level,] lat, lon)`. NaN is written as missing.
    pub fn with_data(mut self, data: Vec<f64>) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_global_attr(mut self, key: &str, value: &str) -> Self {
        self.global_attrs.push((key.to_string(), value.to_string()));
        self
    }

    /// Leave out the `geospatial_*` attributes so the bbox comes from coordinates.
    pub fn without_geospatial_attrs(mut self) -> Self {
        self.geospatial_attrs = false;
        self
    }

    fn cell_count(&self) -> usize {
        let levels = self.levels.as_ref().map_or(1, Vec::len);
        self.times.len() * levels * self.lat.len() * self.lon.len()
    }

    /// Write the file to `path`, replacing anything already there.
    pub fn write(&self, path: &Path) -> Result<(), netcdf::Error> {
        let mut file = netcdf::create(path)?;

        file.add_dimension("time", self.times.len())?;
        file.add_dimension("lat", self.lat.len())?;
        file.add_dimension("lon", self.lon.len())?;
        if let Some(levels) = &self.levels {
            file.add_dimension("depth", levels.len())?;
        }

        let mut time = file.add_variable::<f64>("time", &["time"])?;
        time.put_attribute("units", self.time_units.as_str())?;
        time.put_attribute("standard_name", "time")?;
        time.put_values(&self.times, ..)?;

        let mut lat = file.add_variable::<f64>("lat", &["lat"])?;
        lat.put_attribute("units", "degrees_north")?;
        lat.put_attribute("standard_name", "latitude")?;
        lat.put_values(&self.lat, ..)?;

        let mut lon = file.add_variable::<f64>("lon", &["lon"])?;
        lon.put_attribute("units", "degrees_east")?;
        lon.put_attribute("standard_name", "longitude")?;
        lon.put_values(&self.lon, ..)?;

        if let Some(levels) = &self.levels {
            let mut depth = file.add_variable::<f64>("depth", &["depth"])?;
            depth.put_attribute("units", "m")?;
            depth.put_attribute("positive", "down")?;
            depth.put_values(levels, ..)?;
        }

        let dims: Vec<&str> = if self.levels.is_some() {
            vec!["time", "depth", "lat", "lon"]
        } else {
            vec!["time", "lat", "lon"]
        };
        let data: Vec<f64> = match &self.data {
            Some(data) => data.clone(),
            None => {
                let grid = create_sst_grid(self.lon.len(), self.lat.len());
                grid.iter().copied().cycle().take(self.cell_count()).collect()
            }
        };
        let data: Vec<f64> = data
            .into_iter()
            .map(|v| if v.is_nan() { MISSING_VALUE } else { v })
            .collect();

        let mut var = file.add_variable::<f64>(&self.variable, &dims)?;
        var.put_attribute("long_name", "Sea surface temperature")?;
        var.put_attribute("units", "degC")?;
        var.put_attribute("standard_name", "sea_surface_temperature")?;
        var.put_attribute("missing_value", MISSING_VALUE)?;
        var.put_values(&data, ..)?;

        for (key, value) in &self.global_attrs {
            file.add_attribute(key, value.as_str())?;
        }

        if self.geospatial_attrs {
            let (lon_min, lon_max) = min_max(&self.lon);
            let (lat_min, lat_max) = min_max(&self.lat);
            file.add_attribute("geospatial_lon_min", lon_min)?;
            file.add_attribute("geospatial_lon_max", lon_max)?;
            file.add_attribute("geospatial_lat_min", lat_min)?;
            file.add_attribute("geospatial_lat_max", lat_max)?;
        }

        Ok(())
    }
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)))
}
