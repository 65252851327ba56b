//! Thin helpers over the native netcdf library.

use std::path::Path;
use std::sync::Once;

use crate::error::{NetCdfError, NetCdfResult};

/// Turn off HDF5's automatic error printing.
///
/// libhdf5 writes `HDF5-DIAG` traces to stderr for lookups that fail
/// harmlessly, such as probing a variable for an optional attribute.
/// Called once per process from [`open`]; later calls are no-ops.
pub fn silence_hdf5_errors() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // SAFETY: null handler and client data disable printing for the
        // default error stack.
        unsafe {
            hdf5_metno_sys::h5e::H5Eset_auto2(
                hdf5_metno_sys::h5e::H5E_DEFAULT,
                None,
                std::ptr::null_mut(),
            );
        }
    });
}

/// Open a NetCDF file for reading.
pub fn open(path: &Path) -> NetCdfResult<netcdf::File> {
    silence_hdf5_errors();

    if !path.is_file() {
        return Err(NetCdfError::MissingData(format!("file {}", path.display())));
    }

    netcdf::open(path).map_err(|e| {
        NetCdfError::InvalidFormat(format!("Failed to open NetCDF {}: {}", path.display(), e))
    })
}

/// Check if a variable has an attribute with the given name.
/// This avoids HDF5 error spam when checking for optional attributes.
pub fn has_attr(var: &netcdf::Variable, name: &str) -> bool {
    var.attributes().any(|attr| attr.name() == name)
}

/// Check if the file has a global attribute with the given name.
pub fn has_global_attr(file: &netcdf::File, name: &str) -> bool {
    file.attributes().any(|attr| attr.name() == name)
}

/// Raw value of a variable attribute, if present and readable.
pub fn attr_value(var: &netcdf::Variable, name: &str) -> Option<netcdf::AttributeValue> {
    if !has_attr(var, name) {
        return None;
    }
    var.attribute_value(name)?.ok()
}

/// Helper to get an f64 attribute.
pub fn get_f64_attr(var: &netcdf::Variable, name: &str) -> Option<f64> {
    f64::try_from(attr_value(var, name)?).ok()
}

/// Helper to get a string attribute.
pub fn get_string_attr(var: &netcdf::Variable, name: &str) -> Option<String> {
    match attr_value(var, name)? {
        netcdf::AttributeValue::Str(s) => Some(s),
        netcdf::AttributeValue::Strs(mut strs) if !strs.is_empty() => Some(strs.swap_remove(0)),
        _ => None,
    }
}

/// Names and lengths of a variable's dimensions, outermost first.
pub fn dimensions(var: &netcdf::Variable) -> (Vec<String>, Vec<usize>) {
    var.dimensions()
        .iter()
        .map(|d| (d.name(), d.len()))
        .unzip()
}

/// Read a variable as f64, applying CF packing and masking.
///
/// `_FillValue` and `missing_value` become NaN; `scale_factor` and
/// `add_offset` are applied to everything else.
pub fn read_unpacked(var: &netcdf::Variable) -> NetCdfResult<Vec<f64>> {
    let raw: Vec<f64> = var.get_values(..)?;

    let fill = get_f64_attr(var, "_FillValue");
    let missing = get_f64_attr(var, "missing_value");
    let scale = get_f64_attr(var, "scale_factor").unwrap_or(1.0);
    let offset = get_f64_attr(var, "add_offset").unwrap_or(0.0);

    Ok(raw
        .into_iter()
        .map(|v| {
            if Some(v) == fill || Some(v) == missing {
                f64::NAN
            } else {
                v * scale + offset
            }
        })
        .collect())
}
