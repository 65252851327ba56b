//! Kerchunk-style reference files.
//!
//! A reference file is a JSON description of a NetCDF file laid out as a
//! Zarr v2 store (`{"version": 1, "refs": {...}}`), letting Zarr readers open
//! the data without the NetCDF library.

use std::path::Path;
use std::process::Command;

use base64::Engine;
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use crate::attributes::to_json;
use crate::error::{NetCdfError, NetCdfResult};
use crate::native;

/// Writes a reference file for `input` to `output`.
///
/// `url` is where the NetCDF file is published. Generators that emit byte
/// ranges point their references at it.
pub trait ReferenceGenerator {
    fn generate(&self, input: &Path, url: &str, output: &Path) -> NetCdfResult<()>;
}

/// Builds the reference JSON natively with every variable inlined.
///
/// Each variable becomes a single uncompressed little-endian `f64` chunk
/// embedded as a `base64:` reference. Values are the raw stored ones, so
/// `scale_factor`, `add_offset` and fill attributes keep their meaning.
/// Variables that cannot be read as numbers are left out.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineReferenceGenerator;

impl InlineReferenceGenerator {
    /// The reference document for `input`, without writing it anywhere.
    pub fn build(&self, input: &Path, url: &str) -> NetCdfResult<Value> {
        let file = native::open(input)?;
        let mut refs = Map::new();

        refs.insert(".zgroup".to_string(), Value::String(json!({"zarr_format": 2}).to_string()));
        let group_attrs: Map<String, Value> = file
            .attributes()
            .filter_map(|attr| Some((attr.name().to_string(), to_json(attr.value().ok()?))))
            .collect();
        refs.insert(".zattrs".to_string(), Value::String(Value::Object(group_attrs).to_string()));

        for var in file.variables() {
            let name = var.name();
            let values: Vec<f64> = match var.get_values(..) {
                Ok(values) => values,
                Err(e) => {
                    debug!(variable = %name, error = %e, "Skipping non-numeric variable");
                    continue;
                }
            };
            let (dims, shape) = native::dimensions(&var);

            let mut attrs: Map<String, Value> = var
                .attributes()
                .filter(|attr| attr.name() != "_FillValue")
                .filter_map(|attr| Some((attr.name().to_string(), to_json(attr.value().ok()?))))
                .collect();
            attrs.insert("_ARRAY_DIMENSIONS".to_string(), json!(dims));

            let fill_value = native::get_f64_attr(&var, "_FillValue")
                .filter(|v| v.is_finite())
                .map_or(Value::Null, Value::from);

            let zarray = json!({
                "chunks": shape,
                "compressor": null,
                "dtype": "<f8",
                "fill_value": fill_value,
                "filters": null,
                "order": "C",
                "shape": shape,
                "zarr_format": 2,
            });
            refs.insert(format!("{}/.zarray", name), Value::String(zarray.to_string()));
            refs.insert(format!("{}/.zattrs", name), Value::String(Value::Object(attrs).to_string()));

            if values.is_empty() {
                continue;
            }
            let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
            let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
            refs.insert(chunk_key(&name, shape.len()), Value::String(format!("base64:{}", encoded)));
        }

        Ok(json!({
            "version": 1,
            "templates": {"u": url},
            "refs": refs,
        }))
    }
}

/// Key of the only chunk of an `ndim`-dimensional array.
fn chunk_key(name: &str, ndim: usize) -> String {
    let index = vec!["0"; ndim.max(1)].join(".");
    format!("{}/{}", name, index)
}

impl ReferenceGenerator for InlineReferenceGenerator {
    fn generate(&self, input: &Path, url: &str, output: &Path) -> NetCdfResult<()> {
        let refs = self.build(input, url)?;
        std::fs::write(output, serde_json::to_string(&refs)?)?;
        info!(input = %input.display(), output = %output.display(), "Wrote inline references");
        Ok(())
    }
}

/// Delegates to an external program, run as `<program> [args..] <input> <url> <output>`.
///
/// Use this for byte-range references produced by a dedicated tool.
#[derive(Debug, Clone)]
pub struct ExternalReferenceGenerator {
    pub program: String,
    pub args: Vec<String>,
}

impl ExternalReferenceGenerator {
    /// From a command line such as `["python", "-m", "make_refs"]`.
    pub fn from_command(command: &[String]) -> NetCdfResult<Self> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| NetCdfError::CommandError("empty reference command".to_string()))?;
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

impl ReferenceGenerator for ExternalReferenceGenerator {
    fn generate(&self, input: &Path, url: &str, output: &Path) -> NetCdfResult<()> {
        let result = Command::new(&self.program)
            .args(&self.args)
            .arg(input)
            .arg(url)
            .arg(output)
            .output()
            .map_err(|e| NetCdfError::CommandError(format!("Failed to run {}: {}", self.program, e)))?;

        if !result.status.success() {
            return Err(NetCdfError::CommandError(format!(
                "{} exited with {}: {}",
                self.program,
                result.status,
                String::from_utf8_lossy(&result.stderr).trim()
            )));
        }

        if !output.is_file() {
            return Err(NetCdfError::CommandError(format!(
                "{} did not write {}",
                self.program,
                output.display()
            )));
        }

        info!(input = %input.display(), output = %output.display(), "Wrote references");
        Ok(())
    }
}
