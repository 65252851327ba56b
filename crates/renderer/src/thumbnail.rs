//! Thumbnail rendering for a single dataset variable.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use stac_common::grid::finite_range;
use stac_common::FieldSource;
use tracing::debug;

use crate::colormap::Colormap;
use crate::error::{RenderError, RenderResult};
use crate::png::create_png_auto;
use crate::raster::{shade, AxisOrder, Canvas};

fn default_width() -> usize {
    256
}

/// The `thumbnail` section of the converter configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThumbnailSettings {
    pub variable: String,
    pub cmap: String,
    pub vmin: f64,
    pub vmax: f64,
    #[serde(rename = "x-coordinate")]
    pub x_coord: String,
    #[serde(rename = "y-coordinate")]
    pub y_coord: String,
    #[serde(default = "default_width")]
    pub width: usize,
    /// Extra directory searched for `<cmap>.json` before the built-ins
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cmap_dir: Option<PathBuf>,
}

/// A thumbnail renderer with its colormap resolved.
#[derive(Debug, Clone)]
pub struct Thumbnail {
    settings: ThumbnailSettings,
    cmap: Colormap,
}

impl Thumbnail {
    /// Resolve the colormap. Fails with [`RenderError::ColormapNotFound`] for unknown names.
    pub fn new(settings: ThumbnailSettings) -> RenderResult<Self> {
        let cmap = Colormap::load(&settings.cmap, settings.cmap_dir.as_deref())?;
        Ok(Self { settings, cmap })
    }

    pub fn colormap(&self) -> &Colormap {
        &self.cmap
    }

    /// Render the configured variable of `source` to RGBA pixels.
    ///
    /// Returns `(pixels, width, height)`. The height keeps the aspect ratio of
    /// the data array, counted in cells along y and x.
    pub fn render<S: FieldSource + ?Sized>(&self, source: &S) -> RenderResult<(Vec<u8>, usize, usize)> {
        let s = &self.settings;
        let field = source.field(&s.variable)?.squeeze();

        if field.ndim() != 2 {
            return Err(RenderError::Dimensionality {
                variable: s.variable.clone(),
                dims: field.dims,
            });
        }

        let x = source.coordinate(&s.x_coord)?;
        let y = source.coordinate(&s.y_coord)?;
        let x_range = finite_range(&x)
            .ok_or_else(|| RenderError::Coordinates(format!("'{}' has no finite values", s.x_coord)))?;
        let y_range = finite_range(&y)
            .ok_or_else(|| RenderError::Coordinates(format!("'{}' has no finite values", s.y_coord)))?;

        let order = AxisOrder::detect(&field.dims, &s.x_coord, &s.y_coord);
        let (ny, nx) = match order {
            AxisOrder::YX => (field.shape[0], field.shape[1]),
            AxisOrder::XY => (field.shape[1], field.shape[0]),
        };
        let width = s.width.max(1);
        let height = ((width as f64 * ny as f64 / nx as f64) as usize).max(1);

        let canvas = Canvas {
            width,
            height,
            x_range,
            y_range,
        };
        debug!(variable = %s.variable, width, height, ?order, "Rasterizing thumbnail");

        let values = canvas.raster(&field, &x, &y, order)?;
        let pixels = shade(&values, &self.cmap, (s.vmin, s.vmax));
        Ok((pixels, width, height))
    }

    /// Render and write a PNG to `output`.
    pub fn generate<S: FieldSource + ?Sized>(&self, source: &S, output: &Path) -> RenderResult<()> {
        let (pixels, width, height) = self.render(source)?;
        let png = create_png_auto(&pixels, width, height)?;
        std::fs::write(output, png)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_from_json() {
        let settings: ThumbnailSettings = serde_json::from_value(serde_json::json!({
            "variable": "sst",
            "cmap": "viridis",
            "vmin": 270.0,
            "vmax": 310.0,
            "x-coordinate": "lon",
            "y-coordinate": "lat",
            "width": 64
        }))
        .unwrap();
        assert_eq!(settings.x_coord, "lon");
        assert_eq!(settings.width, 64);
        assert!(settings.cmap_dir.is_none());
    }

    #[test]
    fn test_unknown_cmap() {
        let settings = ThumbnailSettings {
            variable: "sst".into(),
            cmap: "rainbow-unicorn".into(),
            vmin: 0.0,
            vmax: 1.0,
            x_coord: "lon".into(),
            y_coord: "lat".into(),
            width: 16,
            cmap_dir: None,
        };
        assert!(matches!(Thumbnail::new(settings), Err(RenderError::ColormapNotFound(_))));
    }
}
