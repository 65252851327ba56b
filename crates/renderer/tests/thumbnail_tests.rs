//! Thumbnail rendering against in-memory fields.

use std::collections::HashMap;

use renderer::png::png_dimensions;
use renderer::{RenderError, Thumbnail, ThumbnailSettings};
use stac_common::{FieldSource, GridField, StacError, StacResult};
use test_utils::{create_sst_grid, fixtures, linspace};

/// A field source backed by plain vectors.
struct MemorySource {
    fields: HashMap<String, GridField>,
    coords: HashMap<String, Vec<f64>>,
}

impl MemorySource {
    fn sst(width: usize, height: usize) -> Self {
        let field = GridField::new(
            "sst",
            vec!["time".into(), "lat".into(), "lon".into()],
            vec![1, height, width],
            create_sst_grid(width, height),
        )
        .unwrap();
        Self {
            fields: HashMap::from([("sst".to_string(), field)]),
            coords: HashMap::from([
                ("lon".to_string(), linspace(-10.0, 10.0, width)),
                ("lat".to_string(), linspace(40.0, 60.0, height)),
            ]),
        }
    }
}

impl FieldSource for MemorySource {
    fn field(&self, name: &str) -> StacResult<GridField> {
        self.fields
            .get(name)
            .cloned()
            .ok_or_else(|| StacError::DataReadError(format!("no field {}", name)))
    }

    fn coordinate(&self, name: &str) -> StacResult<Vec<f64>> {
        self.coords
            .get(name)
            .cloned()
            .ok_or_else(|| StacError::DataReadError(format!("no coordinate {}", name)))
    }
}

fn settings(width: usize) -> ThumbnailSettings {
    ThumbnailSettings {
        variable: "sst".into(),
        cmap: "viridis".into(),
        vmin: 0.0,
        vmax: 30.0,
        x_coord: "lon".into(),
        y_coord: "lat".into(),
        width,
        cmap_dir: None,
    }
}

#[test]
fn test_height_keeps_aspect_ratio() {
    let source = MemorySource::sst(20, 10);
    let thumb = Thumbnail::new(settings(64)).unwrap();

    let (pixels, width, height) = thumb.render(&source).unwrap();
    assert_eq!(width, 64);
    assert_eq!(height, 32);
    assert_eq!(pixels.len(), 64 * 32 * 4);
}

#[test]
fn test_generate_writes_png_of_configured_width() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("sst.png");
    let source = MemorySource::sst(fixtures::grid::SQUARE.0, fixtures::grid::SQUARE.1);

    Thumbnail::new(settings(50)).unwrap().generate(&source, &output).unwrap();

    let png = std::fs::read(&output).unwrap();
    assert_eq!(png_dimensions(&png), Some((50, 50)));
}

#[test]
fn test_top_row_is_north() {
    let source = MemorySource::sst(4, 4);
    let thumb = Thumbnail::new(settings(4)).unwrap();
    let (pixels, _, _) = thumb.render(&source).unwrap();

    // Values rise with latitude, so the top-left pixel is the warm end of the map
    let cmap = thumb.colormap();
    let top_left = &pixels[0..4];
    let bottom_left = &pixels[12 * 4..13 * 4];
    assert_eq!(top_left, &cmap.color_at(24.0 / 30.0));
    assert_eq!(bottom_left, &cmap.color_at(0.0));
}

#[test]
fn test_three_dimensional_field_fails() {
    let mut source = MemorySource::sst(4, 4);
    let cube = GridField::new(
        "sst",
        vec!["depth".into(), "lat".into(), "lon".into()],
        vec![2, 4, 4],
        vec![1.0; 32],
    )
    .unwrap();
    source.fields.insert("sst".into(), cube);

    let err = Thumbnail::new(settings(16)).unwrap().render(&source).unwrap_err();
    match err {
        RenderError::Dimensionality { variable, dims } => {
            assert_eq!(variable, "sst");
            assert_eq!(dims, vec!["depth", "lat", "lon"]);
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_missing_variable_is_a_data_error() {
    let source = MemorySource::sst(4, 4);
    let mut s = settings(16);
    s.variable = "chlor_a".into();
    let err = Thumbnail::new(s).unwrap().render(&source).unwrap_err();
    assert!(matches!(err, RenderError::Data(_)));
}
