//! Nearest-neighbour rasterization of a 2-D field onto a pixel canvas.

use stac_common::GridField;

use crate::colormap::Colormap;
use crate::error::{RenderError, RenderResult};

/// A `width` x `height` canvas covering `x_range` x `y_range`.
///
/// Row 0 of the canvas is the top edge, at the largest y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    pub width: usize,
    pub height: usize,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
}

/// How the two axes of a 2-D field map onto the x and y coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisOrder {
    /// Rows follow y, columns follow x
    YX,
    /// Rows follow x, columns follow y
    XY,
}

impl AxisOrder {
    /// Decide from the field's dimension names. Unrecognised layouts are taken as `YX`.
    pub fn detect(dims: &[String], x_coord: &str, y_coord: &str) -> Self {
        match dims {
            [d0, d1] if d1 == x_coord || d0 == y_coord => AxisOrder::YX,
            [d0, d1] if d0 == x_coord || d1 == y_coord => AxisOrder::XY,
            _ => AxisOrder::YX,
        }
    }
}

impl Canvas {
    /// Value of the data cell nearest each pixel centre, row-major, NaN where empty.
    ///
    /// `x` and `y` are the coordinate values along the field's x and y axes.
    pub fn raster(&self, field: &GridField, x: &[f64], y: &[f64], order: AxisOrder) -> RenderResult<Vec<f64>> {
        if field.ndim() != 2 {
            return Err(RenderError::Dimensionality {
                variable: field.name.clone(),
                dims: field.dims.clone(),
            });
        }

        let (nx, ny) = match order {
            AxisOrder::YX => (field.shape[1], field.shape[0]),
            AxisOrder::XY => (field.shape[0], field.shape[1]),
        };
        if x.len() != nx || y.len() != ny {
            return Err(RenderError::Coordinates(format!(
                "{}: field is {:?} but coordinates have {} x and {} y values",
                field.name,
                field.shape,
                x.len(),
                y.len()
            )));
        }

        let (x0, x1) = self.x_range;
        let (y0, y1) = self.y_range;
        let dx = (x1 - x0) / self.width as f64;
        let dy = (y1 - y0) / self.height as f64;

        let cols: Vec<usize> = (0..self.width)
            .map(|px| nearest(x, x0 + (px as f64 + 0.5) * dx))
            .collect();
        let rows: Vec<usize> = (0..self.height)
            .map(|py| nearest(y, y1 - (py as f64 + 0.5) * dy))
            .collect();

        let mut out = Vec::with_capacity(self.width * self.height);
        for &iy in &rows {
            for &ix in &cols {
                let value = match order {
                    AxisOrder::YX => field.get2(iy, ix),
                    AxisOrder::XY => field.get2(ix, iy),
                };
                out.push(value.unwrap_or(f64::NAN));
            }
        }
        Ok(out)
    }
}

/// Index of the coordinate closest to `target`. The first one wins a tie.
fn nearest(coords: &[f64], target: f64) -> usize {
    coords
        .iter()
        .enumerate()
        .filter(|(_, c)| c.is_finite())
        .fold((0, f64::INFINITY), |(best, best_dist), (i, c)| {
            let dist = (c - target).abs();
            if dist < best_dist {
                (i, dist)
            } else {
                (best, best_dist)
            }
        })
        .0
}

/// Map values to RGBA pixels over `span`. NaN becomes fully transparent.
pub fn shade(values: &[f64], cmap: &Colormap, span: (f64, f64)) -> Vec<u8> {
    let (vmin, vmax) = span;
    let range = vmax - vmin;

    values
        .iter()
        .flat_map(|&v| {
            if v.is_nan() {
                [0, 0, 0, 0]
            } else if range > 0.0 {
                cmap.color_at((v - vmin) / range)
            } else {
                cmap.color_at(0.0)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_2x3() -> GridField {
        // rows = y (0, 1), cols = x (10, 20, 30)
        GridField::new(
            "v",
            vec!["lat".into(), "lon".into()],
            vec![2, 3],
            vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
        )
        .unwrap()
    }

    #[test]
    fn test_axis_order_detect() {
        let yx = vec!["lat".to_string(), "lon".to_string()];
        let xy = vec!["lon".to_string(), "lat".to_string()];
        let other = vec!["a".to_string(), "b".to_string()];
        assert_eq!(AxisOrder::detect(&yx, "lon", "lat"), AxisOrder::YX);
        assert_eq!(AxisOrder::detect(&xy, "lon", "lat"), AxisOrder::XY);
        assert_eq!(AxisOrder::detect(&other, "lon", "lat"), AxisOrder::YX);
    }

    #[test]
    fn test_raster_identity() {
        let canvas = Canvas {
            width: 3,
            height: 2,
            x_range: (10.0, 30.0),
            y_range: (0.0, 1.0),
        };
        let out = canvas
            .raster(&field_2x3(), &[10.0, 20.0, 30.0], &[0.0, 1.0], AxisOrder::YX)
            .unwrap();
        // Top row of the canvas is the largest y
        assert_eq!(out, vec![4.0, 5.0, 6.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_raster_transposed_matches() {
        let transposed = GridField::new(
            "v",
            vec!["lon".into(), "lat".into()],
            vec![3, 2],
            vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0],
        )
        .unwrap();
        let canvas = Canvas {
            width: 3,
            height: 2,
            x_range: (10.0, 30.0),
            y_range: (0.0, 1.0),
        };
        let x = [10.0, 20.0, 30.0];
        let y = [0.0, 1.0];
        let a = canvas.raster(&field_2x3(), &x, &y, AxisOrder::YX).unwrap();
        let b = canvas.raster(&transposed, &x, &y, AxisOrder::XY).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_raster_coordinate_mismatch() {
        let canvas = Canvas {
            width: 4,
            height: 4,
            x_range: (0.0, 1.0),
            y_range: (0.0, 1.0),
        };
        let result = canvas.raster(&field_2x3(), &[0.0, 1.0], &[0.0, 1.0], AxisOrder::YX);
        assert!(matches!(result, Err(RenderError::Coordinates(_))));
    }

    #[test]
    fn test_nearest() {
        assert_eq!(nearest(&[0.0, 1.0, 2.0], 1.4), 1);
        assert_eq!(nearest(&[2.0, 1.0, 0.0], 1.6), 1);
        assert_eq!(nearest(&[0.0, 1.0], 0.5), 0);
    }

    #[test]
    fn test_shade() {
        let cmap = Colormap::load("greys", None).unwrap();
        let pixels = shade(&[0.0, 10.0, f64::NAN, 20.0], &cmap, (0.0, 10.0));
        assert_eq!(&pixels[0..4], &[255, 255, 255, 255]);
        assert_eq!(&pixels[4..8], &[0, 0, 0, 255]);
        assert_eq!(&pixels[8..12], &[0, 0, 0, 0]);
        // Clipped to vmax
        assert_eq!(&pixels[12..16], &[0, 0, 0, 255]);
    }
}
