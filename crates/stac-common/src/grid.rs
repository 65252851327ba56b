//! Gridded fields read out of a dataset.

use crate::error::{StacError, StacResult};

/// An n-dimensional field in row-major order, with NaN marking missing data.
#[derive(Debug, Clone, PartialEq)]
pub struct GridField {
    pub name: String,
    /// Dimension names, outermost first
    pub dims: Vec<String>,
    pub shape: Vec<usize>,
    pub values: Vec<f64>,
}

impl GridField {
    pub fn new(name: impl Into<String>, dims: Vec<String>, shape: Vec<usize>, values: Vec<f64>) -> StacResult<Self> {
        let name = name.into();
        if dims.len() != shape.len() {
            return Err(StacError::InvalidGrid(format!(
                "{}: {} dimension names for {} axes",
                name,
                dims.len(),
                shape.len()
            )));
        }
        let expected: usize = shape.iter().product();
        if expected != values.len() {
            return Err(StacError::InvalidGrid(format!(
                "{}: shape {:?} needs {} values, got {}",
                name,
                shape,
                expected,
                values.len()
            )));
        }
        Ok(Self {
            name,
            dims,
            shape,
            values,
        })
    }

    /// Drop every axis of length one. The data order is unchanged.
    pub fn squeeze(mut self) -> Self {
        let keep: Vec<bool> = self.shape.iter().map(|&n| n != 1).collect();
        let mut keep_iter = keep.iter();
        self.dims.retain(|_| *keep_iter.next().unwrap_or(&true));
        self.shape.retain(|&n| n != 1);
        self
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at `(row, col)` of a 2-D field.
    pub fn get2(&self, row: usize, col: usize) -> Option<f64> {
        if self.ndim() != 2 || row >= self.shape[0] || col >= self.shape[1] {
            return None;
        }
        self.values.get(row * self.shape[1] + col).copied()
    }
}

/// Minimum and maximum of the finite values, if any.
pub fn finite_range(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// An opened dataset that fields and coordinates can be read from.
pub trait FieldSource {
    /// Read a whole variable.
    fn field(&self, name: &str) -> StacResult<GridField>;

    /// Read a 1-D coordinate variable.
    fn coordinate(&self, name: &str) -> StacResult<Vec<f64>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_new_validates_shape() {
        assert!(GridField::new("sst", dims(&["lat", "lon"]), vec![2, 3], vec![0.0; 6]).is_ok());
        assert!(GridField::new("sst", dims(&["lat", "lon"]), vec![2, 3], vec![0.0; 5]).is_err());
        assert!(GridField::new("sst", dims(&["lat"]), vec![2, 3], vec![0.0; 6]).is_err());
    }

    #[test]
    fn test_squeeze_drops_unit_axes() {
        let field = GridField::new("sst", dims(&["time", "lat", "lon"]), vec![1, 2, 3], (0..6).map(f64::from).collect())
            .unwrap()
            .squeeze();
        assert_eq!(field.dims, dims(&["lat", "lon"]));
        assert_eq!(field.shape, vec![2, 3]);
        assert_eq!(field.get2(1, 2), Some(5.0));
        assert_eq!(field.get2(2, 0), None);
    }

    #[test]
    fn test_finite_range_ignores_nan() {
        assert_eq!(finite_range(&[f64::NAN, 3.0, -1.0, 2.0]), Some((-1.0, 3.0)));
        assert_eq!(finite_range(&[f64::NAN]), None);
        assert_eq!(finite_range(&[]), None);
    }
}
