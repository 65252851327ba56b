//! Test support for the netcdf-stac crates.
//!
//! [`NetcdfFixture`] writes small CF-style NetCDF files on the fly, so no
//! test depends on downloaded data. [`fixtures`] holds the shared boxes,
//! grid sizes and dates those files are built from. Scratch directories
//! come from [`temp_test_dir`] and are removed when dropped.

pub mod fixtures;
pub mod generators;
pub mod paths;

pub use fixtures::*;
pub use generators::*;
pub use paths::*;

/// Assert that two `(x, y)` positions agree to within `tol` on both axes.
///
/// ```ignore
/// assert_coords_approx_eq!((bbox.min_x, bbox.min_y), (-5.0, 45.0), 1e-9);
/// ```
#[macro_export]
macro_rules! assert_coords_approx_eq {
    (($x1:expr, $y1:expr), ($x2:expr, $y2:expr), $tol:expr) => {{
        let actual: (f64, f64) = ($x1 as f64, $y1 as f64);
        let expected: (f64, f64) = ($x2 as f64, $y2 as f64);
        let tol: f64 = $tol as f64;
        let (dx, dy) = ((actual.0 - expected.0).abs(), (actual.1 - expected.1).abs());
        if !(dx <= tol && dy <= tol) {
            panic!(
                "positions differ: got {:?}, expected {:?} (dx {}, dy {}, tolerance {})",
                actual, expected, dx, dy, tol
            );
        }
    }};
}
