//! Common test fixtures for catalog tests.

/// Bounding boxes as `(min_lon, min_lat, max_lon, max_lat)`.
pub mod bbox {
    /// Western European shelf, used for the first day of the SST series.
    pub const SHELF_WIDE: (f64, f64, f64, f64) = (-10.0, 40.0, 10.0, 60.0);

    /// A box strictly inside [`SHELF_WIDE`].
    pub const SHELF_NARROW: (f64, f64, f64, f64) = (-5.0, 45.0, 5.0, 55.0);
}

/// Common time values for testing.
pub mod time {
    pub const DAY_ONE: &str = "2022-01-01";
    pub const DAY_TWO: &str = "2022-01-02";

    /// Climatology window matching the two days above.
    pub const CLIMATOLOGY: [&str; 2] = ["1991-01-01", "2020-12-31"];
}

/// Grid sizes as `(width, height)`.
pub mod grid {
    pub const SMALL: (usize, usize) = (5, 4);
    pub const SQUARE: (usize, usize) = (8, 8);
}
