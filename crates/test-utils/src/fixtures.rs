//! Common test fixtures for grid-archive tests.
//!
//! This module provides pre-defined values that represent common
//! georeferencing scenarios.

/// Common affine transforms as `(a, b, c, d, e, f)` coefficients.
pub mod affine {
    /// 1-unit pixels, north-up, top-left corner at (0, 3)
    pub const UNIT_NORTH_UP: [f64; 6] = [1.0, 0.0, 0.0, 0.0, -1.0, 3.0];

    /// GFS-like 0.25 degree global grid
    pub const GLOBAL_QUARTER_DEGREE: [f64; 6] = [0.25, 0.0, -180.0, 0.0, -0.25, 90.0];

    /// 30 m UTM grid with awkward, non-round origin
    pub const UTM_30M: [f64; 6] = [30.0, 0.0, 399_960.123_456_789, 0.0, -30.0, 5_000_040.987_654_321];

    /// Rotated grid (non-zero shear terms)
    pub const ROTATED: [f64; 6] = [0.866, -0.5, 1000.0, 0.5, 0.866, 2000.0];
}

/// Common CRS definitions, in the text forms an archive may contain.
pub mod crs {
    /// WGS84 geographic
    pub const EPSG_4326: &str = "EPSG:4326";

    /// Legacy PROJ.4 init form of WGS84
    pub const INIT_4326: &str = "+init=epsg:4326";

    /// UTM zone 33N as a PROJ string
    pub const UTM_33N_PROJ: &str = "+proj=utm +zone=33 +datum=WGS84 +units=m +no_defs";

    /// Abbreviated WKT definition
    pub const WGS84_WKT: &str =
        "GEOGCS[\"WGS 84\",DATUM[\"WGS_1984\",SPHEROID[\"WGS 84\",6378137,298.257223563]]]";
}

/// Common nodata sentinels.
pub mod nodata {
    /// Typical integer fill value
    pub const INT_FILL: i32 = -1;

    /// Typical DEM fill value
    pub const DEM_FILL: f64 = -9999.0;

    /// i16 fill at the edge of the range
    pub const I16_MIN_FILL: i16 = i16::MIN;
}
