//! Test data generators for creating synthetic grids and rasters.
//!
//! These generators create predictable, verifiable test data patterns
//! that can be used across the test suite.

use grid_common::{Affine, Crs, Metadata, ViewFinder};
use ndarray::{Array2, Array3};
use serde_json::json;

use crate::fixtures;

/// Creates a test grid with predictable values.
///
/// Each cell value is calculated as: `col * 1000 + row`
///
/// This makes it easy to verify that data is being read/written correctly
/// by checking that grid[[row, col]] == col * 1000 + row.
///
/// # Example
///
/// ```
/// use test_utils::create_test_grid;
///
/// let grid = create_test_grid(5, 10);
/// assert_eq!(grid.dim(), (5, 10));
/// assert_eq!(grid[[0, 0]], 0);    // col=0, row=0 -> 0*1000 + 0
/// assert_eq!(grid[[0, 1]], 1000); // col=1, row=0 -> 1*1000 + 0
/// assert_eq!(grid[[1, 0]], 1);    // col=0, row=1 -> 0*1000 + 1
/// ```
pub fn create_test_grid(rows: usize, cols: usize) -> Array2<i32> {
    Array2::from_shape_fn((rows, cols), |(row, col)| (col * 1000 + row) as i32)
}

/// Creates an elevation-like surface in metres.
///
/// Values rise from ~100 m at the top-left to ~1300 m at the bottom-right
/// with a small ripple, so neighbouring cells always differ.
pub fn create_elevation_grid(rows: usize, cols: usize) -> Array2<f64> {
    Array2::from_shape_fn((rows, cols), |(row, col)| {
        let x_factor = col as f64 / cols.max(1) as f64;
        let y_factor = row as f64 / rows.max(1) as f64;
        100.0 + x_factor * 600.0 + y_factor * 600.0 + (col as f64 * 0.7).sin() * 5.0
    })
}

/// Simple deterministic hash for reproducible test data.
fn simple_hash(x: u32, y: u32, seed: u32) -> u32 {
    let mut h = seed;
    h = h.wrapping_mul(31).wrapping_add(x);
    h = h.wrapping_mul(31).wrapping_add(y);
    h ^= h >> 16;
    h = h.wrapping_mul(0x85ebca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2ae35);
    h ^= h >> 16;
    h
}

/// Creates a grid with NaN values at specified `(row, col)` positions.
pub fn create_grid_with_nans(
    rows: usize,
    cols: usize,
    nan_positions: &[(usize, usize)],
) -> Array2<f64> {
    let mut data = Array2::zeros((rows, cols));
    for &(row, col) in nan_positions {
        if row < rows && col < cols {
            data[[row, col]] = f64::NAN;
        }
    }
    data
}

/// Creates a deterministic validity mask with roughly 1 in 5 cells invalid.
pub fn create_sparse_mask(rows: usize, cols: usize, seed: u32) -> Array2<bool> {
    Array2::from_shape_fn((rows, cols), |(row, col)| {
        simple_hash(col as u32, row as u32, seed) % 5 != 0
    })
}

/// Creates a `(bands, rows, cols)` stack; band `b` holds `b * 100 + row * 10 + col`.
pub fn create_band_stack(bands: usize, rows: usize, cols: usize) -> Array3<f32> {
    Array3::from_shape_fn((bands, rows, cols), |(b, row, col)| {
        (b * 100 + row * 10 + col) as f32
    })
}

/// A north-up view finder over `(rows, cols)` with every cell valid.
pub fn create_viewfinder(rows: usize, cols: usize) -> ViewFinder {
    ViewFinder::from_shape(
        Affine::from(fixtures::affine::UNIT_NORTH_UP),
        (rows, cols),
        Crs::wgs84(),
    )
}

/// Metadata with nested values of every JSON kind.
pub fn create_nested_metadata() -> Metadata {
    let value = json!({
        "band": 1,
        "units": "m",
        "scale": 0.5,
        "valid": true,
        "source": null,
        "history": ["fill_depressions", "resolve_flats"],
        "dirmap": {"N": 64, "NE": 128, "E": 1, "SE": 2, "S": 4, "SW": 8, "W": 16, "NW": 32}
    });
    match value {
        serde_json::Value::Object(map) => map,
        _ => Metadata::new(),
    }
}
