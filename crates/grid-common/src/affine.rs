//! Affine pixel-to-world transform.

use serde::{Deserialize, Serialize};

use crate::error::GeoError;

/// Six-coefficient affine transform `(a, b, c, d, e, f)`.
///
/// Maps pixel `(col, row)` to world coordinates:
/// `x = a * col + b * row + c`, `y = d * col + e * row + f`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Affine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Affine {
    /// Create a new affine transform from its coefficients.
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// Identity transform.
    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0)
    }

    /// North-up transform for a grid whose top-left corner is at `(west, north)`.
    pub fn from_origin(west: f64, north: f64, xsize: f64, ysize: f64) -> Self {
        Self::new(xsize, 0.0, west, 0.0, -ysize, north)
    }

    /// Build from a coefficient slice; exactly 6 values are required.
    pub fn from_coefficients(coeffs: &[f64]) -> Result<Self, GeoError> {
        match coeffs {
            [a, b, c, d, e, f] => Ok(Self::new(*a, *b, *c, *d, *e, *f)),
            _ => Err(GeoError::InvalidAffine(coeffs.len())),
        }
    }

    /// The coefficients in `(a, b, c, d, e, f)` order.
    pub fn coefficients(&self) -> [f64; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }

    /// True when no coefficient is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        self.coefficients().iter().all(|c| c.is_finite())
    }

    /// Transform a pixel coordinate to world coordinates.
    pub fn apply(&self, col: f64, row: f64) -> (f64, f64) {
        (
            self.a * col + self.b * row + self.c,
            self.d * col + self.e * row + self.f,
        )
    }
}

impl Default for Affine {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<[f64; 6]> for Affine {
    fn from(c: [f64; 6]) -> Self {
        Self::new(c[0], c[1], c[2], c[3], c[4], c[5])
    }
}
