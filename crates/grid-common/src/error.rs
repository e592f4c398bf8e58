//! Error types for grid and raster construction.

use thiserror::Error;

/// Result type alias using GeoError.
pub type GeoResult<T> = Result<T, GeoError>;

/// Errors raised when building georeferenced values.
#[derive(Debug, Error)]
pub enum GeoError {
    #[error("shape mismatch for {what}: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        what: &'static str,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error("invalid CRS: {0}")]
    InvalidCrs(String),

    #[error("affine transform requires 6 coefficients, got {0}")]
    InvalidAffine(usize),

    #[error("invalid nodata value: {0}")]
    InvalidNodata(String),

    #[error("unsupported dtype: {0}")]
    UnsupportedDType(String),

    #[error("multi-band data needs a leading band axis, got {0} dimension(s)")]
    MissingBandAxis(usize),
}

impl GeoError {
    /// Create a ShapeMismatch error.
    pub fn shape_mismatch(what: &'static str, expected: &[usize], actual: &[usize]) -> Self {
        Self::ShapeMismatch {
            what,
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        }
    }
}
