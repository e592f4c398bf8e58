//! Shared test utilities for the grid-archive workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Temporary directory helpers
//! - Grid and raster data generators
//! - Common georeferencing fixtures
//! - Tracing setup for tests
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{temp_test_dir, create_viewfinder, fixtures};
//! ```

pub mod fixtures;
pub mod generators;
pub mod paths;

// Re-export commonly used items at the crate root
pub use generators::*;
pub use paths::*;

/// Install a test-friendly tracing subscriber.
///
/// Output goes through the test harness writer so it is captured per test.
/// Safe to call from every test; only the first call installs anything.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Macro for element-wise array equality where NaN equals NaN.
///
/// Both sides must yield `f32` or `f64` items and have the same length.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_nan_eq;
///
/// assert_nan_eq!(restored.iter(), original.iter());
/// ```
#[macro_export]
macro_rules! assert_nan_eq {
    ($left:expr, $right:expr) => {{
        let left: Vec<f64> = $left.map(|v| *v as f64).collect();
        let right: Vec<f64> = $right.map(|v| *v as f64).collect();
        assert_eq!(left.len(), right.len(), "length mismatch");
        for (i, (l, r)) in left.iter().zip(right.iter()).enumerate() {
            let same = (l.is_nan() && r.is_nan()) || l == r;
            if !same {
                panic!(
                    "assertion failed: element {} differs\n  left: `{:?}`,\n right: `{:?}`",
                    i, l, r
                );
            }
        }
    }};
}
