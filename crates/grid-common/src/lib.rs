//! Common georeferenced grid types shared by the grid-archive crates.

pub mod affine;
pub mod crs;
pub mod dtype;
pub mod error;
pub mod nodata;
pub mod raster;
pub mod viewfinder;

pub use affine::Affine;
pub use crs::Crs;
pub use dtype::DType;
pub use error::{GeoError, GeoResult};
pub use nodata::Nodata;
pub use raster::{Grid, Metadata, MultiRaster, Raster, RasterData, RasterElement};
pub use viewfinder::ViewFinder;
