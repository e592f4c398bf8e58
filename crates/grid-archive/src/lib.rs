//! JSON + NPZ Archives for Georeferenced Grids
//!
//! This crate persists grids, rasters and multi-band rasters as a small set
//! of self-describing files:
//!
//! - **JSON descriptor**: kind tag, affine, shape, nodata, CRS, dtype, metadata
//! - **Compressed blobs**: numpy-compatible `.npz` files for data and mask
//! - **Index**: optional `B_index.json` grouping named objects in one archive
//!
//! # Architecture
//!
//! ```text
//! GridArchive::save_objects({name: entity}, base)
//!      │
//!      ├─► for each entity (dispatch on Entity variant)
//!      │         │
//!      │         ├─► Grid        → B_name_mask.npz, B_name_grid.json
//!      │         │
//!      │         └─► Raster /    → B_name_data.npz, B_name_mask.npz,
//!      │             MultiRaster   B_name_raster.json
//!      │
//!      └─► B_index.json (last; rollback on any failure)
//! ```
//!
//! Loading reverses the flow: the descriptor's kind tag is validated, the
//! declared dtype selects how the data blob and nodata sentinel are typed,
//! and the view finder is rebuilt from the mask blob.
//!
//! # Example
//!
//! ```ignore
//! use grid_archive::{GridArchive, ArchiveConfig};
//!
//! let archive = GridArchive::new(ArchiveConfig::default())?;
//! archive.save_raster(&dem, "out/dem")?;
//! let restored = archive.load_raster("out/dem")?;
//! ```

pub mod archive;
pub mod codec;
pub mod config;
pub mod error;
pub mod files;
pub mod index;
pub mod kind;
pub mod layout;

use std::collections::BTreeMap;
use std::path::Path;

use grid_common::{Grid, Raster};

// Re-export commonly used types at crate root
pub use archive::GridArchive;
pub use config::{ArchiveConfig, BlobCompression};
pub use error::{ArchiveError, Result};
pub use index::{ArchiveIndex, SaveReport};
pub use kind::{AsEntity, Entity, EntityKind};

/// Save a grid with the default configuration.
pub fn save_grid(grid: &Grid, base: impl AsRef<Path>) -> Result<SaveReport> {
    GridArchive::default().save_grid(grid, base)
}

/// Load a grid saved with [`save_grid`].
pub fn load_grid(base: impl AsRef<Path>) -> Result<Grid> {
    GridArchive::default().load_grid(base)
}

/// Save a single-band raster with the default configuration.
pub fn save_raster(raster: &Raster, base: impl AsRef<Path>) -> Result<SaveReport> {
    GridArchive::default().save_raster(raster, base)
}

/// Load a raster or multi-raster.
pub fn load_raster(base: impl AsRef<Path>) -> Result<Entity> {
    GridArchive::default().load_raster(base)
}

/// Save named entities with the default configuration.
pub fn save_objects<'a, I, K>(objects: I, base: impl AsRef<Path>) -> Result<SaveReport>
where
    I: IntoIterator<Item = (K, &'a Entity)>,
    K: AsRef<str>,
{
    GridArchive::default().save_objects(objects, base)
}

/// Load every object of an archive.
pub fn load_objects(base: impl AsRef<Path>) -> Result<BTreeMap<String, Entity>> {
    GridArchive::default().load_objects(base)
}
