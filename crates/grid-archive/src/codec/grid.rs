//! Grid-only entities: descriptor + mask, no data.

use std::path::Path;

use grid_common::{DType, Grid};
use tracing::info;

use crate::codec::descriptor::{read_descriptor, GridDescriptor};
use crate::codec::geo::{self, EncodedGeo};
use crate::config::ArchiveConfig;
use crate::error::Result;
use crate::files::{self, FileSet};
use crate::kind::EntityKind;
use crate::layout;

/// Write `B_mask.npz` then `B_grid.json`.
///
/// An existing `B_grid.json` is removed first, so a descriptor on disk
/// always belongs to a complete save.
pub fn save_grid(grid: &Grid, base: &Path, config: &ArchiveConfig, files: &mut FileSet) -> Result<()> {
    let viewfinder = grid.viewfinder();
    let descriptor = GridDescriptor::new(EncodedGeo::encode(viewfinder)?);
    let json_path = layout::grid_descriptor(base);
    files::remove_if_exists(&json_path)?;

    let mask_path = layout::mask_blob(base);
    geo::write_mask(viewfinder, &mask_path, config)?;
    files.push(mask_path);

    files::write_json(&json_path, &descriptor, config)?;
    files.push(json_path);

    info!(
        base = %base.display(),
        shape = ?viewfinder.shape(),
        crs = %viewfinder.crs(),
        "Grid saved"
    );
    Ok(())
}

/// Rebuild a grid; its nodata is always read back as float64 (or NaN).
pub fn load_grid(base: &Path) -> Result<Grid> {
    let (_, descriptor): (_, GridDescriptor) =
        read_descriptor(&layout::grid_descriptor(base), &[EntityKind::Grid])?;
    let viewfinder = descriptor
        .into_geo()
        .decode(&layout::mask_blob(base), DType::Float64)?;
    Ok(Grid::new(viewfinder)?)
}
