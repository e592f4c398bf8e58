//! Single- and multi-band rasters: descriptor, data blob and mask blob.

use std::path::Path;

use grid_common::{DType, MultiRaster, Raster};
use tracing::info;

use crate::codec::blob;
use crate::codec::descriptor::{read_descriptor, RasterDescriptor};
use crate::codec::geo::{self, EncodedGeo};
use crate::config::ArchiveConfig;
use crate::error::{ArchiveError, Result};
use crate::files::{self, FileSet};
use crate::kind::{Entity, EntityKind};
use crate::layout;

/// Write `B_data.npz`, `B_mask.npz`, then `B_raster.json` tagged with `kind`.
///
/// The tag comes from the caller's variant, never from the data's
/// dimensionality. An existing `B_raster.json` is removed before the blobs
/// are overwritten.
pub fn save_raster(
    kind: EntityKind,
    raster: &Raster,
    base: &Path,
    config: &ArchiveConfig,
    files: &mut FileSet,
) -> Result<()> {
    let viewfinder = raster.viewfinder();
    let descriptor = RasterDescriptor::new(
        kind,
        raster.data(),
        EncodedGeo::encode(viewfinder)?,
        raster.metadata().clone(),
    );
    let json_path = layout::raster_descriptor(base);
    files::remove_if_exists(&json_path)?;

    let data_path = layout::data_blob(base);
    blob::write_data(&data_path, raster.data(), config)?;
    files.push(data_path);

    let mask_path = layout::mask_blob(base);
    geo::write_mask(viewfinder, &mask_path, config)?;
    files.push(mask_path);

    files::write_json(&json_path, &descriptor, config)?;
    files.push(json_path);

    info!(
        base = %base.display(),
        kind = %kind,
        dtype = %raster.dtype(),
        shape = ?raster.shape(),
        "Raster saved"
    );
    Ok(())
}

/// Rebuild a raster whose descriptor tag is one of `accepted`.
///
/// Returns `Entity::Raster` or `Entity::MultiRaster` following the tag.
pub fn load_raster(base: &Path, accepted: &[EntityKind]) -> Result<Entity> {
    let (kind, descriptor): (_, RasterDescriptor) =
        read_descriptor(&layout::raster_descriptor(base), accepted)?;
    let (header, geo) = descriptor.into_parts();

    let dtype: DType = header.data_dtype.parse()?;
    let data = blob::read_data(&layout::data_blob(base), dtype)?;
    if data.shape() != header.data_shape.as_slice() {
        return Err(ArchiveError::format(format!(
            "data blob shape {:?} does not match declared data_shape {:?}",
            data.shape(),
            header.data_shape
        )));
    }

    let viewfinder = geo.decode(&layout::mask_blob(base), dtype)?;

    let entity = match kind {
        EntityKind::Raster => Entity::Raster(Raster::new(data, viewfinder, header.metadata)?),
        EntityKind::MultiRaster => {
            Entity::MultiRaster(MultiRaster::new(data, viewfinder, header.metadata)?)
        }
        EntityKind::Grid => {
            return Err(ArchiveError::format("grid descriptor found in raster file"))
        }
    };
    Ok(entity)
}
