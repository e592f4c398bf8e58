//! Entity codec: one entity to/from a JSON descriptor plus `.npz` blobs.

pub mod blob;
pub mod descriptor;
pub mod geo;
pub mod grid;
pub mod raster;

use std::path::Path;

use crate::config::ArchiveConfig;
use crate::error::Result;
use crate::files::FileSet;
use crate::kind::{Entity, EntityKind};

/// Save any entity at `base`, recording the files written in `files`.
pub fn save_entity(
    entity: &Entity,
    base: &Path,
    config: &ArchiveConfig,
    files: &mut FileSet,
) -> Result<()> {
    match entity {
        Entity::Grid(grid) => grid::save_grid(grid, base, config, files),
        Entity::Raster(raster) => {
            raster::save_raster(EntityKind::Raster, raster, base, config, files)
        }
        Entity::MultiRaster(multi) => raster::save_raster(
            EntityKind::MultiRaster,
            multi.as_raster(),
            base,
            config,
            files,
        ),
    }
}

/// Load the entity of `kind` stored at `base`.
pub fn load_entity(base: &Path, kind: EntityKind) -> Result<Entity> {
    match kind {
        EntityKind::Grid => grid::load_grid(base).map(Entity::Grid),
        EntityKind::Raster | EntityKind::MultiRaster => raster::load_raster(base, &[kind]),
    }
}
