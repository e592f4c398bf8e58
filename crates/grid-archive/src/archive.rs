//! Public save/load entry points.

use std::collections::BTreeMap;
use std::path::Path;

use grid_common::{Grid, MultiRaster, Raster};

use crate::codec;
use crate::config::ArchiveConfig;
use crate::error::{ArchiveError, Result};
use crate::files::FileSet;
use crate::index::{self, SaveReport};
use crate::kind::{AsEntity, Entity, EntityKind};

/// Saves and loads grids and rasters with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct GridArchive {
    config: ArchiveConfig,
}

impl GridArchive {
    /// Create an archive handle, validating `config`.
    pub fn new(config: ArchiveConfig) -> Result<Self> {
        config.validate().map_err(ArchiveError::Config)?;
        Ok(Self { config })
    }

    /// Create an archive handle configured from the environment.
    pub fn from_env() -> Result<Self> {
        Self::new(ArchiveConfig::from_env())
    }

    pub fn config(&self) -> &ArchiveConfig {
        &self.config
    }

    /// Run one entity save, removing its partial files on failure.
    fn save_tracked<F>(&self, kind: EntityKind, save: F) -> Result<SaveReport>
    where
        F: FnOnce(&mut FileSet) -> Result<()>,
    {
        let mut files = FileSet::new();
        if let Err(err) = save(&mut files) {
            files.rollback();
            return Err(err);
        }
        Ok(SaveReport::single(kind, files))
    }

    /// Save one entity at `base`. Partial files are removed on failure.
    pub fn save_entity(&self, entity: &Entity, base: impl AsRef<Path>) -> Result<SaveReport> {
        let base = base.as_ref();
        self.save_tracked(entity.kind(), |files| {
            codec::save_entity(entity, base, &self.config, files)
        })
    }

    /// Load the entity of `kind` stored at `base`.
    pub fn load_entity(&self, base: impl AsRef<Path>, kind: EntityKind) -> Result<Entity> {
        codec::load_entity(base.as_ref(), kind)
    }

    /// Save a grid as `B_grid.json` + `B_mask.npz`.
    pub fn save_grid(&self, grid: &Grid, base: impl AsRef<Path>) -> Result<SaveReport> {
        let base = base.as_ref();
        self.save_tracked(EntityKind::Grid, |files| {
            codec::grid::save_grid(grid, base, &self.config, files)
        })
    }

    pub fn load_grid(&self, base: impl AsRef<Path>) -> Result<Grid> {
        codec::grid::load_grid(base.as_ref())
    }

    /// Save a single-band raster as `B_raster.json` + `B_data.npz` + `B_mask.npz`.
    pub fn save_raster(&self, raster: &Raster, base: impl AsRef<Path>) -> Result<SaveReport> {
        let base = base.as_ref();
        self.save_tracked(EntityKind::Raster, |files| {
            codec::raster::save_raster(EntityKind::Raster, raster, base, &self.config, files)
        })
    }

    /// Save a multi-band raster; same files as [`save_raster`](Self::save_raster).
    pub fn save_multi_raster(
        &self,
        multi: &MultiRaster,
        base: impl AsRef<Path>,
    ) -> Result<SaveReport> {
        let base = base.as_ref();
        self.save_tracked(EntityKind::MultiRaster, |files| {
            codec::raster::save_raster(
                EntityKind::MultiRaster,
                multi.as_raster(),
                base,
                &self.config,
                files,
            )
        })
    }

    /// Load a raster or multi-raster; the descriptor's tag picks the variant.
    pub fn load_raster(&self, base: impl AsRef<Path>) -> Result<Entity> {
        codec::raster::load_raster(
            base.as_ref(),
            &[EntityKind::Raster, EntityKind::MultiRaster],
        )
    }

    /// Save several named objects and write `B_index.json`.
    pub fn save_objects<'a, I, K, O>(&self, objects: I, base: impl AsRef<Path>) -> Result<SaveReport>
    where
        I: IntoIterator<Item = (K, &'a O)>,
        K: AsRef<str>,
        O: AsEntity + ?Sized + 'a,
    {
        index::save_objects(objects, base.as_ref(), &self.config)
    }

    /// Load every object listed in `B_index.json`.
    pub fn load_objects(&self, base: impl AsRef<Path>) -> Result<BTreeMap<String, Entity>> {
        index::load_objects(base.as_ref())
    }
}
