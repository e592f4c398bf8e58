//! Entity kinds and the closed union of archivable values.

use std::fmt;
use std::str::FromStr;

use grid_common::{Grid, MultiRaster, Raster};

use crate::error::ArchiveError;

/// Kind tag written into descriptors and the archive index.
///
/// The tag strings match those used by existing archives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Grid,
    Raster,
    MultiRaster,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Grid => "sGrid",
            EntityKind::Raster => "Raster",
            EntityKind::MultiRaster => "MultiRaster",
        }
    }
}

impl FromStr for EntityKind {
    type Err = ArchiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sGrid" => Ok(EntityKind::Grid),
            "Raster" => Ok(EntityKind::Raster),
            "MultiRaster" => Ok(EntityKind::MultiRaster),
            other => Err(ArchiveError::format(format!("unknown kind tag '{}'", other))),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Any value the archive can hold.
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Grid(Grid),
    Raster(Raster),
    MultiRaster(MultiRaster),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Grid(_) => EntityKind::Grid,
            Entity::Raster(_) => EntityKind::Raster,
            Entity::MultiRaster(_) => EntityKind::MultiRaster,
        }
    }

    pub fn as_grid(&self) -> Option<&Grid> {
        match self {
            Entity::Grid(grid) => Some(grid),
            _ => None,
        }
    }

    pub fn as_raster(&self) -> Option<&Raster> {
        match self {
            Entity::Raster(raster) => Some(raster),
            _ => None,
        }
    }

    pub fn as_multi_raster(&self) -> Option<&MultiRaster> {
        match self {
            Entity::MultiRaster(multi) => Some(multi),
            _ => None,
        }
    }
}

impl From<Grid> for Entity {
    fn from(grid: Grid) -> Self {
        Entity::Grid(grid)
    }
}

impl From<Raster> for Entity {
    fn from(raster: Raster) -> Self {
        Entity::Raster(raster)
    }
}

impl From<MultiRaster> for Entity {
    fn from(multi: MultiRaster) -> Self {
        Entity::MultiRaster(multi)
    }
}

/// Conversion hook for multi-object saves.
///
/// Collections of foreign values implement this to expose the entries the
/// archive understands; entries returning `None` are skipped with a warning.
pub trait AsEntity {
    fn as_entity(&self) -> Option<&Entity>;

    /// Short description used when the value is skipped.
    fn describe(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }
}

impl AsEntity for Entity {
    fn as_entity(&self) -> Option<&Entity> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tags_roundtrip() {
        for kind in [EntityKind::Grid, EntityKind::Raster, EntityKind::MultiRaster] {
            assert_eq!(kind.as_str().parse::<EntityKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_kind_is_format_error() {
        let err = "Dataset".parse::<EntityKind>().unwrap_err();
        assert!(matches!(err, ArchiveError::Format(_)));
        assert!("raster".parse::<EntityKind>().is_err());
    }
}
