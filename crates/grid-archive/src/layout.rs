//! File naming for archive members.
//!
//! Every file of an entity stored at base path `B` is `B` with a suffix
//! appended to its final component:
//!
//! ```text
//! B_grid.json    grid descriptor
//! B_raster.json  raster / multi-raster descriptor
//! B_data.npz     raster data (array "data")
//! B_mask.npz     validity mask (array "mask")
//! B_index.json   multi-object index; objects live under B_{name}
//! ```

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::{ArchiveError, Result};

pub const GRID_DESCRIPTOR_SUFFIX: &str = "_grid.json";
pub const RASTER_DESCRIPTOR_SUFFIX: &str = "_raster.json";
pub const DATA_BLOB_SUFFIX: &str = "_data.npz";
pub const MASK_BLOB_SUFFIX: &str = "_mask.npz";
pub const INDEX_SUFFIX: &str = "_index.json";

/// Array key of the raster payload inside its `.npz`.
pub const DATA_KEY: &str = "data";
/// Array key of the validity mask inside its `.npz`.
pub const MASK_KEY: &str = "mask";

/// Append `suffix` to the last component of `base`.
pub fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(base.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

pub fn grid_descriptor(base: &Path) -> PathBuf {
    with_suffix(base, GRID_DESCRIPTOR_SUFFIX)
}

pub fn raster_descriptor(base: &Path) -> PathBuf {
    with_suffix(base, RASTER_DESCRIPTOR_SUFFIX)
}

pub fn data_blob(base: &Path) -> PathBuf {
    with_suffix(base, DATA_BLOB_SUFFIX)
}

pub fn mask_blob(base: &Path) -> PathBuf {
    with_suffix(base, MASK_BLOB_SUFFIX)
}

pub fn index(base: &Path) -> PathBuf {
    with_suffix(base, INDEX_SUFFIX)
}

/// Base path of object `name` within the archive at `base`.
pub fn object_base(base: &Path, name: &str) -> Result<PathBuf> {
    validate_object_name(name)?;
    Ok(with_suffix(base, &format!("_{}", name)))
}

/// Object names become part of file names, so they must be non-empty and
/// must not contain path separators or traversal components.
pub fn validate_object_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ArchiveError::format("object name must not be empty"));
    }
    if name.contains(|c| c == '/' || c == '\\' || c == '\0') || name == ".." {
        return Err(ArchiveError::format(format!(
            "object name '{}' contains a path separator",
            name
        )));
    }
    Ok(())
}
