//! Multi-object archives: several named entities under one base path.
//!
//! ```text
//! save_objects({dem, flowdir, grid}, "out/basin")
//!      │
//!      ├─► out/basin_dem_*        (entity codec, per object)
//!      ├─► out/basin_flowdir_*
//!      ├─► out/basin_grid_*
//!      │
//!      └─► out/basin_index.json   (written last)
//! ```
//!
//! The index is the completeness marker: it only exists once every object
//! was written. Any previous index is removed before the first object file
//! is touched. If an object fails, the files already written by the call are
//! removed and `PartialArchiveWrite` is returned.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::codec;
use crate::config::ArchiveConfig;
use crate::error::{ArchiveError, Result};
use crate::files::{self, FileSet};
use crate::kind::{AsEntity, Entity, EntityKind};
use crate::layout;

/// Contents of `B_index.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArchiveIndex {
    /// Object name to kind tag. Tags are kept as text so that indexes
    /// naming kinds this version does not know still parse.
    pub objects: BTreeMap<String, String>,
    /// Files written by the save, informational only.
    #[serde(default)]
    pub saved_files: Vec<String>,
}

impl ArchiveIndex {
    /// Read the index of the archive at `base`.
    pub fn read(base: &Path) -> Result<Self> {
        files::read_json(&layout::index(base))
    }
}

/// Outcome of a save call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SaveReport {
    /// Objects written, in save order. A single-entity save records one
    /// entry with an empty name.
    pub objects: Vec<(String, EntityKind)>,
    /// Every file written, in write order.
    pub files: Vec<PathBuf>,
    /// Objects that were not entities and were skipped.
    pub skipped: Vec<String>,
}

impl SaveReport {
    pub(crate) fn single(kind: EntityKind, files: FileSet) -> Self {
        Self {
            objects: vec![(String::new(), kind)],
            files: files.into_vec(),
            skipped: Vec::new(),
        }
    }
}

/// Save every object under `base`, then write `B_index.json`.
pub fn save_objects<'a, I, K, O>(
    objects: I,
    base: &Path,
    config: &ArchiveConfig,
) -> Result<SaveReport>
where
    I: IntoIterator<Item = (K, &'a O)>,
    K: AsRef<str>,
    O: AsEntity + ?Sized + 'a,
{
    let mut index = ArchiveIndex::default();
    let mut report = SaveReport::default();
    let mut written = FileSet::new();
    let mut seen = HashSet::new();

    let index_path = layout::index(base);
    files::remove_if_exists(&index_path)?;

    for (name, object) in objects {
        let name = name.as_ref();
        let entity = match object.as_entity() {
            Some(entity) => entity,
            None => {
                warn!(
                    name = name,
                    object = %object.describe(),
                    "Object type not supported, skipping"
                );
                report.skipped.push(name.to_string());
                continue;
            }
        };

        let result = if seen.insert(name.to_string()) {
            layout::object_base(base, name)
                .and_then(|object_base| {
                    codec::save_entity(entity, &object_base, config, &mut written)
                })
        } else {
            Err(ArchiveError::format(format!("duplicate object name '{}'", name)))
        };

        if let Err(err) = result {
            warn!(
                name = name,
                error = %err,
                files = written.len(),
                "Object save failed, rolling back archive"
            );
            written.rollback();
            return Err(ArchiveError::PartialArchiveWrite {
                name: name.to_string(),
                source: Box::new(err),
            });
        }

        index
            .objects
            .insert(name.to_string(), entity.kind().as_str().to_string());
        report.objects.push((name.to_string(), entity.kind()));
    }

    index.saved_files = written
        .iter()
        .map(|path| path.display().to_string())
        .collect();

    if let Err(err) = files::write_json(&index_path, &index, config) {
        warn!(path = %index_path.display(), error = %err, "Index write failed, rolling back archive");
        written.rollback();
        return Err(err);
    }
    written.push(index_path.clone());

    info!(
        path = %index_path.display(),
        objects = report.objects.len(),
        skipped = report.skipped.len(),
        "Index saved"
    );
    report.files = written.into_vec();
    Ok(report)
}

/// Load every object named in `B_index.json`.
///
/// Entries whose kind tag is unknown are skipped.
pub fn load_objects(base: &Path) -> Result<BTreeMap<String, Entity>> {
    let index = ArchiveIndex::read(base)?;
    let mut objects = BTreeMap::new();

    for (name, tag) in &index.objects {
        let kind = match tag.parse::<EntityKind>() {
            Ok(kind) => kind,
            Err(_) => {
                debug!(name = %name, kind = %tag, "Skipping object of unsupported kind");
                continue;
            }
        };
        let object_base = layout::object_base(base, name)?;
        let entity = codec::load_entity(&object_base, kind)?;
        objects.insert(name.clone(), entity);
    }

    debug!(base = %base.display(), objects = objects.len(), "Archive loaded");
    Ok(objects)
}
