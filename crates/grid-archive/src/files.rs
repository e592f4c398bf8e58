//! File writes and reads shared by the codecs.
//!
//! Writes go through a temp file + rename so a reader never sees a
//! half-written member:
//! 1. Write to `<file><temp_suffix>`
//! 2. Sync the temp file
//! 3. Rename temp to final (atomic on POSIX)
//!
//! If any step fails the temp file is removed.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::ArchiveConfig;
use crate::error::{ArchiveError, Result};
use crate::layout::with_suffix;

/// Files produced by one save call, in write order.
///
/// Used both for reporting and for rolling back a failed save.
#[derive(Debug, Default)]
pub struct FileSet {
    files: Vec<PathBuf>,
}

impl FileSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, path: PathBuf) {
        self.files.push(path);
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        self.files.iter()
    }

    /// Remove every recorded file. Missing files are ignored.
    pub fn rollback(&mut self) {
        for path in self.files.drain(..).rev() {
            match fs::remove_file(&path) {
                Ok(()) => debug!(path = %path.display(), "Removed archive file"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to remove archive file during rollback"
                ),
            }
        }
    }

    pub fn into_vec(self) -> Vec<PathBuf> {
        self.files
    }
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            fs::create_dir_all(parent).map_err(|e| ArchiveError::from_io(e, parent))?;
            debug!(dir = %parent.display(), "Created archive directory");
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Create `path` and fill it with `write`, honoring the config's atomic and
/// directory settings.
pub fn write_file<F>(path: &Path, config: &ArchiveConfig, write: F) -> Result<()>
where
    F: FnOnce(&mut File) -> Result<()>,
{
    if config.create_dirs {
        ensure_parent_dir(path)?;
    }

    let target = if config.atomic_writes {
        with_suffix(path, &config.temp_suffix)
    } else {
        path.to_path_buf()
    };

    // Clean up stale temp file if exists (from previous failed attempt)
    if config.atomic_writes && target.exists() {
        warn!(path = %target.display(), "Removing stale temp file");
        let _ = fs::remove_file(&target);
    }

    let written = File::create(&target)
        .map_err(|e| ArchiveError::from_io(e, &target))
        .and_then(|mut file| {
            write(&mut file)?;
            file.sync_all()
                .map_err(|e| ArchiveError::from_io(e, &target))
        });

    if let Err(e) = written {
        let _ = fs::remove_file(&target);
        return Err(e);
    }

    if config.atomic_writes {
        if let Err(e) = fs::rename(&target, path) {
            warn!(
                temp_path = %target.display(),
                path = %path.display(),
                error = %e,
                "Rename failed, cleaning up temp file"
            );
            let _ = fs::remove_file(&target);
            return Err(ArchiveError::from_io(e, path));
        }
    }

    debug!(path = %path.display(), "Wrote archive file");
    Ok(())
}

/// Remove `path` if it exists.
///
/// Used to drop a completeness marker (descriptor or index) before the
/// files it vouches for are overwritten.
pub fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!(path = %path.display(), "Removed previous archive file");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(ArchiveError::from_io(e, path)),
    }
}

/// Serialize `value` as a JSON file.
pub fn write_json<T: Serialize>(path: &Path, value: &T, config: &ArchiveConfig) -> Result<()> {
    write_file(path, config, |file| {
        let mut writer = BufWriter::new(file);
        if config.pretty_json {
            serde_json::to_writer_pretty(&mut writer, value)?;
        } else {
            serde_json::to_writer(&mut writer, value)?;
        }
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    })
}

/// Open a file for reading, reporting a missing file as `NotFound`.
pub fn open(path: &Path) -> Result<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| ArchiveError::from_io(e, path))
}

/// Read a JSON file into `T`; malformed content is a format error.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let reader = open(path)?;
    serde_json::from_reader(reader).map_err(|e| {
        ArchiveError::format(format!("malformed JSON in {}: {}", path.display(), e))
    })
}
