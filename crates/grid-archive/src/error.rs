//! Error types for archive reads and writes.

use std::path::{Path, PathBuf};

use grid_common::GeoError;
use thiserror::Error;

/// Errors that can occur while saving or loading an archive.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// A required descriptor, blob or index file is missing.
    #[error("archive file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    /// A descriptor or blob is malformed or inconsistent.
    #[error("invalid archive format: {0}")]
    Format(String),

    /// The declared data dtype is not supported.
    #[error("unsupported data type: {0}")]
    UnsupportedType(String),

    /// One entity of a multi-object save failed; the files written by that
    /// save have been removed and no index was written.
    #[error("archive write failed at object '{name}': {source}")]
    PartialArchiveWrite {
        name: String,
        #[source]
        source: Box<ArchiveError>,
    },

    /// Storage/IO error.
    #[error("storage error: {0}")]
    Storage(String),

    /// NPZ encode/decode error.
    #[error("blob error: {0}")]
    Blob(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ArchiveError {
    /// Create a Format error.
    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }

    /// Create a NotFound error.
    pub fn not_found(path: impl AsRef<Path>) -> Self {
        Self::NotFound {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Map an IO error for `path`, keeping missing files distinct.
    pub fn from_io(err: std::io::Error, path: &Path) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::not_found(path)
        } else {
            Self::Storage(format!("{}: {}", path.display(), err))
        }
    }
}

impl From<std::io::Error> for ArchiveError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for ArchiveError {
    fn from(err: serde_json::Error) -> Self {
        Self::Format(err.to_string())
    }
}

impl From<GeoError> for ArchiveError {
    fn from(err: GeoError) -> Self {
        match err {
            GeoError::UnsupportedDType(dtype) => Self::UnsupportedType(dtype),
            other => Self::Format(other.to_string()),
        }
    }
}

/// Result type for archive operations.
pub type Result<T> = std::result::Result<T, ArchiveError>;
