//! Configuration for archive writing.

use serde::{Deserialize, Serialize};

/// Configuration for the archive writer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// How array members are stored inside `.npz` files.
    pub compression: BlobCompression,

    /// Indent JSON descriptors (2 spaces) instead of writing one line.
    pub pretty_json: bool,

    /// Create missing parent directories of the base path.
    pub create_dirs: bool,

    /// Write each file to a temp sibling first, then rename into place.
    pub atomic_writes: bool,

    /// Suffix appended to a file name for its temp sibling.
    pub temp_suffix: String,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            compression: BlobCompression::Deflate,
            pretty_json: true,
            create_dirs: true,
            atomic_writes: true,
            temp_suffix: ".tmp".to_string(),
        }
    }
}

fn parse_bool(val: &str) -> bool {
    val.to_lowercase() == "true" || val == "1"
}

impl ArchiveConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("GRID_ARCHIVE_COMPRESSION") {
            config.compression = BlobCompression::from_str(&val);
        }

        if let Ok(val) = std::env::var("GRID_ARCHIVE_PRETTY_JSON") {
            config.pretty_json = parse_bool(&val);
        }

        if let Ok(val) = std::env::var("GRID_ARCHIVE_CREATE_DIRS") {
            config.create_dirs = parse_bool(&val);
        }

        if let Ok(val) = std::env::var("GRID_ARCHIVE_ATOMIC_WRITES") {
            config.atomic_writes = parse_bool(&val);
        }

        if let Ok(val) = std::env::var("GRID_ARCHIVE_TEMP_SUFFIX") {
            config.temp_suffix = val;
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.atomic_writes && self.temp_suffix.is_empty() {
            return Err("temp_suffix must be non-empty when atomic_writes is enabled".to_string());
        }

        if self.temp_suffix.contains(|c| c == '/' || c == '\\') {
            return Err("temp_suffix must not contain path separators".to_string());
        }

        Ok(())
    }
}

/// Storage mode for `.npz` members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BlobCompression {
    /// Zip "stored" members, as `numpy.savez` writes them.
    Stored,
    /// Deflate members, as `numpy.savez_compressed` writes them.
    #[default]
    Deflate,
}

impl BlobCompression {
    /// Parse from string (case-insensitive).
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "none" | "stored" => Self::Stored,
            _ => Self::Deflate,
        }
    }

    /// Get the mode name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stored => "stored",
            Self::Deflate => "deflate",
        }
    }
}

impl std::fmt::Display for BlobCompression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
