//! Path utilities for archive tests.
//!
//! Archives are written to throwaway directories; these helpers create
//! them and inspect what a save left behind.

use std::path::Path;

/// Creates a temporary directory for test output.
///
/// The directory is automatically cleaned up when the returned `TempDir` is dropped.
pub fn temp_test_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary test directory")
}

/// Returns the sorted file names directly inside `dir`.
///
/// Used to assert exactly which files a save produced (or left behind
/// after a rollback).
pub fn list_file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("Failed to read test directory")
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
