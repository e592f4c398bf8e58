//! `.npz` blob reads and writes.
//!
//! Each blob holds one named array. Members are stored as `<key>.npy` so
//! numpy's `np.load(path)[key]` finds them.

use std::path::Path;

use grid_common::{DType, RasterData, RasterElement};
use ndarray::{ArrayBase, ArrayD, Data, Dimension};
use ndarray_npy::{NpzReader, NpzWriter, ReadableElement, WritableElement};
use tracing::debug;

use crate::config::{ArchiveConfig, BlobCompression};
use crate::error::{ArchiveError, Result};
use crate::files;
use crate::layout::DATA_KEY;

fn member_name(key: &str) -> String {
    format!("{}.npy", key)
}

/// Write `array` as the single member `key` of a new `.npz` at `path`.
pub fn write_array<S, D>(
    path: &Path,
    key: &str,
    array: &ArrayBase<S, D>,
    config: &ArchiveConfig,
) -> Result<()>
where
    S: Data,
    S::Elem: WritableElement,
    D: Dimension,
{
    files::write_file(path, config, |file| {
        let mut npz = match config.compression {
            BlobCompression::Stored => NpzWriter::new(file),
            BlobCompression::Deflate => NpzWriter::new_compressed(file),
        };
        npz.add_array(member_name(key), array)
            .map_err(|e| ArchiveError::Blob(format!("{}: {}", path.display(), e)))?;
        npz.finish()
            .map_err(|e| ArchiveError::Blob(format!("{}: {}", path.display(), e)))?;
        Ok(())
    })?;

    debug!(
        path = %path.display(),
        key = key,
        shape = ?array.shape(),
        compression = %config.compression,
        "Stored array blob"
    );
    Ok(())
}

/// Read member `key` of the `.npz` at `path` as an array of `T`.
///
/// A missing file is `NotFound`; a missing member or an element type that
/// disagrees with `T` is a format error.
pub fn read_array<T: ReadableElement>(path: &Path, key: &str) -> Result<ArrayD<T>> {
    let reader = files::open(path)?;
    let mut npz = NpzReader::new(reader).map_err(|e| {
        ArchiveError::format(format!("{} is not an npz archive: {}", path.display(), e))
    })?;
    let array: ArrayD<T> = npz.by_name(&member_name(key)).map_err(|e| {
        ArchiveError::format(format!(
            "cannot read array '{}' from {}: {}",
            key,
            path.display(),
            e
        ))
    })?;

    debug!(path = %path.display(), key = key, shape = ?array.shape(), "Loaded array blob");
    Ok(array)
}

/// Write the raster payload under the `data` key.
pub fn write_data(path: &Path, data: &RasterData, config: &ArchiveConfig) -> Result<()> {
    match data {
        RasterData::Int16(a) => write_array(path, DATA_KEY, a, config),
        RasterData::Int32(a) => write_array(path, DATA_KEY, a, config),
        RasterData::Int64(a) => write_array(path, DATA_KEY, a, config),
        RasterData::Float32(a) => write_array(path, DATA_KEY, a, config),
        RasterData::Float64(a) => write_array(path, DATA_KEY, a, config),
    }
}

fn read_typed<T: RasterElement + ReadableElement>(path: &Path) -> Result<RasterData> {
    read_array::<T>(path, DATA_KEY).map(T::wrap)
}

/// Read the raster payload, interpreting it as the declared `dtype`.
pub fn read_data(path: &Path, dtype: DType) -> Result<RasterData> {
    match dtype {
        DType::Int16 => read_typed::<i16>(path),
        DType::Int32 => read_typed::<i32>(path),
        DType::Int64 => read_typed::<i64>(path),
        DType::Float32 => read_typed::<f32>(path),
        DType::Float64 => read_typed::<f64>(path),
    }
}
