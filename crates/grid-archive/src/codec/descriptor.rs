//! JSON descriptors written next to the blobs.

use std::path::Path;

use grid_common::{Metadata, RasterData};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::codec::geo::EncodedGeo;
use crate::error::{ArchiveError, Result};
use crate::files;
use crate::kind::EntityKind;

/// Descriptor of a grid-only entity (`B_grid.json`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridDescriptor {
    #[serde(rename = "type")]
    pub kind: String,
    pub affine: Vec<f64>,
    pub shape: Vec<usize>,
    pub nodata: Value,
    pub crs: String,
    pub mask_shape: Vec<usize>,
    pub mask_dtype: String,
}

impl GridDescriptor {
    pub fn new(geo: EncodedGeo) -> Self {
        Self {
            kind: EntityKind::Grid.as_str().to_string(),
            affine: geo.affine,
            shape: geo.shape,
            nodata: geo.nodata,
            crs: geo.crs,
            mask_shape: geo.mask_shape,
            mask_dtype: geo.mask_dtype,
        }
    }

    pub fn into_geo(self) -> EncodedGeo {
        EncodedGeo {
            affine: self.affine,
            shape: self.shape,
            nodata: self.nodata,
            crs: self.crs,
            mask_shape: self.mask_shape,
            mask_dtype: self.mask_dtype,
        }
    }
}

/// Descriptor of a raster or multi-raster (`B_raster.json`).
///
/// `data_shape`/`data_dtype` describe the data blob; `viewfinder_shape` is
/// the registration grid and may differ from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RasterDescriptor {
    #[serde(rename = "type")]
    pub kind: String,
    pub data_shape: Vec<usize>,
    pub data_dtype: String,
    pub affine: Vec<f64>,
    pub viewfinder_shape: Vec<usize>,
    pub nodata: Value,
    pub crs: String,
    pub mask_shape: Vec<usize>,
    pub mask_dtype: String,
    #[serde(default)]
    pub metadata: Metadata,
}

/// The data-related part of a raster descriptor.
#[derive(Debug, Clone)]
pub struct DataHeader {
    pub data_shape: Vec<usize>,
    pub data_dtype: String,
    pub metadata: Metadata,
}

impl RasterDescriptor {
    pub fn new(kind: EntityKind, data: &RasterData, geo: EncodedGeo, metadata: Metadata) -> Self {
        Self {
            kind: kind.as_str().to_string(),
            data_shape: data.shape().to_vec(),
            data_dtype: data.dtype().as_str().to_string(),
            affine: geo.affine,
            viewfinder_shape: geo.shape,
            nodata: geo.nodata,
            crs: geo.crs,
            mask_shape: geo.mask_shape,
            mask_dtype: geo.mask_dtype,
            metadata,
        }
    }

    pub fn into_parts(self) -> (DataHeader, EncodedGeo) {
        let header = DataHeader {
            data_shape: self.data_shape,
            data_dtype: self.data_dtype,
            metadata: self.metadata,
        };
        let geo = EncodedGeo {
            affine: self.affine,
            shape: self.viewfinder_shape,
            nodata: self.nodata,
            crs: self.crs,
            mask_shape: self.mask_shape,
            mask_dtype: self.mask_dtype,
        };
        (header, geo)
    }
}

/// Read the kind tag of a parsed descriptor.
pub fn kind_of(value: &Value) -> Result<EntityKind> {
    match value.get("type") {
        Some(Value::String(tag)) => tag.parse(),
        Some(other) => Err(ArchiveError::format(format!(
            "kind tag must be a string, got {}",
            other
        ))),
        None => Err(ArchiveError::format("descriptor has no kind tag")),
    }
}

/// Read a descriptor file, requiring its kind tag to be one of `accepted`.
pub fn read_descriptor<T: DeserializeOwned>(
    path: &Path,
    accepted: &[EntityKind],
) -> Result<(EntityKind, T)> {
    let value: Value = files::read_json(path)?;
    let kind = kind_of(&value)?;
    if !accepted.contains(&kind) {
        let expected: Vec<&str> = accepted.iter().map(|k| k.as_str()).collect();
        return Err(ArchiveError::format(format!(
            "expected {} in {}, got {}",
            expected.join(" or "),
            path.display(),
            kind
        )));
    }

    let descriptor = serde_json::from_value(value).map_err(|e| {
        ArchiveError::format(format!("malformed descriptor {}: {}", path.display(), e))
    })?;
    Ok((kind, descriptor))
}
