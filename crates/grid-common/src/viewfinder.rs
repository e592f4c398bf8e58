//! The georeferencing envelope shared by grids and rasters.

use ndarray::Array2;

use crate::affine::Affine;
use crate::crs::Crs;
use crate::error::{GeoError, GeoResult};
use crate::nodata::Nodata;

/// Affine transform, pixel grid shape, nodata sentinel, CRS and validity mask.
///
/// The mask always has the same `(rows, cols)` shape as the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewFinder {
    affine: Affine,
    shape: (usize, usize),
    nodata: Nodata,
    crs: Crs,
    mask: Array2<bool>,
}

impl ViewFinder {
    /// Create a view finder, checking that `mask` matches `shape`.
    pub fn new(
        affine: Affine,
        shape: (usize, usize),
        nodata: Nodata,
        crs: Crs,
        mask: Array2<bool>,
    ) -> GeoResult<Self> {
        if mask.dim() != shape {
            return Err(GeoError::shape_mismatch(
                "mask",
                &[shape.0, shape.1],
                mask.shape(),
            ));
        }
        Ok(Self {
            affine,
            shape,
            nodata,
            crs,
            mask,
        })
    }

    /// A view finder with every cell valid and a NaN sentinel.
    pub fn from_shape(affine: Affine, shape: (usize, usize), crs: Crs) -> Self {
        Self {
            affine,
            shape,
            nodata: Nodata::NotANumber,
            crs,
            mask: Array2::from_elem(shape, true),
        }
    }

    /// Replace the nodata sentinel.
    pub fn with_nodata(mut self, nodata: impl Into<Nodata>) -> Self {
        self.nodata = nodata.into();
        self
    }

    pub fn affine(&self) -> &Affine {
        &self.affine
    }

    /// Grid shape as `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    pub fn nodata(&self) -> Nodata {
        self.nodata
    }

    pub fn crs(&self) -> &Crs {
        &self.crs
    }

    pub fn mask(&self) -> &Array2<bool> {
        &self.mask
    }

    /// Number of cells flagged valid by the mask.
    pub fn valid_count(&self) -> usize {
        self.mask.iter().filter(|v| **v).count()
    }
}
