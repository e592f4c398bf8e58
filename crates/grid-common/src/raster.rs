//! Grid, single-band and multi-band raster values.

use ndarray::{Array, ArrayD, Axis, Dimension};
use serde_json::{Map, Value};

use crate::dtype::DType;
use crate::error::{GeoError, GeoResult};
use crate::nodata::Nodata;
use crate::viewfinder::ViewFinder;

/// Free-form metadata attached to a raster, kept in insertion order.
pub type Metadata = Map<String, Value>;

/// Typed n-dimensional raster payload.
///
/// Equality is element-wise, so arrays containing NaN never compare equal.
#[derive(Debug, Clone, PartialEq)]
pub enum RasterData {
    Int16(ArrayD<i16>),
    Int32(ArrayD<i32>),
    Int64(ArrayD<i64>),
    Float32(ArrayD<f32>),
    Float64(ArrayD<f64>),
}

/// Element types that can back a [`RasterData`].
pub trait RasterElement: Copy + 'static {
    const DTYPE: DType;

    fn wrap(array: ArrayD<Self>) -> RasterData;

    fn unwrap(data: &RasterData) -> Option<&ArrayD<Self>>;
}

macro_rules! impl_raster_element {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl RasterElement for $ty {
                const DTYPE: DType = DType::$variant;

                fn wrap(array: ArrayD<Self>) -> RasterData {
                    RasterData::$variant(array)
                }

                fn unwrap(data: &RasterData) -> Option<&ArrayD<Self>> {
                    match data {
                        RasterData::$variant(array) => Some(array),
                        _ => None,
                    }
                }
            }

            impl<D: Dimension> From<Array<$ty, D>> for RasterData {
                fn from(array: Array<$ty, D>) -> Self {
                    RasterData::$variant(array.into_dyn())
                }
            }
        )*
    };
}

impl_raster_element!(
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    f32 => Float32,
    f64 => Float64,
);

/// Apply an expression to the array inside any `RasterData` variant.
macro_rules! map_data {
    ($data:expr, $array:ident => $body:expr) => {
        match $data {
            RasterData::Int16($array) => $body,
            RasterData::Int32($array) => $body,
            RasterData::Int64($array) => $body,
            RasterData::Float32($array) => $body,
            RasterData::Float64($array) => $body,
        }
    };
}

impl RasterData {
    pub fn dtype(&self) -> DType {
        match self {
            RasterData::Int16(_) => DType::Int16,
            RasterData::Int32(_) => DType::Int32,
            RasterData::Int64(_) => DType::Int64,
            RasterData::Float32(_) => DType::Float32,
            RasterData::Float64(_) => DType::Float64,
        }
    }

    pub fn shape(&self) -> &[usize] {
        map_data!(self, a => a.shape())
    }

    pub fn ndim(&self) -> usize {
        map_data!(self, a => a.ndim())
    }

    pub fn len(&self) -> usize {
        map_data!(self, a => a.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrow the array if it holds elements of type `T`.
    pub fn as_array<T: RasterElement>(&self) -> Option<&ArrayD<T>> {
        T::unwrap(self)
    }

    /// Slice along the leading axis.
    fn index_leading(&self, index: usize) -> RasterData {
        map_data!(self, a => a.index_axis(Axis(0), index).to_owned().into())
    }
}

fn check_nodata(nodata: Nodata, dtype: DType) -> GeoResult<()> {
    match nodata.dtype() {
        // NaN is accepted for any dtype
        _ if nodata.is_nan() => Ok(()),
        Some(nodata_dtype) if nodata_dtype != dtype => Err(GeoError::InvalidNodata(format!(
            "{} sentinel {} cannot accompany {} data",
            nodata_dtype, nodata, dtype
        ))),
        _ => Ok(()),
    }
}

/// A reference grid: pixel geometry with no raster values.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    viewfinder: ViewFinder,
}

impl Grid {
    /// Grid nodata is always floating-point: `NotANumber` or `Float64`.
    pub fn new(viewfinder: ViewFinder) -> GeoResult<Self> {
        match viewfinder.nodata() {
            n if n.is_nan() => {}
            Nodata::Float64(_) => {}
            other => {
                return Err(GeoError::InvalidNodata(format!(
                    "grid nodata must be float64, got {:?}",
                    other
                )))
            }
        }
        Ok(Self { viewfinder })
    }

    pub fn viewfinder(&self) -> &ViewFinder {
        &self.viewfinder
    }

    pub fn into_viewfinder(self) -> ViewFinder {
        self.viewfinder
    }
}

/// A single-band raster: data array, georeferencing and metadata.
///
/// The view finder shape is the registration grid and need not equal the
/// data shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    data: RasterData,
    viewfinder: ViewFinder,
    metadata: Metadata,
}

impl Raster {
    /// Create a raster; a numeric nodata must have the same dtype as `data`.
    pub fn new(
        data: impl Into<RasterData>,
        viewfinder: ViewFinder,
        metadata: Metadata,
    ) -> GeoResult<Self> {
        let data = data.into();
        check_nodata(viewfinder.nodata(), data.dtype())?;
        Ok(Self {
            data,
            viewfinder,
            metadata,
        })
    }

    pub fn data(&self) -> &RasterData {
        &self.data
    }

    pub fn viewfinder(&self) -> &ViewFinder {
        &self.viewfinder
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn dtype(&self) -> DType {
        self.data.dtype()
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    pub fn nodata(&self) -> Nodata {
        self.viewfinder.nodata()
    }

    pub fn into_parts(self) -> (RasterData, ViewFinder, Metadata) {
        (self.data, self.viewfinder, self.metadata)
    }
}

/// A multi-band raster; the data carries a leading band axis.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiRaster {
    inner: Raster,
}

impl MultiRaster {
    /// Create a multi-band raster from `(bands, rows, cols, ...)` data.
    pub fn new(
        data: impl Into<RasterData>,
        viewfinder: ViewFinder,
        metadata: Metadata,
    ) -> GeoResult<Self> {
        let inner = Raster::new(data, viewfinder, metadata)?;
        if inner.data.ndim() < 3 {
            return Err(GeoError::MissingBandAxis(inner.data.ndim()));
        }
        Ok(Self { inner })
    }

    pub fn band_count(&self) -> usize {
        self.inner.shape()[0]
    }

    /// Extract one band as a single-band raster sharing this view finder.
    pub fn band(&self, index: usize) -> Option<Raster> {
        if index >= self.band_count() {
            return None;
        }
        Some(Raster {
            data: self.inner.data.index_leading(index),
            viewfinder: self.inner.viewfinder.clone(),
            metadata: self.inner.metadata.clone(),
        })
    }

    /// The bands viewed as one raster value.
    pub fn as_raster(&self) -> &Raster {
        &self.inner
    }

    pub fn data(&self) -> &RasterData {
        self.inner.data()
    }

    pub fn viewfinder(&self) -> &ViewFinder {
        self.inner.viewfinder()
    }

    pub fn metadata(&self) -> &Metadata {
        self.inner.metadata()
    }

    pub fn into_parts(self) -> (RasterData, ViewFinder, Metadata) {
        self.inner.into_parts()
    }
}
