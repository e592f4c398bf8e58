//! Nodata sentinel values.

use std::fmt;

use crate::dtype::DType;
use crate::error::GeoError;

/// The value marking a cell as missing.
///
/// Numeric sentinels carry the exact width of the array they belong to.
/// `NotANumber` is dtype-agnostic: it is accepted alongside integer data too.
#[derive(Debug, Clone, Copy)]
pub enum Nodata {
    NotANumber,
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
}

impl Nodata {
    /// True for the symbolic NaN and for float sentinels holding a NaN.
    pub fn is_nan(&self) -> bool {
        match self {
            Nodata::NotANumber => true,
            Nodata::Float32(v) => v.is_nan(),
            Nodata::Float64(v) => v.is_nan(),
            _ => false,
        }
    }

    /// The dtype of a numeric sentinel; `None` for `NotANumber`.
    pub fn dtype(&self) -> Option<DType> {
        match self {
            Nodata::NotANumber => None,
            Nodata::Int16(_) => Some(DType::Int16),
            Nodata::Int32(_) => Some(DType::Int32),
            Nodata::Int64(_) => Some(DType::Int64),
            Nodata::Float32(_) => Some(DType::Float32),
            Nodata::Float64(_) => Some(DType::Float64),
        }
    }

    /// The sentinel widened to `f64` (lossy only for very large `i64`).
    pub fn as_f64(&self) -> f64 {
        match self {
            Nodata::NotANumber => f64::NAN,
            Nodata::Int16(v) => f64::from(*v),
            Nodata::Int32(v) => f64::from(*v),
            Nodata::Int64(v) => *v as f64,
            Nodata::Float32(v) => f64::from(*v),
            Nodata::Float64(v) => *v,
        }
    }

    /// Cast an integer to the exact width of `dtype`.
    pub fn from_i64(value: i64, dtype: DType) -> Result<Self, GeoError> {
        let out_of_range = || {
            GeoError::InvalidNodata(format!("{} does not fit in {}", value, dtype))
        };
        Ok(match dtype {
            DType::Int16 => Nodata::Int16(i16::try_from(value).map_err(|_| out_of_range())?),
            DType::Int32 => Nodata::Int32(i32::try_from(value).map_err(|_| out_of_range())?),
            DType::Int64 => Nodata::Int64(value),
            DType::Float32 => Nodata::Float32(value as f32),
            DType::Float64 => Nodata::Float64(value as f64),
        })
    }

    /// Cast a float to the exact width of `dtype`.
    ///
    /// Integer targets only accept integral values within range.
    pub fn from_f64(value: f64, dtype: DType) -> Result<Self, GeoError> {
        if dtype.is_float() {
            return Ok(match dtype {
                DType::Float32 => {
                    let narrowed = value as f32;
                    if value.is_finite() && narrowed.is_infinite() {
                        return Err(GeoError::InvalidNodata(format!(
                            "{} overflows float32",
                            value
                        )));
                    }
                    Nodata::Float32(narrowed)
                }
                _ => Nodata::Float64(value),
            });
        }

        // 2^63 is exactly representable, i64::MAX is not
        const I64_UPPER: f64 = 9_223_372_036_854_775_808.0;
        if !value.is_finite() || value.fract() != 0.0 || value < i64::MIN as f64 || value >= I64_UPPER
        {
            return Err(GeoError::InvalidNodata(format!(
                "{} is not representable as {}",
                value, dtype
            )));
        }
        Self::from_i64(value as i64, dtype)
    }
}

impl PartialEq for Nodata {
    fn eq(&self, other: &Self) -> bool {
        if self.is_nan() || other.is_nan() {
            return self.is_nan() && other.is_nan();
        }
        match (self, other) {
            (Nodata::Int16(a), Nodata::Int16(b)) => a == b,
            (Nodata::Int32(a), Nodata::Int32(b)) => a == b,
            (Nodata::Int64(a), Nodata::Int64(b)) => a == b,
            (Nodata::Float32(a), Nodata::Float32(b)) => a == b,
            (Nodata::Float64(a), Nodata::Float64(b)) => a == b,
            _ => false,
        }
    }
}

impl Default for Nodata {
    fn default() -> Self {
        Nodata::NotANumber
    }
}

impl From<i16> for Nodata {
    fn from(v: i16) -> Self {
        Nodata::Int16(v)
    }
}

impl From<i32> for Nodata {
    fn from(v: i32) -> Self {
        Nodata::Int32(v)
    }
}

impl From<i64> for Nodata {
    fn from(v: i64) -> Self {
        Nodata::Int64(v)
    }
}

impl From<f32> for Nodata {
    fn from(v: f32) -> Self {
        if v.is_nan() {
            Nodata::NotANumber
        } else {
            Nodata::Float32(v)
        }
    }
}

impl From<f64> for Nodata {
    fn from(v: f64) -> Self {
        if v.is_nan() {
            Nodata::NotANumber
        } else {
            Nodata::Float64(v)
        }
    }
}

impl fmt::Display for Nodata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Nodata::NotANumber => write!(f, "nan"),
            Nodata::Int16(v) => write!(f, "{}", v),
            Nodata::Int32(v) => write!(f, "{}", v),
            Nodata::Int64(v) => write!(f, "{}", v),
            Nodata::Float32(v) => write!(f, "{}", v),
            Nodata::Float64(v) => write!(f, "{}", v),
        }
    }
}
