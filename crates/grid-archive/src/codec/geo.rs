//! Geo-descriptor (view finder) encoding.
//!
//! The descriptor carries the affine, shape, nodata and CRS inline; the mask
//! bytes go to their own blob and only its shape and dtype are recorded.

use std::path::Path;

use grid_common::{Affine, Crs, DType, Nodata, ViewFinder};
use ndarray::Ix2;
use serde_json::Value;

use crate::codec::blob;
use crate::config::ArchiveConfig;
use crate::error::{ArchiveError, Result};
use crate::layout::MASK_KEY;

/// Element type name recorded for masks.
pub const MASK_DTYPE: &str = "bool";

const NAN_MARKER: &str = "nan";
const POS_INF_MARKER: &str = "inf";
const NEG_INF_MARKER: &str = "-inf";

/// Encode a nodata sentinel as JSON.
///
/// NaN becomes the string `"nan"`; integers are written exactly; infinities,
/// which JSON numbers cannot express, use `"inf"` / `"-inf"`.
pub fn encode_nodata(nodata: Nodata) -> Value {
    if nodata.is_nan() {
        return Value::from(NAN_MARKER);
    }
    match nodata {
        Nodata::Int16(v) => Value::from(v),
        Nodata::Int32(v) => Value::from(v),
        Nodata::Int64(v) => Value::from(v),
        Nodata::Float32(v) => encode_float(f64::from(v)),
        Nodata::Float64(v) => encode_float(v),
        Nodata::NotANumber => Value::from(NAN_MARKER),
    }
}

fn encode_float(v: f64) -> Value {
    if v == f64::INFINITY {
        Value::from(POS_INF_MARKER)
    } else if v == f64::NEG_INFINITY {
        Value::from(NEG_INF_MARKER)
    } else {
        Value::from(v)
    }
}

/// Decode a stored sentinel, casting numbers to the exact width of `dtype`.
///
/// The NaN marker yields `NotANumber` whatever `dtype` is.
pub fn decode_nodata(value: &Value, dtype: DType) -> Result<Nodata> {
    let nodata = match value {
        Value::String(s) if s == NAN_MARKER => return Ok(Nodata::NotANumber),
        Value::String(s) if s == POS_INF_MARKER => Nodata::from_f64(f64::INFINITY, dtype),
        Value::String(s) if s == NEG_INF_MARKER => Nodata::from_f64(f64::NEG_INFINITY, dtype),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Nodata::from_i64(i, dtype),
            (None, Some(f)) => Nodata::from_f64(f, dtype),
            (None, None) => {
                return Err(ArchiveError::format(format!("unreadable nodata number {}", n)))
            }
        },
        other => {
            return Err(ArchiveError::format(format!(
                "nodata must be a number or \"nan\", got {}",
                other
            )))
        }
    };
    nodata.map_err(|e| ArchiveError::format(e.to_string()))
}

/// Interpret a 2-element shape field.
pub fn shape2(shape: &[usize], field: &str) -> Result<(usize, usize)> {
    match shape {
        [rows, cols] => Ok((*rows, *cols)),
        _ => Err(ArchiveError::format(format!(
            "{} must have 2 dimensions, got {:?}",
            field, shape
        ))),
    }
}

/// The view finder fields of a descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedGeo {
    pub affine: Vec<f64>,
    pub shape: Vec<usize>,
    pub nodata: Value,
    pub crs: String,
    pub mask_shape: Vec<usize>,
    pub mask_dtype: String,
}

impl EncodedGeo {
    /// Encode `viewfinder`, refusing values that would not read back.
    ///
    /// Non-finite affine coefficients have no JSON form and a CRS must be in
    /// its canonical text form; both are format errors.
    pub fn encode(viewfinder: &ViewFinder) -> Result<Self> {
        let affine = viewfinder.affine();
        if !affine.is_finite() {
            return Err(ArchiveError::format(format!(
                "affine coefficients must be finite, got {:?}",
                affine.coefficients()
            )));
        }
        viewfinder.crs().check_canonical()?;

        let (rows, cols) = viewfinder.shape();
        Ok(Self {
            affine: affine.coefficients().to_vec(),
            shape: vec![rows, cols],
            nodata: encode_nodata(viewfinder.nodata()),
            crs: viewfinder.crs().to_string(),
            mask_shape: viewfinder.mask().shape().to_vec(),
            mask_dtype: MASK_DTYPE.to_string(),
        })
    }

    /// Rebuild the view finder, reading the mask from `mask_path`.
    ///
    /// `nodata_dtype` is the dtype a numeric sentinel is cast to.
    pub fn decode(&self, mask_path: &Path, nodata_dtype: DType) -> Result<ViewFinder> {
        let shape = shape2(&self.shape, "shape")?;
        if self.mask_dtype != MASK_DTYPE {
            return Err(ArchiveError::format(format!(
                "mask dtype must be '{}', got '{}'",
                MASK_DTYPE, self.mask_dtype
            )));
        }
        if self.mask_shape != self.shape {
            return Err(ArchiveError::format(format!(
                "mask shape {:?} does not match grid shape {:?}",
                self.mask_shape, self.shape
            )));
        }

        let mask = blob::read_array::<bool>(mask_path, MASK_KEY)?
            .into_dimensionality::<Ix2>()
            .map_err(|e| ArchiveError::format(format!("mask is not 2-dimensional: {}", e)))?;
        if mask.dim() != shape {
            return Err(ArchiveError::format(format!(
                "stored mask shape {:?} does not match declared shape {:?}",
                mask.shape(),
                self.shape
            )));
        }

        let nodata = decode_nodata(&self.nodata, nodata_dtype)?;
        let affine = Affine::from_coefficients(&self.affine)?;
        let crs: Crs = self.crs.parse()?;

        Ok(ViewFinder::new(affine, shape, nodata, crs, mask)?)
    }
}

/// Write the mask blob of `viewfinder` to `mask_path`.
pub fn write_mask(viewfinder: &ViewFinder, mask_path: &Path, config: &ArchiveConfig) -> Result<()> {
    blob::write_array(mask_path, MASK_KEY, viewfinder.mask(), config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encode_nodata() {
        assert_eq!(encode_nodata(Nodata::NotANumber), json!("nan"));
        assert_eq!(encode_nodata(Nodata::Float32(f32::NAN)), json!("nan"));
        assert_eq!(encode_nodata(Nodata::Int32(-1)), json!(-1));
        assert_eq!(encode_nodata(Nodata::Int64(i64::MIN)), json!(i64::MIN));
        assert_eq!(encode_nodata(Nodata::Float64(-9999.5)), json!(-9999.5));
        assert_eq!(encode_nodata(Nodata::Float32(f32::INFINITY)), json!("inf"));
        assert_eq!(encode_nodata(Nodata::Float64(f64::NEG_INFINITY)), json!("-inf"));
    }

    #[test]
    fn test_decode_nodata_uses_declared_dtype() {
        assert_eq!(decode_nodata(&json!(-1), DType::Int16).unwrap(), Nodata::Int16(-1));
        assert_eq!(decode_nodata(&json!(-1), DType::Int64).unwrap(), Nodata::Int64(-1));
        assert_eq!(
            decode_nodata(&json!(-1), DType::Float32).unwrap(),
            Nodata::Float32(-1.0)
        );
        // float-encoded integers, as written by float()-based encoders
        assert_eq!(
            decode_nodata(&json!(-9999.0), DType::Int32).unwrap(),
            Nodata::Int32(-9999)
        );
    }

    #[test]
    fn test_decode_nan_ignores_dtype() {
        for dtype in DType::ALL {
            assert!(decode_nodata(&json!("nan"), dtype).unwrap().is_nan());
        }
    }

    #[test]
    fn test_decode_nodata_rejects_bad_values() {
        assert!(decode_nodata(&json!(null), DType::Float64).is_err());
        assert!(decode_nodata(&json!("missing"), DType::Float64).is_err());
        assert!(decode_nodata(&json!(1.5), DType::Int32).is_err());
        assert!(decode_nodata(&json!(40000), DType::Int16).is_err());
        assert!(decode_nodata(&json!("inf"), DType::Int64).is_err());
    }

    #[test]
    fn test_float32_nodata_survives_widening() {
        let stored = encode_nodata(Nodata::Float32(0.1));
        assert_eq!(
            decode_nodata(&stored, DType::Float32).unwrap(),
            Nodata::Float32(0.1)
        );
    }

    #[test]
    fn test_encode_rejects_values_that_cannot_read_back() {
        let nan_affine = ViewFinder::from_shape(
            Affine::new(f64::NAN, 0.0, 0.0, 0.0, -1.0, 0.0),
            (2, 2),
            Crs::wgs84(),
        );
        assert!(matches!(
            EncodedGeo::encode(&nan_affine),
            Err(ArchiveError::Format(_))
        ));

        for crs in [Crs::Other(String::new()), Crs::Other("EPSG:4326".to_string())] {
            let viewfinder = ViewFinder::from_shape(Affine::identity(), (2, 2), crs);
            assert!(matches!(
                EncodedGeo::encode(&viewfinder),
                Err(ArchiveError::Format(_))
            ));
        }
    }

    #[test]
    fn test_shape2() {
        assert_eq!(shape2(&[3, 4], "shape").unwrap(), (3, 4));
        assert!(shape2(&[3], "shape").is_err());
        assert!(shape2(&[1, 2, 3], "shape").is_err());
    }
}
