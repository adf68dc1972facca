//! Fixed-point copies of float matrices.
//!
//! The integer inner loops of convolution and resampling run on
//! `QuantizedMatrix`: each element is `trunc(a · scale_factor)` with
//! `scale_factor = i16::MAX / max|a|`, so the largest coefficient maps close to
//! `±32767` and `real ≈ stored / scale_factor`.
//!
//! The factor is rounded down to a whole number whenever it is at least 1.
//! Integer-valued kernels and transforms (Sobel, translations) then quantize
//! exactly and their integer dot products rescale without drift.
use super::Matrix;
use crate::error::{AlgebraError, Result};

/// Largest stored magnitude after quantization.
pub const QUANTIZATION_RANGE: f64 = i16::MAX as f64;

#[derive(Clone, Debug)]
pub struct QuantizedMatrix {
    values: Matrix<i32>,
    scale_factor: f64,
}

impl QuantizedMatrix {
    /// Pair an integer matrix with an explicit scale factor.
    pub fn new(values: Matrix<i32>, scale_factor: f64) -> Result<Self> {
        if scale_factor == 0.0 || !scale_factor.is_finite() {
            return Err(AlgebraError::DivisionByZero);
        }
        Ok(Self {
            values,
            scale_factor,
        })
    }

    #[inline]
    pub fn values(&self) -> &Matrix<i32> {
        &self.values
    }

    #[inline]
    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// Map a stored (or accumulated) integer back to real units.
    #[inline]
    pub fn rescale(&self, stored: i64) -> f64 {
        stored as f64 / self.scale_factor
    }

    /// Rescaled float copy.
    pub fn dequantize(&self) -> Matrix<f64> {
        let mut out = self.values.to_float();
        out.as_mut_slice()
            .iter_mut()
            .for_each(|v| *v /= self.scale_factor);
        out
    }
}

/// Quantized matrices compare their stored integers, not the rescaled reals.
impl PartialEq for QuantizedMatrix {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl Matrix<f64> {
    /// Quantize to scaled integers. Fails with `DivisionByZero` when every
    /// element is zero (or the matrix is empty), since no scale exists.
    pub fn quantize(&self) -> Result<QuantizedMatrix> {
        let max_abs = self
            .as_slice()
            .iter()
            .fold(0.0f64, |acc, v| acc.max(v.abs()));
        if max_abs == 0.0 || !max_abs.is_finite() {
            return Err(AlgebraError::DivisionByZero);
        }
        let raw = QUANTIZATION_RANGE / max_abs;
        let scale_factor = if raw >= 1.0 { raw.floor() } else { raw };
        let data = self
            .as_slice()
            .iter()
            .map(|&v| (v * scale_factor) as i32)
            .collect();
        let values = Matrix::from_vec(self.rows(), self.cols(), data)?;
        Ok(QuantizedMatrix {
            values,
            scale_factor,
        })
    }
}
