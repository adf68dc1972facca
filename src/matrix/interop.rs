//! Conversions between `Matrix<f64>` and `nalgebra` fixed-size matrices, so
//! affine transforms can be shared with homography code built on `nalgebra`.
use super::Matrix;
use crate::error::{AlgebraError, Result};
use nalgebra::{DMatrix, Matrix3};

impl From<&Matrix3<f64>> for Matrix<f64> {
    fn from(m: &Matrix3<f64>) -> Self {
        let mut data = Vec::with_capacity(9);
        for r in 0..3 {
            for c in 0..3 {
                data.push(m[(r, c)]);
            }
        }
        Matrix {
            rows: 3,
            cols: 3,
            data,
        }
    }
}

impl TryFrom<&Matrix<f64>> for Matrix3<f64> {
    type Error = AlgebraError;

    fn try_from(m: &Matrix<f64>) -> Result<Self> {
        if m.shape() != (3, 3) {
            return Err(AlgebraError::shape((3, 3), m.shape()));
        }
        Ok(Matrix3::from_row_slice(m.as_slice()))
    }
}

impl From<&Matrix<f64>> for DMatrix<f64> {
    fn from(m: &Matrix<f64>) -> Self {
        DMatrix::from_row_slice(m.rows(), m.cols(), m.as_slice())
    }
}
