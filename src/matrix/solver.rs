//! Determinants, cofactors and inverses for small square matrices.
//!
//! Orders 0–3 use closed-form expressions. Larger matrices go through either a
//! Doolittle LU factorization with partial pivoting or a recursive cofactor
//! expansion along the first row. LU reports `SingularMatrix` as soon as a
//! pivot column is entirely zero; callers that need a value anyway retry with
//! cofactor expansion, which is how `inverse()` and `adjunct_element()` behave.
//!
//! Complexity: LU is O(n³); cofactor expansion is O(n!) and only meant for the
//! tiny matrices this crate handles.
use super::Matrix;
use crate::error::{AlgebraError, Result};
use log::debug;
use serde::{Deserialize, Serialize};

/// Algorithm used for determinants of order ≥ 4.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeterminantMethod {
    /// Doolittle LU decomposition with partial pivoting.
    #[default]
    Lu,
    /// Recursive Laplace expansion along the first row.
    Cofactor,
}

impl Matrix<f64> {
    fn require_square(&self) -> Result<usize> {
        if !self.is_square() {
            return Err(AlgebraError::shape(
                (self.rows(), self.rows()),
                self.shape(),
            ));
        }
        Ok(self.rows())
    }

    pub fn determinant(&self, method: DeterminantMethod) -> Result<f64> {
        let n = self.require_square()?;
        let a = self.as_slice();
        let det = match n {
            0 => 0.0,
            1 => a[0],
            2 => a[0] * a[3] - a[1] * a[2],
            3 => {
                a[0] * (a[4] * a[8] - a[5] * a[7]) - a[1] * (a[3] * a[8] - a[5] * a[6])
                    + a[2] * (a[3] * a[7] - a[4] * a[6])
            }
            _ => match method {
                DeterminantMethod::Lu => self.lu_determinant()?,
                DeterminantMethod::Cofactor => self.cofactor_determinant()?,
            },
        };
        Ok(det)
    }

    fn lu_determinant(&self) -> Result<f64> {
        let n = self.rows();
        let mut u = self.as_slice().to_vec();
        let mut perm: Vec<usize> = (0..n).collect();
        let mut sign = 1.0;

        for i in 0..n {
            let mut pivot_row = i;
            let mut best = 0.0f64;
            for j in i..n {
                let candidate = u[j * n + i].abs();
                if candidate > best {
                    best = candidate;
                    pivot_row = j;
                }
            }
            if best == 0.0 {
                return Err(AlgebraError::SingularMatrix);
            }
            if pivot_row != i {
                for k in 0..n {
                    u.swap(i * n + k, pivot_row * n + k);
                }
                perm.swap(i, pivot_row);
                sign = -sign;
            }

            let pivot = u[i * n + i];
            for j in (i + 1)..n {
                let factor = u[j * n + i] / pivot;
                if factor == 0.0 {
                    continue;
                }
                for k in i..n {
                    u[j * n + k] -= factor * u[i * n + k];
                }
            }
        }

        debug!("lu_determinant: n={n} permutation={perm:?}");
        Ok((0..n).fold(sign, |det, i| det * u[i * n + i]))
    }

    fn cofactor_determinant(&self) -> Result<f64> {
        let mut det = 0.0;
        for j in 0..self.cols() {
            let a = self.as_slice()[j];
            if a == 0.0 {
                continue;
            }
            let minor = self.minor(0, j)?;
            let sign = if j % 2 == 0 { 1.0 } else { -1.0 };
            det += a * sign * minor.determinant(DeterminantMethod::Cofactor)?;
        }
        Ok(det)
    }

    /// Copy with `row` and `col` removed. Matrices with at most one row or
    /// column yield a zero matrix of the same size.
    pub fn minor(&self, row: usize, col: usize) -> Result<Matrix<f64>> {
        if row >= self.rows() || col >= self.cols() {
            return Err(AlgebraError::IndexOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            });
        }
        if self.rows() <= 1 || self.cols() <= 1 {
            return Ok(Matrix::new(self.rows(), self.cols()));
        }
        let data = self
            .as_slice()
            .iter()
            .enumerate()
            .filter(|(i, _)| i / self.cols() != row && i % self.cols() != col)
            .map(|(_, &v)| v)
            .collect();
        Matrix::from_vec(self.rows() - 1, self.cols() - 1, data)
    }

    /// Signed cofactor `(-1)^(row+col) · det(minor(row, col))`.
    pub fn adjunct_element(&self, row: usize, col: usize) -> Result<f64> {
        self.require_square()?;
        let minor = self.minor(row, col)?;
        let det = determinant_with_fallback(&minor)?;
        let sign = if (row + col) % 2 == 0 { 1.0 } else { -1.0 };
        Ok(sign * det)
    }

    /// Matrix of all signed cofactors.
    pub fn adjugate_matrix(&self) -> Result<Matrix<f64>> {
        let n = self.require_square()?;
        if n <= 1 {
            return Ok(Matrix::new(n, n));
        }
        let mut data = Vec::with_capacity(n * n);
        for r in 0..n {
            for c in 0..n {
                data.push(self.adjunct_element(r, c)?);
            }
        }
        Matrix::from_vec(n, n, data)
    }

    /// Inverse via `adjugateᵗ / det`. The determinant is taken with LU and
    /// recomputed by cofactor expansion when LU reports a singular pivot.
    pub fn inverse(&self) -> Result<Matrix<f64>> {
        self.require_square()?;
        let det = determinant_with_fallback(self)?;
        self.inverse_from_determinant(det)
    }

    /// Inverse with a fixed determinant path and no fallback.
    pub fn inverse_with(&self, method: DeterminantMethod) -> Result<Matrix<f64>> {
        let det = self.determinant(method)?;
        self.inverse_from_determinant(det)
    }

    fn inverse_from_determinant(&self, det: f64) -> Result<Matrix<f64>> {
        if det == 0.0 || !det.is_finite() {
            return Err(AlgebraError::SingularMatrix);
        }
        if self.rows() == 1 {
            return Matrix::from_vec(1, 1, vec![1.0 / det]);
        }
        self.adjugate_matrix()?.transpose().divided_scalar(det)
    }
}

fn determinant_with_fallback(m: &Matrix<f64>) -> Result<f64> {
    match m.determinant(DeterminantMethod::Lu) {
        Err(AlgebraError::SingularMatrix) => {
            debug!(
                "determinant: LU pivot vanished on {}x{}, retrying with cofactor expansion",
                m.rows(),
                m.cols()
            );
            m.determinant(DeterminantMethod::Cofactor)
        }
        other => other,
    }
}
