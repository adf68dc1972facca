//! Dense row-major matrices with a fixed shape.
//!
//! `Matrix<T>` is the numeric container beneath every other layer: transforms,
//! kernels and pixel planes are all matrices. Shapes never change after
//! construction; operations that would produce a different shape return a new
//! matrix.
//!
//! - Element access is bounds-checked and reports `IndexOutOfBounds`.
//! - Mutating arithmetic takes `&mut self`; the past-tense variants
//!   (`added`, `multiplied_scalar`, ...) allocate and return a fresh matrix.
//! - `Matrix<f64>` additionally converts to a `QuantizedMatrix` for the integer
//!   inner loops of convolution and resampling.

pub mod interop;
pub mod quantized;
pub mod solver;

pub use quantized::QuantizedMatrix;
pub use solver::DeterminantMethod;

use crate::error::{AlgebraError, Result};
use std::fmt;

/// Numeric element stored in a [`Matrix`].
///
/// Arithmetic goes through the `*_elem` methods. Integer elements saturate at
/// the `i32` bounds instead of overflowing; floats follow IEEE rules.
pub trait Element:
    Copy + PartialEq + PartialOrd + fmt::Debug + fmt::Display + Send + Sync
{
    fn zero() -> Self;
    fn one() -> Self;
    fn add_elem(self, rhs: Self) -> Self;
    fn sub_elem(self, rhs: Self) -> Self;
    fn mul_elem(self, rhs: Self) -> Self;
    /// Callers guarantee `rhs != zero()`.
    fn div_elem(self, rhs: Self) -> Self;
}

impl Element for f64 {
    #[inline]
    fn zero() -> Self {
        0.0
    }
    #[inline]
    fn one() -> Self {
        1.0
    }
    #[inline]
    fn add_elem(self, rhs: Self) -> Self {
        self + rhs
    }
    #[inline]
    fn sub_elem(self, rhs: Self) -> Self {
        self - rhs
    }
    #[inline]
    fn mul_elem(self, rhs: Self) -> Self {
        self * rhs
    }
    #[inline]
    fn div_elem(self, rhs: Self) -> Self {
        self / rhs
    }
}

impl Element for i32 {
    #[inline]
    fn zero() -> Self {
        0
    }
    #[inline]
    fn one() -> Self {
        1
    }
    #[inline]
    fn add_elem(self, rhs: Self) -> Self {
        self.saturating_add(rhs)
    }
    #[inline]
    fn sub_elem(self, rhs: Self) -> Self {
        self.saturating_sub(rhs)
    }
    #[inline]
    fn mul_elem(self, rhs: Self) -> Self {
        self.saturating_mul(rhs)
    }
    #[inline]
    fn div_elem(self, rhs: Self) -> Self {
        self.saturating_div(rhs)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Matrix<T: Element> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T: Element> Matrix<T> {
    /// Zero-initialized `rows × cols` matrix.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, T::zero())
    }

    /// Matrix with every element set to `value`.
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    /// Wrap row-major `data`; its length must be `rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(AlgebraError::DimensionMismatch {
                expected: format!("{} elements", rows * cols),
                actual: format!("{} elements", data.len()),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Build from nested rows. All rows must have the same length.
    pub fn from_rows(rows: &[Vec<T>]) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            if row.len() != cols {
                return Err(AlgebraError::DimensionMismatch {
                    expected: format!("{cols} columns"),
                    actual: format!("{} columns", row.len()),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    /// Square matrix with ones on the main diagonal.
    pub fn identity(order: usize) -> Self {
        let mut m = Self::new(order, order);
        for i in 0..order {
            m.data[i * order + i] = T::one();
        }
        m
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[inline]
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Row-major backing storage.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Borrow row `r`. Panics if `r >= rows`, like slice indexing.
    #[inline]
    pub fn row(&self, r: usize) -> &[T] {
        let start = r * self.cols;
        &self.data[start..start + self.cols]
    }

    /// Nested-row copy of the data.
    pub fn to_rows(&self) -> Vec<Vec<T>> {
        (0..self.rows).map(|r| self.row(r).to_vec()).collect()
    }

    fn check_index(&self, row: usize, col: usize) -> Result<usize> {
        if row >= self.rows || col >= self.cols {
            return Err(AlgebraError::IndexOutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(row * self.cols + col)
    }

    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        let idx = self.check_index(row, col)?;
        Ok(self.data[idx])
    }

    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        let idx = self.check_index(row, col)?;
        self.data[idx] = value;
        Ok(())
    }

    pub fn add_scalar(&mut self, value: T) {
        self.data.iter_mut().for_each(|v| *v = v.add_elem(value));
    }

    pub fn sub_scalar(&mut self, value: T) {
        self.data.iter_mut().for_each(|v| *v = v.sub_elem(value));
    }

    pub fn mul_scalar(&mut self, factor: T) {
        self.data.iter_mut().for_each(|v| *v = v.mul_elem(factor));
    }

    pub fn div_scalar(&mut self, factor: T) -> Result<()> {
        if factor == T::zero() {
            return Err(AlgebraError::DivisionByZero);
        }
        self.data.iter_mut().for_each(|v| *v = v.div_elem(factor));
        Ok(())
    }

    pub fn added_scalar(&self, value: T) -> Self {
        let mut copy = self.clone();
        copy.add_scalar(value);
        copy
    }

    pub fn subtracted_scalar(&self, value: T) -> Self {
        let mut copy = self.clone();
        copy.sub_scalar(value);
        copy
    }

    pub fn multiplied_scalar(&self, factor: T) -> Self {
        let mut copy = self.clone();
        copy.mul_scalar(factor);
        copy
    }

    pub fn divided_scalar(&self, factor: T) -> Result<Self> {
        let mut copy = self.clone();
        copy.div_scalar(factor)?;
        Ok(copy)
    }

    fn check_same_shape(&self, other: &Self) -> Result<()> {
        if self.shape() != other.shape() {
            return Err(AlgebraError::shape(self.shape(), other.shape()));
        }
        Ok(())
    }

    /// Element-wise `self += other`.
    pub fn add(&mut self, other: &Self) -> Result<()> {
        self.check_same_shape(other)?;
        for (a, &b) in self.data.iter_mut().zip(&other.data) {
            *a = a.add_elem(b);
        }
        Ok(())
    }

    /// Element-wise `self -= other`.
    pub fn sub(&mut self, other: &Self) -> Result<()> {
        self.check_same_shape(other)?;
        for (a, &b) in self.data.iter_mut().zip(&other.data) {
            *a = a.sub_elem(b);
        }
        Ok(())
    }

    pub fn added(&self, other: &Self) -> Result<Self> {
        let mut copy = self.clone();
        copy.add(other)?;
        Ok(copy)
    }

    pub fn subtracted(&self, other: &Self) -> Result<Self> {
        let mut copy = self.clone();
        copy.sub(other)?;
        Ok(copy)
    }

    /// Matrix product `self · rhs`; requires `self.cols == rhs.rows`.
    pub fn mul(&self, rhs: &Self) -> Result<Self> {
        if self.cols != rhs.rows {
            return Err(AlgebraError::DimensionMismatch {
                expected: format!("{} rows", self.cols),
                actual: format!("{}x{}", rhs.rows, rhs.cols),
            });
        }
        let mut out = Self::new(self.rows, rhs.cols);
        for r in 0..self.rows {
            let lhs_row = self.row(r);
            for c in 0..rhs.cols {
                let mut acc = T::zero();
                for (k, &a) in lhs_row.iter().enumerate() {
                    acc = acc.add_elem(a.mul_elem(rhs.data[k * rhs.cols + c]));
                }
                out.data[r * rhs.cols + c] = acc;
            }
        }
        Ok(out)
    }

    pub fn transpose(&self) -> Self {
        let mut out = Self::new(self.cols, self.rows);
        for r in 0..self.rows {
            for c in 0..self.cols {
                out.data[c * self.rows + r] = self.data[r * self.cols + c];
            }
        }
        out
    }

    /// Largest and smallest element, or `None` for an empty matrix.
    pub fn min_max(&self) -> Option<(T, T)> {
        let first = *self.data.first()?;
        Some(self.data.iter().skip(1).fold((first, first), |(lo, hi), &v| {
            (
                if v < lo { v } else { lo },
                if v > hi { v } else { hi },
            )
        }))
    }
}

impl Matrix<f64> {
    /// Truncating conversion to integers.
    pub fn to_int(&self) -> Matrix<i32> {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&v| v as i32).collect(),
        }
    }

    /// Same shape and every element within `tol`.
    pub fn approx_eq(&self, other: &Self, tol: f64) -> bool {
        self.shape() == other.shape()
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(a, b)| (a - b).abs() <= tol)
    }

    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }
}

impl Matrix<i32> {
    pub fn to_float(&self) -> Matrix<f64> {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&v| f64::from(v)).collect(),
        }
    }
}

impl<T: Element> fmt::Display for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.rows {
            for v in self.row(r) {
                write!(f, "{v} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(rows: &[&[f64]]) -> Matrix<f64> {
        Matrix::from_rows(&rows.iter().map(|r| r.to_vec()).collect::<Vec<_>>()).unwrap()
    }

    #[test]
    fn identity_matches_hand_built() {
        let expected = m(&[
            &[1.0, 0.0, 0.0, 0.0],
            &[0.0, 1.0, 0.0, 0.0],
            &[0.0, 0.0, 1.0, 0.0],
            &[0.0, 0.0, 0.0, 1.0],
        ]);
        assert_eq!(Matrix::<f64>::identity(4), expected);
    }

    #[test]
    fn integer_arithmetic_saturates() {
        let mut a = Matrix::from_vec(1, 3, vec![i32::MAX, i32::MIN, 5]).unwrap();
        a.add_scalar(1);
        assert_eq!(a.as_slice(), &[i32::MAX, i32::MIN + 1, 6]);
        a.mul_scalar(-2);
        assert_eq!(a.as_slice(), &[i32::MIN, i32::MAX, -12]);
        a.sub_scalar(i32::MAX);
        assert_eq!(a.as_slice(), &[i32::MIN, 0, i32::MIN]);
        a.div_scalar(-1).unwrap();
        assert_eq!(a.as_slice(), &[i32::MAX, 0, i32::MAX]);

        let big = Matrix::filled(2, 2, i32::MAX / 2);
        let product = big.mul(&big).unwrap();
        assert!(product.as_slice().iter().all(|&v| v == i32::MAX));
    }

    #[test]
    fn element_access_is_bounds_checked() {
        let mut a = Matrix::<i32>::new(2, 3);
        a.set(1, 2, 7).unwrap();
        assert_eq!(a.get(1, 2), Ok(7));
        assert!(matches!(
            a.get(2, 0),
            Err(AlgebraError::IndexOutOfBounds { row: 2, col: 0, .. })
        ));
        assert!(a.set(0, 3, 1).is_err());
    }

    #[test]
    fn from_vec_rejects_wrong_length() {
        assert!(matches!(
            Matrix::from_vec(2, 2, vec![1.0, 2.0, 3.0]),
            Err(AlgebraError::DimensionMismatch { .. })
        ));
        assert!(Matrix::<i32>::from_rows(&[vec![1, 2], vec![3]]).is_err());
    }

    #[test]
    fn copy_variants_leave_receiver_untouched() {
        let a = m(&[&[1.0, 2.0], &[3.0, 4.0]]);
        let b = a.multiplied_scalar(2.0);
        assert_eq!(a.get(1, 1), Ok(4.0));
        assert_eq!(b.get(1, 1), Ok(8.0));

        let mut c = a.clone();
        c.set(0, 0, 99.0).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn scalar_division_by_zero_fails() {
        let mut a = m(&[&[1.0]]);
        assert_eq!(a.div_scalar(0.0), Err(AlgebraError::DivisionByZero));
        let b = Matrix::<i32>::filled(2, 2, 4);
        assert_eq!(b.divided_scalar(0), Err(AlgebraError::DivisionByZero));
        assert_eq!(b.divided_scalar(2).unwrap().as_slice(), &[2, 2, 2, 2]);
    }

    #[test]
    fn elementwise_add_requires_same_shape() {
        let mut a = Matrix::<f64>::filled(2, 2, 1.0);
        let b = Matrix::<f64>::filled(2, 3, 1.0);
        assert!(matches!(
            a.add(&b),
            Err(AlgebraError::DimensionMismatch { .. })
        ));
        let c = a.added(&a).unwrap();
        assert_eq!(c.as_slice(), &[2.0; 4]);
        assert_eq!(c.subtracted(&a).unwrap(), a);
    }

    #[test]
    fn product_shapes_and_values() {
        let a = m(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]);
        let b = m(&[&[7.0, 8.0], &[9.0, 10.0], &[11.0, 12.0]]);
        let ab = a.mul(&b).unwrap();
        assert_eq!(ab, m(&[&[58.0, 64.0], &[139.0, 154.0]]));
        assert!(a.mul(&a).is_err());
    }

    #[test]
    fn product_is_associative_and_identity_neutral() {
        let a = m(&[&[1.5, -2.0, 0.5], &[3.0, 0.25, -1.0]]);
        let b = m(&[&[2.0, 1.0], &[-0.5, 4.0], &[1.0, 1.0]]);
        let c = m(&[&[0.3, -1.2, 2.0], &[1.1, 0.0, -0.7]]);
        let left = a.mul(&b).unwrap().mul(&c).unwrap();
        let right = a.mul(&b.mul(&c).unwrap()).unwrap();
        assert!(left.approx_eq(&right, 1e-12));
        assert_eq!(a.mul(&Matrix::identity(3)).unwrap(), a);
    }

    #[test]
    fn transpose_twice_is_identity() {
        let a = m(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]);
        let t = a.transpose();
        assert_eq!(t.shape(), (3, 2));
        assert_eq!(t.get(2, 1), Ok(6.0));
        assert_eq!(t.transpose(), a);
    }

    #[test]
    fn display_prints_rows() {
        let a = Matrix::from_vec(2, 2, vec![1, 2, 3, 4]).unwrap();
        assert_eq!(a.to_string(), "1 2 \n3 4 \n");
    }
}
