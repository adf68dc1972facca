//! Convolution kernel factory.
//!
//! Kernels are square `Matrix<f64>` values consumed by
//! [`Channel::apply_mask`](crate::channel::Channel::apply_mask). Element
//! `(i, j)` weights the sample at column offset `i` and row offset `j` from the
//! window origin, because the neighborhood window is transposed before the dot
//! product.
//!
//! Smoothing kernels (average, Gaussian, high-boost) sum to 1. The Sobel pair
//! is left unnormalized since it measures a signed gradient.
use crate::error::{AlgebraError, Result};
use crate::matrix::Matrix;

fn require_size(size: usize) -> Result<()> {
    if size == 0 {
        return Err(AlgebraError::DimensionMismatch {
            expected: "kernel size >= 1".to_string(),
            actual: "0".to_string(),
        });
    }
    Ok(())
}

/// Box filter: every coefficient is `1 / size²`.
pub fn average(size: usize) -> Result<Matrix<f64>> {
    require_size(size)?;
    Ok(Matrix::filled(size, size, 1.0 / (size * size) as f64))
}

/// Sampled 2-D Gaussian centered on `⌊size/2⌋`.
pub fn gaussian(size: usize, sigma: f64) -> Result<Matrix<f64>> {
    require_size(size)?;
    if sigma == 0.0 {
        return Err(AlgebraError::DivisionByZero);
    }
    let norm = 1.0 / (2.0 * std::f64::consts::PI * sigma * sigma);
    let center = (size / 2) as f64;
    let mut data = Vec::with_capacity(size * size);
    for i in 0..size {
        for j in 0..size {
            let di = i as f64 - center;
            let dj = j as f64 - center;
            let expo = -0.5 * (di * di + dj * dj) / (sigma * sigma);
            data.push(norm * expo.exp());
        }
    }
    Matrix::from_vec(size, size, data)
}

/// High-boost sharpening: `-1` everywhere, `size² + a - 1` at the center,
/// rescaled so the coefficients sum to 1. `a == 0` leaves nothing to rescale by.
pub fn high_boost(size: usize, a: i32) -> Result<Matrix<f64>> {
    require_size(size)?;
    let mut mask = Matrix::filled(size, size, -1.0);
    let c = size / 2;
    mask.set(c, c, (size * size) as f64 + f64::from(a) - 1.0)?;
    let sum = mask.sum();
    if sum == 0.0 {
        return Err(AlgebraError::DivisionByZero);
    }
    mask.div_scalar(sum)?;
    Ok(mask)
}

/// Responds to horizontal edges: upper row minus lower row.
pub fn sobel_horizontal() -> Matrix<f64> {
    fixed3([[1.0, 0.0, -1.0], [2.0, 0.0, -2.0], [1.0, 0.0, -1.0]])
}

/// Responds to vertical edges: left column minus right column.
pub fn sobel_vertical() -> Matrix<f64> {
    fixed3([[1.0, 2.0, 1.0], [0.0, 0.0, 0.0], [-1.0, -2.0, -1.0]])
}

fn fixed3(k: [[f64; 3]; 3]) -> Matrix<f64> {
    let mut m = Matrix::new(3, 3);
    m.as_mut_slice()
        .iter_mut()
        .zip(k.iter().flatten())
        .for_each(|(dst, &v)| *dst = v);
    m
}
