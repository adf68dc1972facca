//! Neighborhood windows and quantized kernel convolution.
//!
//! - `center_square` extracts a zero-padded `size × size` window around a
//!   pixel, transposed so that element `(i, j)` is column offset `i`, row
//!   offset `j`.
//! - `apply_mask` quantizes the kernel once and accumulates integer dot
//!   products in `i64`; the sum is divided by the kernel scale and truncated.
//!
//! Complexity: O(W·H·k²) per pass; rows are filled independently.
use super::{fill_rows, Channel};
use crate::error::{AlgebraError, Result};
use crate::matrix::Matrix;
use log::debug;

/// Top-left offset of a window of `size`; even sizes bias the center
/// down/right by one.
#[inline]
pub(crate) fn window_offset(size: usize) -> isize {
    if size % 2 == 0 {
        (size / 2) as isize - 1
    } else {
        (size / 2) as isize
    }
}

impl Channel {
    /// Transposed `size × size` neighborhood of column `x`, row `y`.
    /// Cells outside the channel are 0.
    pub fn center_square(&self, x: usize, y: usize, size: usize) -> Matrix<i32> {
        let offset = window_offset(size);
        let x0 = x as isize - offset;
        let y0 = y as isize - offset;
        let mut data = Vec::with_capacity(size * size);
        for i in 0..size as isize {
            for j in 0..size as isize {
                data.push(self.sample(x0 + i, y0 + j).unwrap_or(0));
            }
        }
        // Length is size² by construction.
        Matrix::from_vec(size, size, data).unwrap_or_else(|_| Matrix::new(size, size))
    }

    /// Convolve with a square kernel in place.
    pub fn apply_mask(&mut self, kernel: &Matrix<f64>) -> Result<()> {
        if !kernel.is_square() {
            return Err(AlgebraError::shape(
                (kernel.rows(), kernel.rows()),
                kernel.shape(),
            ));
        }
        let quantized = kernel.quantize()?;
        let size = kernel.rows();
        debug!(
            "apply_mask: {}x{} kernel, scale factor {:.3}, channel {}x{}",
            size,
            size,
            quantized.scale_factor(),
            self.width(),
            self.height()
        );

        let weights = quantized.values().as_slice();
        let offset = window_offset(size);
        let source = &*self;
        let values = fill_rows(self.width(), self.height(), |y, row| {
            let y0 = y as isize - offset;
            for (x, out) in row.iter_mut().enumerate() {
                let x0 = x as isize - offset;
                let mut acc: i64 = 0;
                // weights[i * size + j] pairs with window (i, j) = sample(x0 + i, y0 + j).
                for i in 0..size {
                    let wrow = &weights[i * size..(i + 1) * size];
                    for (j, &w) in wrow.iter().enumerate() {
                        if w == 0 {
                            continue;
                        }
                        if let Some(v) = source.sample(x0 + i as isize, y0 + j as isize) {
                            acc += i64::from(w) * i64::from(v);
                        }
                    }
                }
                *out = quantized.rescale(acc) as i32;
            }
        });
        self.replace_samples(values);
        Ok(())
    }
}
