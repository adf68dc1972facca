//! Single-plane integer pixel grids.
//!
//! A `Channel` is a `Matrix<i32>` with `rows = height` and `cols = width`,
//! tagged with the color component it carries. Samples are nominally 0–255 but
//! intermediate results (signed gradients, high-boost output) are kept as-is;
//! `normalize()` brings them back into range.
//!
//! Coordinates are `(x, y)` = (column, row) throughout. Operators that mutate
//! take `&mut self` and replace the buffer only after the whole output has been
//! computed from the untouched input; `Clone` is the way to keep an original.
//!
//! Submodules hold the heavier operators:
//! - `convolve`: neighborhood windows and kernel convolution.
//! - `transform`: inverse-mapping affine resampling.
//! - `threshold`: fixed and Otsu thresholds.
//! - `gradient`: Sobel magnitude and orientation, edge thinning.

pub mod convolve;
pub mod gradient;
pub mod threshold;
pub mod transform;

pub use gradient::{gradient_angle, UNDEFINED_ANGLE};
pub use threshold::ThresholdMode;
pub use transform::TRANSFORM_FILL;

use crate::color::{self, luma, unpack_alpha, unpack_rgb};
use crate::error::{AlgebraError, Result};
use crate::histogram::Histogram;
use crate::matrix::Matrix;
use log::warn;
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Color component carried by a channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    Gray,
    Red,
    Green,
    Blue,
    Alpha,
    Hue,
    Saturation,
    Value,
}

impl ChannelKind {
    /// Scale factor of samples extracted for this kind.
    pub fn default_scale(self) -> f64 {
        match self {
            ChannelKind::Hue => color::HUE_SCALE,
            ChannelKind::Saturation => color::SATURATION_SCALE,
            _ => 1.0,
        }
    }

    /// Sample written by `apply_transform` where the source is not covered:
    /// white in every color model (zero hue and saturation, full intensity).
    pub fn transform_fill(self) -> i32 {
        match self {
            ChannelKind::Hue | ChannelKind::Saturation => 0,
            _ => TRANSFORM_FILL,
        }
    }

    fn extract(self, pixel: u32) -> i32 {
        let (r, g, b) = unpack_rgb(pixel);
        match self {
            ChannelKind::Gray => luma(r, g, b),
            ChannelKind::Red => r,
            ChannelKind::Green => g,
            ChannelKind::Blue => b,
            ChannelKind::Alpha => unpack_alpha(pixel),
            ChannelKind::Hue => color::rgb_to_hsv(r, g, b).0,
            ChannelKind::Saturation => color::rgb_to_hsv(r, g, b).1,
            ChannelKind::Value => color::rgb_to_hsv(r, g, b).2,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Channel {
    samples: Matrix<i32>,
    kind: ChannelKind,
    /// `real ≈ sample / scale_factor`; 1.0 for plain 8-bit planes.
    scale_factor: f64,
}

impl Channel {
    /// Zero-filled `width × height` channel.
    pub fn new(width: usize, height: usize, kind: ChannelKind) -> Self {
        Self::from_matrix(Matrix::new(height, width), kind)
    }

    pub fn filled(width: usize, height: usize, value: i32, kind: ChannelKind) -> Self {
        Self::from_matrix(Matrix::filled(height, width, value), kind)
    }

    /// Row-major samples; `values.len()` must be `width * height`.
    pub fn from_values(
        width: usize,
        height: usize,
        values: Vec<i32>,
        kind: ChannelKind,
    ) -> Result<Self> {
        Ok(Self::from_matrix(
            Matrix::from_vec(height, width, values)?,
            kind,
        ))
    }

    /// Take ownership of a matrix laid out as `height × width`.
    pub fn from_matrix(samples: Matrix<i32>, kind: ChannelKind) -> Self {
        Self {
            samples,
            kind,
            scale_factor: kind.default_scale(),
        }
    }

    /// Extract one component from interleaved ARGB pixels.
    pub fn from_interleaved(
        width: usize,
        height: usize,
        pixels: &[u32],
        kind: ChannelKind,
    ) -> Result<Self> {
        if pixels.len() != width * height {
            return Err(AlgebraError::DimensionMismatch {
                expected: format!("{} pixels", width * height),
                actual: format!("{} pixels", pixels.len()),
            });
        }
        let values = pixels.iter().map(|&p| kind.extract(p)).collect();
        Self::from_values(width, height, values, kind)
    }

    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.samples.cols()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.samples.rows()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.samples.as_slice().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn kind(&self) -> ChannelKind {
        self.kind
    }

    /// Retag the channel; the scale factor follows the new kind.
    pub fn set_kind(&mut self, kind: ChannelKind) {
        self.kind = kind;
        self.scale_factor = kind.default_scale();
    }

    #[inline]
    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    #[inline]
    pub fn samples(&self) -> &Matrix<i32> {
        &self.samples
    }

    #[inline]
    pub fn as_slice(&self) -> &[i32] {
        self.samples.as_slice()
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [i32] {
        self.samples.as_mut_slice()
    }

    pub fn to_vec(&self) -> Vec<i32> {
        self.as_slice().to_vec()
    }

    pub fn into_matrix(self) -> Matrix<i32> {
        self.samples
    }

    /// Sample at column `x`, row `y`.
    pub fn get(&self, x: usize, y: usize) -> Result<i32> {
        self.samples.get(y, x)
    }

    pub fn set(&mut self, x: usize, y: usize, value: i32) -> Result<()> {
        self.samples.set(y, x, value)
    }

    /// Sample at signed coordinates, `None` outside the grid.
    #[inline]
    pub(crate) fn sample(&self, x: isize, y: isize) -> Option<i32> {
        if x < 0 || y < 0 || x as usize >= self.width() || y as usize >= self.height() {
            return None;
        }
        Some(self.as_slice()[y as usize * self.width() + x as usize])
    }

    pub fn min_max(&self) -> Option<(i32, i32)> {
        self.samples.min_max()
    }

    pub(crate) fn ensure_same_shape(&self, other: &Channel) -> Result<()> {
        if self.samples.shape() != other.samples.shape() {
            return Err(AlgebraError::shape(
                (other.width(), other.height()),
                (self.width(), self.height()),
            ));
        }
        Ok(())
    }

    pub(crate) fn replace_samples(&mut self, values: Vec<i32>) {
        debug_assert_eq!(values.len(), self.len());
        self.samples
            .as_mut_slice()
            .iter_mut()
            .zip(values)
            .for_each(|(dst, v)| *dst = v);
    }

    /// Linear stretch of `[min, max]` onto `[0, 255]`, truncating.
    ///
    /// Computed in integers so that a channel already spanning exactly
    /// `[0, 255]` is left unchanged. A flat channel maps to all zeros.
    pub fn normalize(&mut self) {
        let Some((min, max)) = self.min_max() else {
            return;
        };
        if max == min {
            warn!("normalize: flat channel (value {min}), mapping to 0");
            self.as_mut_slice().iter_mut().for_each(|v| *v = 0);
            return;
        }
        let range = i64::from(max) - i64::from(min);
        for v in self.as_mut_slice() {
            *v = ((i64::from(*v) - i64::from(min)) * 255 / range) as i32;
        }
    }

    /// In-place Euclidean magnitude `trunc(sqrt(a² + b²))` with `other`.
    pub fn module(&mut self, other: &Channel) -> Result<()> {
        self.ensure_same_shape(other)?;
        for (a, &b) in self.as_mut_slice().iter_mut().zip(other.as_slice()) {
            let sq = i64::from(*a) * i64::from(*a) + i64::from(b) * i64::from(b);
            *a = (sq as f64).sqrt() as i32;
        }
        Ok(())
    }

    /// Occurrence count of every sample value.
    pub fn values_histogram(&self) -> Histogram {
        Histogram::from_channel(self)
    }

    /// Gray ARGB pixels, optionally stretched first. Samples are clamped.
    pub fn to_interleaved(&self, normalize: bool) -> Vec<u32> {
        let pack = |v: i32| color::pack_rgb(v, v, v);
        if normalize {
            let mut copy = self.clone();
            copy.normalize();
            copy.as_slice().iter().map(|&v| pack(v)).collect()
        } else {
            self.as_slice().iter().map(|&v| pack(v)).collect()
        }
    }
}

/// Fill a `width × height` buffer row by row; `kernel(y, row)` writes row `y`.
/// Rows are independent, so with `parallel` they are processed by rayon.
pub(crate) fn fill_rows<F>(width: usize, height: usize, kernel: F) -> Vec<i32>
where
    F: Fn(usize, &mut [i32]) + Send + Sync,
{
    let mut out = vec![0i32; width * height];
    if width == 0 {
        return out;
    }

    #[cfg(feature = "parallel")]
    out.par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| kernel(y, row));

    #[cfg(not(feature = "parallel"))]
    out.chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| kernel(y, row));

    out
}
