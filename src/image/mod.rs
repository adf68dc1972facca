//! Multi-channel images with a pending affine transform list.
//!
//! An `Image` owns one `Channel` per component of its `ColorMode`, all with
//! the image's dimensions. Geometric operations are queued with
//! `add_transform` / `translate` / `rotate` / `scale` and resolved in one
//! resampling pass by `apply_transform`, which composes them so that the
//! first-added transform is applied first.
//!
//! Pixel operators (`apply_mask`, `normalize`, `apply_threshold`) run on every
//! channel. Fallible operators work on copies and commit only when all
//! channels succeed.

pub mod io;

use crate::channel::{Channel, ChannelKind, ThresholdMode};
use crate::color;
use crate::error::{AlgebraError, Result};
use crate::matrix::Matrix;
use log::debug;
use serde::{Deserialize, Serialize};

/// Color model of an image's channels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Grayscale,
    Rgb,
    Hsv,
}

impl ColorMode {
    /// Channel kinds in storage order.
    pub fn kinds(self) -> &'static [ChannelKind] {
        match self {
            ColorMode::Grayscale => &[ChannelKind::Gray],
            ColorMode::Rgb => &[ChannelKind::Red, ChannelKind::Green, ChannelKind::Blue],
            ColorMode::Hsv => &[
                ChannelKind::Hue,
                ChannelKind::Saturation,
                ChannelKind::Value,
            ],
        }
    }

    #[inline]
    pub fn channel_count(self) -> usize {
        self.kinds().len()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    width: usize,
    height: usize,
    mode: ColorMode,
    channels: Vec<Channel>,
    transforms: Vec<Matrix<f64>>,
}

impl Image {
    /// Split interleaved ARGB pixels into the channels of `mode`.
    pub fn from_interleaved(
        width: usize,
        height: usize,
        pixels: &[u32],
        mode: ColorMode,
    ) -> Result<Self> {
        let channels = if mode == ColorMode::Hsv {
            // Convert each pixel once and split the triple.
            let hsv: Vec<_> = pixels
                .iter()
                .map(|&p| {
                    let (r, g, b) = color::unpack_rgb(p);
                    color::rgb_to_hsv(r, g, b)
                })
                .collect();
            split3(&hsv)
                .into_iter()
                .zip(mode.kinds())
                .map(|(values, &kind)| Channel::from_values(width, height, values, kind))
                .collect::<Result<Vec<_>>>()?
        } else {
            mode.kinds()
                .iter()
                .map(|&kind| Channel::from_interleaved(width, height, pixels, kind))
                .collect::<Result<Vec<_>>>()?
        };
        Ok(Self::assemble(width, height, mode, channels))
    }

    /// Adopt existing planes; their kinds (and scale factors) are retagged to
    /// match `mode`.
    pub fn from_planes(
        width: usize,
        height: usize,
        mode: ColorMode,
        mut channels: Vec<Channel>,
    ) -> Result<Self> {
        if channels.len() != mode.channel_count() {
            return Err(AlgebraError::DimensionMismatch {
                expected: format!("{} channels for {mode:?}", mode.channel_count()),
                actual: format!("{} channels", channels.len()),
            });
        }
        for (channel, &kind) in channels.iter_mut().zip(mode.kinds()) {
            if (channel.width(), channel.height()) != (width, height) {
                return Err(AlgebraError::shape(
                    (width, height),
                    (channel.width(), channel.height()),
                ));
            }
            channel.set_kind(kind);
        }
        Ok(Self::assemble(width, height, mode, channels))
    }

    /// Single-channel grayscale image.
    pub fn from_channel(mut channel: Channel) -> Self {
        channel.set_kind(ChannelKind::Gray);
        Self::assemble(
            channel.width(),
            channel.height(),
            ColorMode::Grayscale,
            vec![channel],
        )
    }

    fn assemble(width: usize, height: usize, mode: ColorMode, channels: Vec<Channel>) -> Self {
        Self {
            width,
            height,
            mode,
            channels,
            transforms: Vec::new(),
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn mode(&self) -> ColorMode {
        self.mode
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn channel(&self, index: usize) -> Option<&Channel> {
        self.channels.get(index)
    }

    pub fn channel_mut(&mut self, index: usize) -> Option<&mut Channel> {
        self.channels.get_mut(index)
    }

    pub fn into_channels(self) -> Vec<Channel> {
        self.channels
    }

    /// Transforms queued since the last successful `apply_transform`.
    pub fn pending_transforms(&self) -> &[Matrix<f64>] {
        &self.transforms
    }

    /// Queue a 3×3 homogeneous transform.
    pub fn add_transform(&mut self, transform: Matrix<f64>) -> Result<()> {
        if transform.shape() != (3, 3) {
            return Err(AlgebraError::shape((3, 3), transform.shape()));
        }
        self.transforms.push(transform);
        Ok(())
    }

    /// Queue a shift by `tx` columns and `ty` rows.
    pub fn translate(&mut self, tx: f64, ty: f64) {
        self.transforms.push(affine([1.0, 0.0, tx, 0.0, 1.0, ty]));
    }

    /// Queue a rotation by `degrees` about the origin (top-left corner).
    pub fn rotate(&mut self, degrees: f64) {
        let (sin, cos) = degrees.to_radians().sin_cos();
        self.transforms.push(affine([cos, -sin, 0.0, sin, cos, 0.0]));
    }

    /// Queue an axis-aligned scale about the origin.
    pub fn scale(&mut self, sx: f64, sy: f64) {
        self.transforms.push(affine([sx, 0.0, 0.0, 0.0, sy, 0.0]));
    }

    /// `M_n · … · M_1` over the pending list; identity when it is empty.
    pub fn composed_transform(&self) -> Result<Matrix<f64>> {
        self.transforms
            .iter()
            .try_fold(Matrix::identity(3), |acc, m| m.mul(&acc))
    }

    /// Resample every channel through the composed pending transforms and
    /// clear the list. On error nothing changes.
    pub fn apply_transform(&mut self) -> Result<()> {
        if self.transforms.is_empty() {
            return Ok(());
        }
        let composed = self.composed_transform()?;
        debug!(
            "apply_transform: {} pending transforms composed into\n{}",
            self.transforms.len(),
            composed
        );
        self.commit(|channel| channel.apply_transform(&composed))?;
        self.transforms.clear();
        Ok(())
    }

    /// Convolve every channel with `kernel`.
    pub fn apply_mask(&mut self, kernel: &Matrix<f64>) -> Result<()> {
        self.commit(|channel| channel.apply_mask(kernel))
    }

    pub fn normalize(&mut self) {
        self.channels.iter_mut().for_each(Channel::normalize);
    }

    /// Threshold every channel; returns the threshold used for each.
    pub fn apply_threshold(&mut self, threshold: i32, max: i32, mode: ThresholdMode) -> Vec<i32> {
        self.channels
            .iter_mut()
            .map(|channel| channel.apply_threshold(threshold, max, mode))
            .collect()
    }

    fn commit<F>(&mut self, op: F) -> Result<()>
    where
        F: Fn(&mut Channel) -> Result<()>,
    {
        let mut updated = self.channels.clone();
        for channel in &mut updated {
            op(channel)?;
        }
        self.channels = updated;
        Ok(())
    }

    /// Convert the channels to `target`. Grayscale ↔ HSV goes through RGB.
    pub fn change_color_space(&mut self, target: ColorMode) {
        if self.mode == target {
            return;
        }
        debug!("change_color_space: {:?} -> {:?}", self.mode, target);
        let planes: Vec<Vec<i32>> = match (self.mode, target) {
            (ColorMode::Rgb, ColorMode::Grayscale) => vec![self.map_pixels(color::luma)],
            (ColorMode::Hsv, ColorMode::Grayscale) => {
                vec![self.map_pixels(|h, s, v| {
                    let (r, g, b) = color::hsv_to_rgb(h, s, v);
                    color::luma(r, g, b)
                })]
            }
            (ColorMode::Grayscale, ColorMode::Rgb) => {
                let gray = self.channels[0].to_vec();
                vec![gray.clone(), gray.clone(), gray]
            }
            (ColorMode::Grayscale, ColorMode::Hsv) => {
                let gray = self.channels[0].to_vec();
                let hsv: Vec<_> = gray.iter().map(|&v| color::rgb_to_hsv(v, v, v)).collect();
                split3(&hsv)
            }
            (ColorMode::Rgb, ColorMode::Hsv) => {
                split3(&self.zip_pixels(color::rgb_to_hsv))
            }
            (ColorMode::Hsv, ColorMode::Rgb) => {
                split3(&self.zip_pixels(color::hsv_to_rgb))
            }
            _ => return,
        };

        let (width, height) = (self.width, self.height);
        self.channels = planes
            .into_iter()
            .zip(target.kinds())
            .map(|(values, &kind)| {
                // Every plane holds width × height samples.
                Channel::from_values(width, height, values, kind)
                    .unwrap_or_else(|_| Channel::new(width, height, kind))
            })
            .collect();
        self.mode = target;
    }

    fn zip_pixels<F>(&self, f: F) -> Vec<(i32, i32, i32)>
    where
        F: Fn(i32, i32, i32) -> (i32, i32, i32),
    {
        let [a, b, c] = [0, 1, 2].map(|i| self.channels[i].as_slice());
        a.iter()
            .zip(b)
            .zip(c)
            .map(|((&x, &y), &z)| f(x, y, z))
            .collect()
    }

    fn map_pixels<F>(&self, f: F) -> Vec<i32>
    where
        F: Fn(i32, i32, i32) -> i32,
    {
        let [a, b, c] = [0, 1, 2].map(|i| self.channels[i].as_slice());
        a.iter()
            .zip(b)
            .zip(c)
            .map(|((&x, &y), &z)| f(x, y, z))
            .collect()
    }

    /// Opaque ARGB pixels; HSV images are converted to RGB first. Samples
    /// are clamped to 0–255.
    pub fn to_interleaved(&self) -> Vec<u32> {
        match self.mode {
            ColorMode::Grayscale => self.channels[0].to_interleaved(false),
            ColorMode::Rgb => self
                .zip_pixels(|r, g, b| (r, g, b))
                .into_iter()
                .map(|(r, g, b)| color::pack_rgb(r, g, b))
                .collect(),
            ColorMode::Hsv => self
                .zip_pixels(color::hsv_to_rgb)
                .into_iter()
                .map(|(r, g, b)| color::pack_rgb(r, g, b))
                .collect(),
        }
    }

    /// Channel planes concatenated in storage order.
    pub fn to_planar(&self) -> Vec<i32> {
        self.channels
            .iter()
            .flat_map(|c| c.as_slice().iter().copied())
            .collect()
    }
}

fn affine(top: [f64; 6]) -> Matrix<f64> {
    let mut m = Matrix::identity(3);
    m.as_mut_slice()[..6].copy_from_slice(&top);
    m
}

fn split3(pixels: &[(i32, i32, i32)]) -> Vec<Vec<i32>> {
    vec![
        pixels.iter().map(|p| p.0).collect(),
        pixels.iter().map(|p| p.1).collect(),
        pixels.iter().map(|p| p.2).collect(),
    ]
}
