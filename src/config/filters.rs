use crate::channel::ThresholdMode;
use crate::image::ColorMode;
use crate::mask;
use crate::matrix::Matrix;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct FiltersDemoConfig {
    pub input: PathBuf,
    #[serde(default)]
    pub mode: ColorMode,
    /// Applied in order to every channel.
    #[serde(default)]
    pub filters: Vec<FilterKind>,
    /// Stretch every channel to 0–255 after the last filter.
    #[serde(default = "default_normalize")]
    pub normalize: bool,
    #[serde(default)]
    pub histogram: HistogramChartConfig,
    pub output: FiltersOutputConfig,
}

fn default_normalize() -> bool {
    true
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterKind {
    Average {
        size: usize,
    },
    Gaussian {
        size: usize,
        sigma: f64,
    },
    HighBoost {
        size: usize,
        a: i32,
    },
    /// Sobel gradient magnitude.
    Sobel,
    /// Smoothed, thinned Sobel magnitude.
    Edges,
    /// Binary threshold at the Otsu level.
    Otsu {
        #[serde(default = "default_max")]
        max: i32,
    },
    Threshold {
        threshold: i32,
        #[serde(default = "default_max")]
        max: i32,
        #[serde(default)]
        mode: ThresholdMode,
    },
}

fn default_max() -> i32 {
    255
}

impl FilterKind {
    /// Convolution kernel for the mask-based filters, `None` otherwise.
    pub fn kernel(&self) -> Option<crate::error::Result<Matrix<f64>>> {
        match *self {
            FilterKind::Average { size } => Some(mask::average(size)),
            FilterKind::Gaussian { size, sigma } => Some(mask::gaussian(size, sigma)),
            FilterKind::HighBoost { size, a } => Some(mask::high_boost(size, a)),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HistogramChartConfig {
    pub min: i32,
    pub max: i32,
    pub width: usize,
    pub height: usize,
}

impl Default for HistogramChartConfig {
    fn default() -> Self {
        Self {
            min: 0,
            max: 255,
            width: 256,
            height: 256,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct FiltersOutputConfig {
    pub image: PathBuf,
    #[serde(default)]
    pub histogram_json: Option<PathBuf>,
    #[serde(default)]
    pub histogram_image: Option<PathBuf>,
}

pub fn load_config(path: &Path) -> Result<FiltersDemoConfig, String> {
    super::read_json(path)
}
