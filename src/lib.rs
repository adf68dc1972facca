#![doc = include_str!("../README.md")]

// Numeric core
pub mod error;
pub mod mask;
pub mod matrix;

// Pixel layers
pub mod channel;
pub mod color;
pub mod histogram;
pub mod image;

// Tool configuration
pub mod config;

// --- High-level re-exports -------------------------------------------------

pub use crate::channel::{Channel, ChannelKind, ThresholdMode};
pub use crate::error::{AlgebraError, Result};
pub use crate::histogram::Histogram;
pub use crate::image::{ColorMode, Image};
pub use crate::matrix::{DeterminantMethod, Matrix, QuantizedMatrix};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```
/// use pixel_algebra::prelude::*;
///
/// # fn main() -> pixel_algebra::Result<()> {
/// let values = (1..=9).collect();
/// let mut channel = Channel::from_values(3, 3, values, ChannelKind::Gray)?;
/// channel.apply_mask(&mask::sobel_horizontal())?;
/// assert_eq!(channel.get(1, 1)?, -24);
///
/// let mut image = Image::from_channel(channel);
/// image.translate(1.0, 0.0);
/// image.apply_transform()?;
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::channel::{Channel, ChannelKind, ThresholdMode};
    pub use crate::error::{AlgebraError, Result};
    pub use crate::histogram::Histogram;
    pub use crate::image::{ColorMode, Image};
    pub use crate::mask;
    pub use crate::matrix::{DeterminantMethod, Matrix};
}
