//! Sobel gradients, orientation and non-maximum suppression.
//!
//! Responses come from convolving copies of a channel with
//! [`mask::sobel_horizontal`] (horizontal edges, upper minus lower rows) and
//! [`mask::sobel_vertical`] (vertical edges, left minus right columns).
//! Orientation is folded into `[0, 180)` degrees; a zero vertical response
//! leaves the slope undefined.
use super::Channel;
use crate::error::Result;
use crate::histogram::Histogram;
use crate::mask;
use log::debug;

/// Histogram key collecting pixels whose orientation is undefined.
pub const UNDEFINED_ANGLE: i32 = -1;

/// Orientation assumed for undefined slopes during edge thinning.
const UNDEFINED_AS_DEGREES: i32 = 90;

const EDGE_SMOOTHING_SIZE: usize = 5;
const EDGE_SMOOTHING_SIGMA: f64 = 1.4;

/// Whole-degree gradient orientation in `[0, 180)`, or `None` when
/// `vertical == 0`.
pub fn gradient_angle(horizontal: i32, vertical: i32) -> Option<i32> {
    if vertical == 0 {
        return None;
    }
    let degrees = (f64::from(horizontal) / f64::from(vertical))
        .atan()
        .to_degrees() as i32;
    Some(if degrees < 0 {
        180 + degrees
    } else {
        degrees % 180
    })
}

impl Channel {
    /// Horizontal and vertical Sobel responses, computed on copies.
    pub fn sobel_responses(&self) -> Result<(Channel, Channel)> {
        let mut horizontal = self.clone();
        horizontal.apply_mask(&mask::sobel_horizontal())?;
        let mut vertical = self.clone();
        vertical.apply_mask(&mask::sobel_vertical())?;
        Ok((horizontal, vertical))
    }

    /// Euclidean magnitude of both Sobel responses.
    pub fn sobel_magnitude(&self) -> Result<Channel> {
        let (mut magnitude, vertical) = self.sobel_responses()?;
        magnitude.module(&vertical)?;
        Ok(magnitude)
    }

    /// Count of pixels per orientation; undefined slopes land under
    /// [`UNDEFINED_ANGLE`].
    pub fn gradient_histogram(&self) -> Result<Histogram> {
        let (horizontal, vertical) = self.sobel_responses()?;
        let mut histogram = Histogram::new();
        for (&h, &v) in horizontal.as_slice().iter().zip(vertical.as_slice()) {
            histogram.increment(gradient_angle(h, v).unwrap_or(UNDEFINED_ANGLE));
        }
        Ok(histogram)
    }

    /// Gaussian-smoothed Sobel magnitude thinned by non-maximum suppression.
    ///
    /// Each pixel is compared with its two neighbors along the orientation
    /// bucket, addressed as flat offsets into the row-major buffer:
    /// `[0,45)` ±1, `[45,90)` ±(w+1), `[90,135)` ±w, `[135,180)` ±(w−1).
    /// Neighbors outside the buffer read as 0. A pixel smaller than either
    /// neighbor is cleared.
    pub fn edge_detect(&self) -> Result<Channel> {
        let mut smoothed = self.clone();
        smoothed.apply_mask(&mask::gaussian(
            EDGE_SMOOTHING_SIZE,
            EDGE_SMOOTHING_SIGMA,
        )?)?;
        let (horizontal, vertical) = smoothed.sobel_responses()?;
        let mut magnitude = horizontal.clone();
        magnitude.module(&vertical)?;

        let w = self.width() as isize;
        let mag = magnitude.as_slice();
        let len = mag.len() as isize;
        let at = |i: isize| if (0..len).contains(&i) { mag[i as usize] } else { 0 };

        let mut suppressed = 0usize;
        let thinned: Vec<i32> = (0..len)
            .map(|i| {
                let k = i as usize;
                let angle = gradient_angle(horizontal.as_slice()[k], vertical.as_slice()[k])
                    .unwrap_or(UNDEFINED_AS_DEGREES);
                let offset = match angle {
                    a if a < 45 => 1,
                    a if a < 90 => w + 1,
                    a if a < 135 => w,
                    _ => w - 1,
                };
                let value = mag[k];
                if value < at(i - offset) || value < at(i + offset) {
                    suppressed += 1;
                    0
                } else {
                    value
                }
            })
            .collect();
        debug!(
            "edge_detect: {}x{}, suppressed {suppressed} of {len} pixels",
            self.width(),
            self.height()
        );

        magnitude.replace_samples(thinned);
        Ok(magnitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::ChannelKind;

    #[test]
    fn angles_fold_into_half_turn() {
        assert_eq!(gradient_angle(0, 5), Some(0));
        assert_eq!(gradient_angle(5, 5), Some(45));
        assert_eq!(gradient_angle(-5, 5), Some(135));
        assert_eq!(gradient_angle(1, -1), Some(135));
        assert_eq!(gradient_angle(3, 0), None);
        assert_eq!(gradient_angle(0, -4), Some(0));
    }

    #[test]
    fn flat_channel_has_only_undefined_orientation() {
        let c = Channel::filled(4, 4, 0, ChannelKind::Gray);
        let hist = c.gradient_histogram().unwrap();
        assert_eq!(hist.get(UNDEFINED_ANGLE), 16);
        assert_eq!(hist.total(), 16);
    }

    #[test]
    fn vertical_step_is_thinned_to_two_columns() {
        let (w, h) = (16, 12);
        let values = (0..w * h)
            .map(|i| if i % w < 8 { 0 } else { 200 })
            .collect();
        let c = Channel::from_values(w, h, values, ChannelKind::Gray).unwrap();
        let edges = c.edge_detect().unwrap();

        // Rows far enough from the zero-padded top and bottom borders.
        for y in 3..=8 {
            let nonzero: Vec<usize> = (0..14)
                .filter(|&x| edges.get(x, y).unwrap() != 0)
                .collect();
            assert_eq!(nonzero, vec![7, 8], "row {y}");
        }
        assert!(edges.get(7, 5).unwrap() > 0);
    }

    #[test]
    fn sobel_magnitude_is_zero_on_constant_interior() {
        let c = Channel::filled(5, 5, 9, ChannelKind::Gray);
        let m = c.sobel_magnitude().unwrap();
        assert_eq!(m.get(2, 2), Ok(0));
        assert!(m.get(0, 2).unwrap() > 0);
    }
}
