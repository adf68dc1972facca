//! Affine resampling by inverse mapping.
//!
//! Each destination pixel `(x, y)` is pulled from `inv · [x, y, 1]ᵗ` with
//! nearest-neighbor rounding. The inverse is computed and quantized once per
//! call; only its two affine rows are evaluated.
use super::{fill_rows, Channel};
use crate::error::{AlgebraError, Result};
use crate::matrix::Matrix;
use log::debug;

/// Sample written where the inverse mapping leaves the source grid. Hue and
/// saturation planes use 0 instead, see [`ChannelKind::transform_fill`].
///
/// [`ChannelKind::transform_fill`]: super::ChannelKind::transform_fill
pub const TRANSFORM_FILL: i32 = 255;

impl Channel {
    /// Resample in place through the 3×3 forward transform `affine`.
    pub fn apply_transform(&mut self, affine: &Matrix<f64>) -> Result<()> {
        if affine.shape() != (3, 3) {
            return Err(AlgebraError::shape((3, 3), affine.shape()));
        }
        let inverse = affine.inverse()?;
        let quantized = inverse.quantize()?;
        debug!(
            "apply_transform: inverse scale factor {:.3}\n{}",
            quantized.scale_factor(),
            inverse
        );

        let q = quantized.values().as_slice();
        let fill = self.kind().transform_fill();
        let source = &*self;
        let values = fill_rows(self.width(), self.height(), |y, row| {
            let yi = y as i64;
            for (x, out) in row.iter_mut().enumerate() {
                let xi = x as i64;
                let sx = i64::from(q[0]) * xi + i64::from(q[1]) * yi + i64::from(q[2]);
                let sy = i64::from(q[3]) * xi + i64::from(q[4]) * yi + i64::from(q[5]);
                let sx = quantized.rescale(sx).round() as isize;
                let sy = quantized.rescale(sy).round() as isize;
                *out = source.sample(sx, sy).unwrap_or(fill);
            }
        });
        self.replace_samples(values);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::ChannelKind;

    fn ramp(w: usize, h: usize) -> Channel {
        Channel::from_values(w, h, (0..(w * h) as i32).collect(), ChannelKind::Gray).unwrap()
    }

    fn translation(tx: f64, ty: f64) -> Matrix<f64> {
        Matrix::from_vec(3, 3, vec![1.0, 0.0, tx, 0.0, 1.0, ty, 0.0, 0.0, 1.0]).unwrap()
    }

    #[test]
    fn identity_is_a_no_op() {
        let mut c = ramp(4, 3);
        c.apply_transform(&Matrix::identity(3)).unwrap();
        assert_eq!(c, ramp(4, 3));
    }

    #[test]
    fn translation_shifts_columns_and_fills() {
        let mut c = ramp(4, 3);
        c.apply_transform(&translation(1.0, 0.0)).unwrap();
        assert_eq!(c.get(0, 0), Ok(TRANSFORM_FILL));
        assert_eq!(c.get(1, 0), Ok(0));
        assert_eq!(c.get(3, 2), Ok(10));

        let mut d = ramp(4, 3);
        d.apply_transform(&translation(0.0, 2.0)).unwrap();
        assert_eq!(d.get(2, 1), Ok(TRANSFORM_FILL));
        assert_eq!(d.get(2, 2), Ok(2));
    }

    #[test]
    fn half_turn_about_origin_leaves_only_fill_and_origin() {
        let mut c = ramp(3, 3);
        let rot = Matrix::from_vec(3, 3, vec![-1.0, 0.0, 0.0, 0.0, -1.0, 0.0, 0.0, 0.0, 1.0])
            .unwrap();
        c.apply_transform(&rot).unwrap();
        assert_eq!(c.get(0, 0), Ok(0));
        assert_eq!(c.get(1, 1), Ok(TRANSFORM_FILL));
    }

    #[test]
    fn hue_and_saturation_planes_fill_with_zero() {
        let mut hue = Channel::filled(3, 1, 500, ChannelKind::Hue);
        let mut value = Channel::filled(3, 1, 90, ChannelKind::Value);
        hue.apply_transform(&translation(1.0, 0.0)).unwrap();
        value.apply_transform(&translation(1.0, 0.0)).unwrap();
        assert_eq!(hue.as_slice(), &[0, 500, 500]);
        assert_eq!(value.as_slice(), &[TRANSFORM_FILL, 90, 90]);
    }

    #[test]
    fn singular_and_misshaped_transforms_fail() {
        let mut c = ramp(2, 2);
        assert_eq!(
            c.apply_transform(&Matrix::new(3, 3)),
            Err(AlgebraError::SingularMatrix)
        );
        assert!(matches!(
            c.apply_transform(&Matrix::identity(2)),
            Err(AlgebraError::DimensionMismatch { .. })
        ));
        assert_eq!(c, ramp(2, 2));
    }
}
