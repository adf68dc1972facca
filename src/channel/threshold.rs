//! Fixed and automatic (Otsu) thresholding.
use super::Channel;
use log::debug;
use serde::{Deserialize, Serialize};

/// Relative tolerance under which two within-class variances count as equal.
const WCV_TIE_EPS: f64 = 1e-9;

/// Per-sample rule applied against a threshold `t` with output level `max`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdMode {
    /// `v > t ? max : 0`
    #[default]
    Binary,
    /// `v > t ? 0 : max`
    BinaryInverse,
    /// `v > t ? t : v`
    Truncate,
    /// `v > t ? v : 0`
    ToZero,
    /// `v > t ? 0 : v`
    ToZeroInverse,
    /// Binary with the threshold chosen by [`Channel::otsu_threshold`].
    Otsu,
}

impl ThresholdMode {
    #[inline]
    fn apply(self, v: i32, t: i32, max: i32) -> i32 {
        let above = v > t;
        match self {
            ThresholdMode::Binary | ThresholdMode::Otsu => {
                if above {
                    max
                } else {
                    0
                }
            }
            ThresholdMode::BinaryInverse => {
                if above {
                    0
                } else {
                    max
                }
            }
            ThresholdMode::Truncate => {
                if above {
                    t
                } else {
                    v
                }
            }
            ThresholdMode::ToZero => {
                if above {
                    v
                } else {
                    0
                }
            }
            ThresholdMode::ToZeroInverse => {
                if above {
                    0
                } else {
                    v
                }
            }
        }
    }
}

impl Channel {
    /// Threshold every sample in place and return the threshold used. With
    /// `Otsu`, `threshold` is ignored.
    pub fn apply_threshold(&mut self, threshold: i32, max: i32, mode: ThresholdMode) -> i32 {
        let t = match mode {
            ThresholdMode::Otsu => self.otsu_threshold(),
            _ => threshold,
        };
        for v in self.as_mut_slice() {
            *v = mode.apply(*v, t, max);
        }
        t
    }

    /// Threshold in `0..=255` minimizing the within-class variance
    /// `wB·varB + wF·varF`, where the background is every sample `<= t`.
    ///
    /// Samples are binned after clamping to 0–255. When a run of candidates
    /// ties on the minimum, the middle of that run is returned. An empty
    /// channel yields 0.
    pub fn otsu_threshold(&self) -> i32 {
        let total = self.len();
        if total == 0 {
            return 0;
        }
        let mut bins = [0u64; 256];
        for &v in self.as_slice() {
            bins[v.clamp(0, 255) as usize] += 1;
        }

        let n = total as f64;
        let (sum_all, sumsq_all) = bins.iter().enumerate().fold((0.0, 0.0), |acc, (v, &c)| {
            let (v, c) = (v as f64, c as f64);
            (acc.0 + v * c, acc.1 + v * v * c)
        });

        let mut count_b = 0u64;
        let mut sum_b = 0.0;
        let mut sumsq_b = 0.0;
        let mut best: Option<(f64, usize, usize)> = None;

        for (t, &c) in bins.iter().enumerate() {
            count_b += c;
            sum_b += t as f64 * c as f64;
            sumsq_b += (t as f64) * (t as f64) * c as f64;
            if count_b == 0 {
                continue;
            }

            let nb = count_b as f64;
            let mean_b = sum_b / nb;
            let var_b = (sumsq_b / nb - mean_b * mean_b).max(0.0);
            let nf = n - nb;
            let var_f = if nf > 0.0 {
                let mean_f = (sum_all - sum_b) / nf;
                ((sumsq_all - sumsq_b) / nf - mean_f * mean_f).max(0.0)
            } else {
                0.0
            };
            let wcv = nb / n * var_b + nf / n * var_f;

            best = match best {
                None => Some((wcv, t, t)),
                Some((b, first, last)) => {
                    if (wcv - b).abs() <= WCV_TIE_EPS * b.abs().max(1.0) {
                        Some((b, first, if last + 1 == t { t } else { last }))
                    } else if wcv < b {
                        Some((wcv, t, t))
                    } else {
                        Some((b, first, last))
                    }
                }
            };

            if count_b as usize == total {
                break;
            }
        }

        let threshold = best.map_or(0, |(_, first, last)| ((first + last) / 2) as i32);
        debug!("otsu_threshold: {threshold} over {total} samples");
        threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::ChannelKind;

    fn row(values: Vec<i32>) -> Channel {
        let w = values.len();
        Channel::from_values(w, 1, values, ChannelKind::Gray).unwrap()
    }

    #[test]
    fn fixed_modes() {
        let src = row(vec![50, 100, 150, 200]);
        let cases = [
            (ThresholdMode::Binary, [0, 0, 255, 255]),
            (ThresholdMode::BinaryInverse, [255, 255, 0, 0]),
            (ThresholdMode::Truncate, [50, 100, 100, 100]),
            (ThresholdMode::ToZero, [0, 0, 150, 200]),
            (ThresholdMode::ToZeroInverse, [50, 100, 0, 0]),
        ];
        for (mode, expected) in cases {
            let mut c = src.clone();
            assert_eq!(c.apply_threshold(100, 255, mode), 100);
            assert_eq!(c.as_slice(), &expected, "{mode:?}");
        }
    }

    #[test]
    fn otsu_splits_bimodal_between_modes() {
        let mut values = vec![10; 40];
        values.extend(vec![200; 60]);
        let mut c = row(values);
        let t = c.otsu_threshold();
        assert!(t > 10 && t < 200, "t={t}");
        assert_eq!(t, 104);

        assert_eq!(c.apply_threshold(0, 1, ThresholdMode::Otsu), t);
        assert_eq!(c.as_slice().iter().filter(|&&v| v == 1).count(), 60);
    }

    #[test]
    fn otsu_degenerate_inputs() {
        assert_eq!(Channel::new(0, 0, ChannelKind::Gray).otsu_threshold(), 0);
        assert_eq!(row(vec![77; 5]).otsu_threshold(), 77);
    }

    #[test]
    fn otsu_separates_noisy_clusters() {
        let mut values = Vec::new();
        for i in 0..50 {
            values.push(40 + i % 7);
            values.push(180 + i % 11);
        }
        let t = row(values).otsu_threshold();
        assert!((46..180).contains(&t), "t={t}");
    }
}
