//! Sparse value→count table over pixel samples.
//!
//! Keys are arbitrary `i32` sample values (gradient histograms use `-1` for
//! undefined orientations). The largest count is maintained by every mutator so
//! rendering never rescans the table.
use crate::channel::{Channel, ChannelKind};
use serde::Serialize;
use std::collections::BTreeMap;

/// Background level of a rendered bar chart.
pub const CHART_BACKGROUND: i32 = 128;
/// Bar level of a rendered bar chart.
pub const CHART_BAR: i32 = 255;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Histogram {
    counts: BTreeMap<i32, u32>,
    max_count: u32,
}

impl Histogram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count every sample of `channel`.
    pub fn from_channel(channel: &Channel) -> Self {
        let mut histogram = Self::new();
        for &v in channel.as_slice() {
            histogram.increment(v);
        }
        histogram
    }

    pub fn increment(&mut self, value: i32) {
        let count = self.counts.entry(value).or_insert(0);
        *count += 1;
        self.max_count = self.max_count.max(*count);
    }

    /// Occurrences of `value`; 0 when never seen.
    pub fn get(&self, value: i32) -> u32 {
        self.counts.get(&value).copied().unwrap_or(0)
    }

    pub fn reset(&mut self) {
        self.counts.clear();
        self.max_count = 0;
    }

    /// Replace the whole table. Zero counts are dropped.
    pub fn replace<I>(&mut self, counts: I)
    where
        I: IntoIterator<Item = (i32, u32)>,
    {
        self.counts = counts.into_iter().filter(|&(_, c)| c > 0).collect();
        self.max_count = self.counts.values().copied().max().unwrap_or(0);
    }

    #[inline]
    pub fn max_count(&self) -> u32 {
        self.max_count
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.values().map(|&c| u64::from(c)).sum()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// `(value, count)` pairs in ascending value order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, u32)> + '_ {
        self.counts.iter().map(|(&v, &c)| (v, c))
    }

    /// Bar chart of the values `min..=max` as a `width × height` gray channel.
    ///
    /// Each value gets `width / (max − min + 1)` columns and a bar of
    /// `count · height / max_count` rows rising from the bottom. Returns `None`
    /// when the range is inverted or too wide for one column per value.
    pub fn render_bar_chart(
        &self,
        min: i32,
        max: i32,
        width: usize,
        height: usize,
    ) -> Option<Channel> {
        if max < min {
            return None;
        }
        let span = (i64::from(max) - i64::from(min) + 1) as usize;
        if width < span {
            return None;
        }
        let bar_width = width / span;
        let mut chart = Channel::filled(width, height, CHART_BACKGROUND, ChannelKind::Gray);
        if self.max_count == 0 || height == 0 {
            return Some(chart);
        }

        for (value, count) in self.counts.range(min..=max) {
            let bar_height =
                (u64::from(*count) * height as u64 / u64::from(self.max_count)) as usize;
            let x0 = (i64::from(*value) - i64::from(min)) as usize * bar_width;
            let samples = chart.as_mut_slice();
            for y in (height - bar_height)..height {
                let row = &mut samples[y * width..(y + 1) * width];
                row[x0..x0 + bar_width].fill(CHART_BAR);
            }
        }
        Some(chart)
    }
}

impl FromIterator<i32> for Histogram {
    fn from_iter<I: IntoIterator<Item = i32>>(values: I) -> Self {
        let mut histogram = Histogram::new();
        values.into_iter().for_each(|v| histogram.increment(v));
        histogram
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increment_tracks_maximum() {
        let mut h: Histogram = [3, 3, 7, -1, 3].into_iter().collect();
        assert_eq!(h.get(3), 3);
        assert_eq!(h.get(42), 0);
        assert_eq!(h.max_count(), 3);
        assert_eq!(h.total(), 5);
        h.increment(7);
        h.increment(7);
        h.increment(7);
        assert_eq!(h.max_count(), 4);
        h.reset();
        assert!(h.is_empty());
        assert_eq!(h.max_count(), 0);
    }

    #[test]
    fn replace_recomputes_maximum() {
        let mut h: Histogram = [1, 1, 1, 1].into_iter().collect();
        h.replace([(5, 2), (6, 0), (9, 3)]);
        assert_eq!(h.max_count(), 3);
        assert_eq!(h.get(1), 0);
        assert_eq!(h.len(), 2);
        assert_eq!(h.iter().collect::<Vec<_>>(), vec![(5, 2), (9, 3)]);
    }

    #[test]
    fn from_channel_counts_samples() {
        let c = Channel::from_values(3, 1, vec![4, 4, 0], ChannelKind::Gray).unwrap();
        let h = Histogram::from_channel(&c);
        assert_eq!(h.get(4), 2);
        assert_eq!(h.get(0), 1);
    }

    #[test]
    fn bar_chart_layout() {
        let h: Histogram = [0, 1, 1, 1, 1].into_iter().collect();
        let chart = h.render_bar_chart(0, 1, 4, 4).unwrap();
        // Value 0: 1/4 of the height in columns 0..2; value 1: full height in 2..4.
        assert_eq!(chart.get(0, 3), Ok(CHART_BAR));
        assert_eq!(chart.get(1, 2), Ok(CHART_BACKGROUND));
        assert_eq!(chart.get(2, 0), Ok(CHART_BAR));
        assert_eq!(chart.get(3, 3), Ok(CHART_BAR));
    }

    #[test]
    fn bar_chart_rejects_bad_ranges() {
        let h: Histogram = [0].into_iter().collect();
        assert!(h.render_bar_chart(5, 4, 10, 10).is_none());
        assert!(h.render_bar_chart(0, 255, 100, 10).is_none());
        let empty = Histogram::new().render_bar_chart(0, 2, 3, 2).unwrap();
        assert!(empty.as_slice().iter().all(|&v| v == CHART_BACKGROUND));
    }

    #[test]
    fn serializes_as_json_object() {
        let h: Histogram = [2, 2].into_iter().collect();
        let json = serde_json::to_value(&h).unwrap();
        assert_eq!(json["counts"]["2"], 2);
        assert_eq!(json["max_count"], 2);
    }
}
