#![allow(dead_code)]

use pixel_algebra::channel::{Channel, ChannelKind};

/// Generates a simple high-contrast checkerboard channel.
pub fn checkerboard(width: usize, height: usize, cell: usize) -> Channel {
    assert!(cell > 0, "cell size must be positive");
    let mut values = vec![0i32; width * height];
    for y in 0..height {
        for x in 0..width {
            let sum = x / cell + y / cell;
            values[y * width + x] = if sum & 1 == 0 { 32 } else { 220 };
        }
    }
    Channel::from_values(width, height, values, ChannelKind::Gray).unwrap()
}

/// Columns left of `edge` are `low`, the rest `high`.
pub fn vertical_step(width: usize, height: usize, edge: usize, low: i32, high: i32) -> Channel {
    let values = (0..width * height)
        .map(|i| if i % width < edge { low } else { high })
        .collect();
    Channel::from_values(width, height, values, ChannelKind::Gray).unwrap()
}

/// Deterministic pseudo-random samples in `0..256`.
pub fn noise(width: usize, height: usize, seed: u32) -> Channel {
    let mut state = seed.wrapping_mul(2_654_435_761).wrapping_add(1);
    let values = (0..width * height)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state % 256) as i32
        })
        .collect();
    Channel::from_values(width, height, values, ChannelKind::Gray).unwrap()
}

/// ARGB pixels sweeping hue along x and brightness along y.
pub fn color_sweep(width: usize, height: usize) -> Vec<u32> {
    let mut pixels = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let r = (x * 255 / width.max(1)) as u32;
            let g = (y * 255 / height.max(1)) as u32;
            let b = ((x + y) * 97 % 256) as u32;
            pixels.push(0xff00_0000 | (r << 16) | (g << 8) | b);
        }
    }
    pixels
}
