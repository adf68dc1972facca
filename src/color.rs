//! Per-pixel color conversions.
//!
//! Hue and saturation do not fit the 0–255 sample range without losing the
//! precision needed for a lossless RGB round-trip, so HSV planes store them as
//! scaled integers: hue in hundredths of a degree (`HUE_SCALE`) and saturation
//! as a fraction of `SATURATION_SCALE`. Value stays in 0–255.

/// Stored hue = degrees × `HUE_SCALE`, in `[0, 36000)`.
pub const HUE_SCALE: f64 = 100.0;
/// Stored saturation = fraction × `SATURATION_SCALE`, in `[0, 32767]`.
pub const SATURATION_SCALE: f64 = i16::MAX as f64;

/// Integer luma `(11r + 16g + 5b) / 32`, rounded to nearest.
#[inline]
pub fn luma(r: i32, g: i32, b: i32) -> i32 {
    (11 * r + 16 * g + 5 * b + 16) / 32
}

/// Unpack `(r, g, b)` from an ARGB word.
#[inline]
pub fn unpack_rgb(pixel: u32) -> (i32, i32, i32) {
    (
        ((pixel >> 16) & 0xff) as i32,
        ((pixel >> 8) & 0xff) as i32,
        (pixel & 0xff) as i32,
    )
}

#[inline]
pub fn unpack_alpha(pixel: u32) -> i32 {
    ((pixel >> 24) & 0xff) as i32
}

/// Pack an opaque ARGB word, clamping each sample to 0–255.
#[inline]
pub fn pack_rgb(r: i32, g: i32, b: i32) -> u32 {
    let c = |v: i32| v.clamp(0, 255) as u32;
    0xff00_0000 | (c(r) << 16) | (c(g) << 8) | c(b)
}

/// RGB samples to scaled `(hue, saturation, value)`. Hue is 0 for grays.
pub fn rgb_to_hsv(r: i32, g: i32, b: i32) -> (i32, i32, i32) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = f64::from(max - min);

    let saturation = if max <= 0 {
        0
    } else {
        (delta / f64::from(max) * SATURATION_SCALE).round() as i32
    };

    if delta == 0.0 {
        return (0, saturation, max);
    }

    let (r, g, b) = (f64::from(r), f64::from(g), f64::from(b));
    let mut degrees = if max as f64 == r {
        60.0 * ((g - b) / delta)
    } else if max as f64 == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };
    if degrees < 0.0 {
        degrees += 360.0;
    }
    let mut hue = (degrees * HUE_SCALE).round() as i32;
    if hue >= (360.0 * HUE_SCALE) as i32 {
        hue = 0;
    }
    (hue, saturation, max)
}

/// Scaled `(hue, saturation, value)` back to RGB samples.
pub fn hsv_to_rgb(hue: i32, saturation: i32, value: i32) -> (i32, i32, i32) {
    let v = f64::from(value);
    let s = f64::from(saturation) / SATURATION_SCALE;
    let c = v * s;
    let hp = (f64::from(hue) / HUE_SCALE).rem_euclid(360.0) / 60.0;
    let x = c * (1.0 - ((hp % 2.0) - 1.0).abs());
    let m = v - c;

    let (r1, g1, b1) = match (hp.floor() as usize).min(5) {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    (
        (r1 + m).round() as i32,
        (g1 + m).round() as i32,
        (b1 + m).round() as i32,
    )
}
