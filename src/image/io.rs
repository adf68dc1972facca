//! File adapters between the `image` crate and the ARGB pixel contract.
//!
//! - `load_image`: decode any supported file into an [`Image`] of the given mode.
//! - `save_image`: encode an [`Image`] as 8-bit RGB (or gray for grayscale).
//! - `save_channel`: write one channel as a grayscale file, optionally stretched.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::{ColorMode, Image};
use crate::channel::Channel;
use image::{GrayImage, Luma, Rgb, RgbImage};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Decode `path` and split it into the channels of `mode`.
pub fn load_image(path: &Path, mode: ColorMode) -> Result<Image, String> {
    let rgba = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_rgba8();
    let (width, height) = (rgba.width() as usize, rgba.height() as usize);
    let pixels: Vec<u32> = rgba
        .pixels()
        .map(|p| {
            let [r, g, b, a] = p.0;
            u32::from_be_bytes([a, r, g, b])
        })
        .collect();
    Image::from_interleaved(width, height, &pixels, mode)
        .map_err(|e| format!("Failed to decode {}: {e}", path.display()))
}

/// Encode `image` to `path`; the format follows the file extension.
pub fn save_image(image: &Image, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let (w, h) = (image.width() as u32, image.height() as u32);
    let pixels = image.to_interleaved();
    let result = if image.mode() == ColorMode::Grayscale {
        let mut out = GrayImage::new(w, h);
        for (dst, &px) in out.pixels_mut().zip(&pixels) {
            *dst = Luma([(px & 0xff) as u8]);
        }
        out.save(path)
    } else {
        let mut out = RgbImage::new(w, h);
        for (dst, &px) in out.pixels_mut().zip(&pixels) {
            let [_, r, g, b] = px.to_be_bytes();
            *dst = Rgb([r, g, b]);
        }
        out.save(path)
    };
    result.map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Save a single channel as grayscale, clamping samples to 0–255.
pub fn save_channel(channel: &Channel, path: &Path, normalize: bool) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let mut out = GrayImage::new(channel.width() as u32, channel.height() as u32);
    for (dst, px) in out.pixels_mut().zip(channel.to_interleaved(normalize)) {
        *dst = Luma([(px & 0xff) as u8]);
    }
    out.save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create {}: {e}", parent.display())),
        _ => Ok(()),
    }
}
