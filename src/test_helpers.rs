//! Shared test utilities: synthetic normal maps written to disk.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let tmp = tempfile::TempDir::new().unwrap();
//! write_test_png(&tmp.path().join("normal.png"), 64, 32);
//! write_corrupt(&tmp.path().join("broken.png"));
//! ```

use image::{ExtendedColorType, ImageEncoder, RgbImage, RgbaImage};
use std::path::Path;

/// RGB gradient covering the full red and green range.
pub fn gradient_rgb(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            ((x + y) % 256) as u8,
        ])
    })
}

/// RGBA normal-map-like gradient with varying alpha.
pub fn gradient_rgba(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        image::Rgba([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            0,
            (x % 256) as u8,
        ])
    })
}

/// Write an RGBA gradient as PNG.
pub fn write_test_png(path: &Path, width: u32, height: u32) {
    let img = gradient_rgba(width, height);
    let file = std::fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::png::PngEncoder::new(writer)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgba8)
        .unwrap();
}

/// Write an RGB gradient as BMP.
pub fn write_test_bmp(path: &Path, width: u32, height: u32) {
    let img = gradient_rgb(width, height);
    let mut file = std::fs::File::create(path).unwrap();
    image::codecs::bmp::BmpEncoder::new(&mut file)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
}

/// Write bytes that no decoder accepts.
pub fn write_corrupt(path: &Path) {
    std::fs::write(path, b"this is not an image").unwrap();
}
