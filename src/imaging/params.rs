//! Parameter types for image encoding.
//!
//! These describe *what* to write, not *how*. The
//! [`backend`](super::backend) does the actual encoding.
//!
//! ## Types
//!
//! - [`Quality`]: JPEG encoding quality (1–100, default 90). Clamped on construction.
//! - [`OutputFormat`]: encoder selected from the output file extension.

use std::path::Path;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Encoder used when writing a processed image.
///
/// Selection by extension is a fixed three-way dispatch:
///
/// | Extension | Format |
/// |---|---|
/// | `jpg`, `jpeg` | JPEG (RGB, lossy) |
/// | `tga` | TGA |
/// | anything else, or none | PNG |
///
/// Unknown extensions are not an error: `normal.webp` is written as PNG
/// data under that name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Jpeg,
    Tga,
}

impl OutputFormat {
    /// Pick the encoder for an extension (without the leading dot, any case).
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Self::Jpeg,
            "tga" => Self::Tga,
            _ => Self::Png,
        }
    }

    /// Pick the encoder for an output path by its extension.
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .map(Self::from_extension)
            .unwrap_or(Self::Png)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Png => "PNG",
            Self::Jpeg => "JPEG",
            Self::Tga => "TGA",
        }
    }

    /// Whether decoding the written file reproduces the pixels exactly.
    pub fn is_lossless(self) -> bool {
        !matches!(self, Self::Jpeg)
    }
}
