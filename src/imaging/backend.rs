//! Image backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations the rest of the
//! crate needs from an image library: decode a file, and encode an RGB buffer
//! to a file in a chosen [`OutputFormat`].
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. Tests use a recording mock so batch logic can be exercised without
//! touching real files.

use super::params::{OutputFormat, Quality};
use image::{DynamicImage, RgbImage};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Encode failed: {0}")]
    Encode(String),
}

/// Trait for image backends.
///
/// `Sync` so one backend can be shared across rayon workers.
pub trait ImageBackend: Sync {
    /// Decode an image file into memory.
    fn decode(&self, path: &Path) -> Result<DynamicImage, BackendError>;

    /// Encode an RGB buffer and write it to `path`.
    fn encode(
        &self,
        image: &RgbImage,
        path: &Path,
        format: OutputFormat,
        quality: Quality,
    ) -> Result<(), BackendError>;
}
