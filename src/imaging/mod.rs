//! Image decoding and encoding, pure Rust with no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` (PNG, JPEG, TGA, BMP) |
//! | **Encode** | `PngEncoder` / `JpegEncoder` / `TgaEncoder`, chosen by [`OutputFormat`] |
//!
//! The module is split into:
//! - **Parameters**: [`OutputFormat`] dispatch and [`Quality`]
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]

pub mod backend;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend};
pub use params::{OutputFormat, Quality};
pub use rust_backend::{RustBackend, supported_input_extensions};
