//! Output filename derivation.
//!
//! Every processed image is written next to (or into a directory chosen
//! instead of) its source, named after the source stem plus a fixed suffix:
//!
//! ```text
//! textures/brick_n.tga   →  out/brick_n_processed.png
//! textures/rock.jpeg     →  out/rock_processed.png
//! ```
//!
//! The extension is the one the user asked for, verbatim (minus any leading
//! dot). Which encoder writes the file is decided separately by
//! [`OutputFormat`](crate::imaging::OutputFormat).

use std::path::{Path, PathBuf};

/// Suffix appended to the input stem when none is configured.
pub const DEFAULT_SUFFIX: &str = "_processed";

/// Extension used when none is configured.
pub const DEFAULT_EXTENSION: &str = "png";

/// Strip a leading dot so `".png"` and `"png"` mean the same thing.
pub fn normalize_extension(ext: &str) -> &str {
    ext.strip_prefix('.').unwrap_or(ext)
}

/// Build `<stem><suffix>.<ext>` for an input path.
///
/// Inputs without a usable stem (e.g. `/` or `..`) are named `image`.
pub fn output_file_name(input: &Path, suffix: &str, ext: &str) -> String {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_else(|| "image".into());
    let ext = normalize_extension(ext);
    if ext.is_empty() {
        format!("{stem}{suffix}")
    } else {
        format!("{stem}{suffix}.{ext}")
    }
}

/// Build `<out_dir>/<stem><suffix>.<ext>` for an input path.
pub fn output_path(input: &Path, out_dir: &Path, suffix: &str, ext: &str) -> PathBuf {
    out_dir.join(output_file_name(input, suffix, ext))
}

/// Save location for a single processed image when no output is named:
/// beside the input, as `<stem><suffix>.<ext>`.
pub fn default_single_output(input: &Path, suffix: &str, ext: &str) -> PathBuf {
    let dir = input.parent().unwrap_or_else(|| Path::new(""));
    output_path(input, dir, suffix, ext)
}
