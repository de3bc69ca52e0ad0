//! Input discovery for batch runs.
//!
//! Batch inputs may be individual files or directories. Files are taken as
//! given, in the order given, whatever their extension and whether or not
//! they exist. A file the user named explicitly is attempted, and fails later
//! with a decode error if it is missing or isn't an image. Directories are expanded to the image files they contain:
//!
//! - Only files with a supported extension are picked up (case-insensitive)
//! - Hidden entries (leading `.`) are skipped
//! - Entries are sorted by path so runs are reproducible
//! - Subdirectories are descended into only when `recursive` is set
//!
//! Previously written outputs (stems ending in the active suffix) are
//! skipped during expansion, so re-running a batch into the same directory
//! doesn't process its own results.

use crate::imaging::supported_input_extensions;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Expand files and directories into an ordered list of image paths.
pub fn collect_inputs(
    inputs: &[PathBuf],
    recursive: bool,
    skip_suffix: &str,
) -> Result<Vec<PathBuf>, ScanError> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            collect_dir(input, recursive, skip_suffix, &mut files)?;
        } else {
            files.push(input.clone());
        }
    }
    Ok(files)
}

fn collect_dir(
    dir: &Path,
    recursive: bool,
    skip_suffix: &str,
    files: &mut Vec<PathBuf>,
) -> Result<(), ScanError> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            !p.file_name()
                .map(|n| n.to_string_lossy().starts_with('.'))
                .unwrap_or(true)
        })
        .collect();
    entries.sort();

    for entry in entries {
        if entry.is_dir() {
            if recursive {
                collect_dir(&entry, recursive, skip_suffix, files)?;
            }
        } else if is_image(&entry) && !is_previous_output(&entry, skip_suffix) {
            files.push(entry);
        }
    }
    Ok(())
}

fn is_image(path: &Path) -> bool {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    supported_input_extensions().contains(&ext.as_str())
}

fn is_previous_output(path: &Path, suffix: &str) -> bool {
    !suffix.is_empty()
        && path
            .file_stem()
            .is_some_and(|s| s.to_string_lossy().ends_with(suffix))
}
