//! CLI output formatting.
//!
//! Every function here has a `format_*` form that returns `Vec<String>` (pure,
//! no I/O, testable) and, where the CLI needs it, a `print_*` wrapper that
//! writes to stdout.
//!
//! # Output Format
//!
//! ## Single image
//!
//! ```text
//! brick_n.tga (1024x1024, standard)
//!     Saved: textures/brick_n_processed.png (PNG)
//! ```
//!
//! ## Batch progress
//!
//! ```text
//! 001/003 brick_n.tga
//!     Output: out/brick_n_processed.png
//! 002/003 broken.png
//!     Failed: Cannot read broken.png: Decode failed: ...
//! ```
//!
//! ## Batch summary
//!
//! ```text
//! Processed 2 of 3 images (standard)
//! Failed:
//!     broken.png
//! ```

use crate::imaging::OutputFormat;
use crate::process::{BatchEvent, BatchReport};
use crate::reconstruct::ReconstructionMode;
use std::path::Path;

/// Format a 1-based position as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// File name of a path, or the whole path when it has none.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ============================================================================
// Single image
// ============================================================================

/// Format the outcome of a single-image process + save.
pub fn format_single_output(
    input: &Path,
    dimensions: (u32, u32),
    mode: ReconstructionMode,
    output: &Path,
    format: OutputFormat,
) -> Vec<String> {
    vec![
        format!(
            "{} ({}x{}, {})",
            display_name(input),
            dimensions.0,
            dimensions.1,
            mode
        ),
        format!(
            "{}Saved: {} ({})",
            indent(1),
            output.display(),
            format.name()
        ),
    ]
}

pub fn print_single_output(
    input: &Path,
    dimensions: (u32, u32),
    mode: ReconstructionMode,
    output: &Path,
    format: OutputFormat,
) {
    for line in format_single_output(input, dimensions, mode, output, format) {
        println!("{}", line);
    }
}

// ============================================================================
// Batch
// ============================================================================

/// Format a single batch progress event as display lines.
pub fn format_batch_event(event: &BatchEvent) -> Vec<String> {
    match event {
        BatchEvent::ItemSucceeded {
            index,
            total,
            input,
            output,
        } => vec![
            format!(
                "{}/{} {}",
                format_index(*index),
                format_index(*total),
                display_name(input)
            ),
            format!("{}Output: {}", indent(1), output.display()),
        ],
        BatchEvent::ItemFailed {
            index,
            total,
            input,
            error,
        } => vec![
            format!(
                "{}/{} {}",
                format_index(*index),
                format_index(*total),
                display_name(input)
            ),
            format!("{}Failed: {}", indent(1), error),
        ],
    }
}

/// Format the final tally of a batch run, listing failed inputs.
pub fn format_batch_summary(report: &BatchReport) -> Vec<String> {
    let noun = if report.total == 1 { "image" } else { "images" };
    let mut lines = vec![format!(
        "Processed {} of {} {} ({})",
        report.succeeded, report.total, noun, report.mode
    )];

    if report.failed() > 0 {
        lines.push("Failed:".to_string());
        for item in report.failures() {
            lines.push(format!("{}{}", indent(1), item.input.display()));
        }
    }
    lines
}

pub fn print_batch_summary(report: &BatchReport) {
    for line in format_batch_summary(report) {
        println!("{}", line);
    }
}
