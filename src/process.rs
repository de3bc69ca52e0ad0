//! Normal map processing: single images and batches.
//!
//! Every input goes through the same per-item transform:
//!
//! ```text
//! decode → RGBA8 → R, G planes / 255 → reconstruct B → RGB8 (R, G, B)
//! ```
//!
//! Alpha is only used for consistent channel indexing and is dropped. R and
//! G bytes are copied through untouched; only B is synthesized. Output
//! dimensions always equal input dimensions.
//!
//! ## Two Flows
//!
//! - **Single** ([`Session`]): one image is processed and held in memory so
//!   the caller can preview it, then saved explicitly with [`Session::save`].
//!   Errors abort the operation and leave the held image untouched.
//! - **Batch** ([`run_batch`]): every input is processed and written straight
//!   to `<out_dir>/<stem><suffix>.<ext>`. A failing item is recorded in the
//!   [`BatchReport`] and the batch moves on.
//!
//! [`Dispatch::from_paths`] picks the flow from the number of inputs.
//!
//! ## Parallel Processing
//!
//! Batch items share nothing, so they are processed in parallel using
//! [rayon](https://docs.rs/rayon). Results are reported in input order;
//! progress events arrive in completion order.

use crate::imaging::{BackendError, ImageBackend, OutputFormat, Quality, RustBackend};
use crate::naming::{self, normalize_extension};
use crate::reconstruct::{ReconstructionMode, from_channel, reconstruct_plane, to_channel};
use image::{DynamicImage, Rgb, RgbImage};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Cannot read {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        source: BackendError,
    },
    #[error("Cannot write {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        source: BackendError,
    },
    #[error("No input image selected")]
    NoInputSelected,
    #[error("No processed image to save, process an image first")]
    NoProcessedResult,
    #[error("Output {} is already written by an earlier input", .output.display())]
    OutputCollision { output: PathBuf },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// ============================================================================
// Per-item transform
// ============================================================================

/// Rebuild the blue channel of a decoded normal map.
///
/// The result is RGB8 with the same dimensions; R and G are the source bytes.
pub fn reconstruct_image(image: &DynamicImage, mode: ReconstructionMode) -> RgbImage {
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();

    let (r, g): (Vec<f64>, Vec<f64>) = rgba
        .pixels()
        .map(|p| (from_channel(p[0]), from_channel(p[1])))
        .unzip();
    let b = reconstruct_plane(&r, &g, mode);

    let mut out = RgbImage::new(width, height);
    for ((dst, src), b) in out.pixels_mut().zip(rgba.pixels()).zip(b) {
        *dst = Rgb([src[0], src[1], to_channel(b)]);
    }
    out
}

/// Decode one input and reconstruct it.
pub fn process_one(
    backend: &impl ImageBackend,
    path: &Path,
    mode: ReconstructionMode,
) -> Result<RgbImage, ProcessError> {
    let decoded = backend.decode(path).map_err(|source| ProcessError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(reconstruct_image(&decoded, mode))
}

/// Encode `image` to `path`, choosing the encoder from the path's extension.
///
/// Returns the format that was written.
pub fn save_image(
    backend: &impl ImageBackend,
    image: &RgbImage,
    path: &Path,
    quality: Quality,
) -> Result<OutputFormat, ProcessError> {
    let format = OutputFormat::from_path(path);
    backend
        .encode(image, path, format, quality)
        .map_err(|source| ProcessError::Encode {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(format)
}

/// Process every path, one result per input, in input order.
pub fn process(
    paths: &[PathBuf],
    mode: ReconstructionMode,
) -> Result<Vec<Result<RgbImage, ProcessError>>, ProcessError> {
    process_with_backend(&RustBackend::new(), paths, mode)
}

/// Process every path using a specific backend (allows testing with mock).
///
/// Fails only when `paths` is empty; per-item failures are returned in place.
pub fn process_with_backend(
    backend: &impl ImageBackend,
    paths: &[PathBuf],
    mode: ReconstructionMode,
) -> Result<Vec<Result<RgbImage, ProcessError>>, ProcessError> {
    if paths.is_empty() {
        return Err(ProcessError::NoInputSelected);
    }
    Ok(paths
        .par_iter()
        .map(|path| process_one(backend, path, mode))
        .collect())
}

// ============================================================================
// Single-image flow
// ============================================================================

/// Which flow a list of inputs calls for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch<'a> {
    /// Exactly one input: process and hold for preview/save.
    Single(&'a Path),
    /// Several inputs: process and write each one.
    Batch(&'a [PathBuf]),
}

impl<'a> Dispatch<'a> {
    pub fn from_paths(paths: &'a [PathBuf]) -> Result<Self, ProcessError> {
        match paths {
            [] => Err(ProcessError::NoInputSelected),
            [single] => Ok(Self::Single(single)),
            many => Ok(Self::Batch(many)),
        }
    }
}

/// Holds the single processed image between processing and saving.
#[derive(Debug, Default)]
pub struct Session {
    processed: Option<RgbImage>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last successfully processed image, if any.
    pub fn processed(&self) -> Option<&RgbImage> {
        self.processed.as_ref()
    }

    /// Forget the held image (e.g. when a new input is selected).
    pub fn clear(&mut self) {
        self.processed = None;
    }

    /// Process the first of `paths` and hold the result.
    ///
    /// On failure the previously held image, if any, is kept.
    pub fn process(
        &mut self,
        backend: &impl ImageBackend,
        paths: &[PathBuf],
        mode: ReconstructionMode,
    ) -> Result<&RgbImage, ProcessError> {
        let path = paths.first().ok_or(ProcessError::NoInputSelected)?;
        let image = process_one(backend, path, mode)?;
        Ok(self.processed.insert(image))
    }

    /// Save the held image to `path` with the encoder its extension selects.
    pub fn save(
        &self,
        backend: &impl ImageBackend,
        path: &Path,
        quality: Quality,
    ) -> Result<OutputFormat, ProcessError> {
        let image = self
            .processed
            .as_ref()
            .ok_or(ProcessError::NoProcessedResult)?;
        save_image(backend, image, path, quality)
    }
}

// ============================================================================
// Batch flow
// ============================================================================

/// Where and how batch outputs are written.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub out_dir: PathBuf,
    /// Output extension; also selects the encoder.
    pub extension: String,
    pub suffix: String,
    pub mode: ReconstructionMode,
    pub quality: Quality,
}

impl BatchOptions {
    pub fn new(out_dir: impl Into<PathBuf>, mode: ReconstructionMode) -> Self {
        Self {
            out_dir: out_dir.into(),
            extension: naming::DEFAULT_EXTENSION.to_string(),
            suffix: naming::DEFAULT_SUFFIX.to_string(),
            mode,
            quality: Quality::default(),
        }
    }

    /// Output path for one input.
    pub fn output_path(&self, input: &Path) -> PathBuf {
        naming::output_path(input, &self.out_dir, &self.suffix, &self.extension)
    }

    pub fn format(&self) -> OutputFormat {
        OutputFormat::from_extension(normalize_extension(&self.extension))
    }
}

/// Progress event emitted once per finished batch item.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchEvent {
    ItemSucceeded {
        /// 1-based position in the input list.
        index: usize,
        total: usize,
        input: PathBuf,
        output: PathBuf,
    },
    ItemFailed {
        index: usize,
        total: usize,
        input: PathBuf,
        error: String,
    },
}

/// Outcome of one batch item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemReport {
    pub input: PathBuf,
    pub output: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ItemReport {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Result of a batch run, items in input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub mode: ReconstructionMode,
    pub succeeded: usize,
    pub total: usize,
    pub items: Vec<ItemReport>,
}

impl BatchReport {
    pub fn failed(&self) -> usize {
        self.total - self.succeeded
    }

    pub fn failures(&self) -> impl Iterator<Item = &ItemReport> {
        self.items.iter().filter(|item| !item.succeeded())
    }
}

/// Mark every output path already claimed by an earlier input.
fn find_collisions(outputs: &[PathBuf]) -> Vec<bool> {
    let mut seen = HashSet::new();
    outputs.iter().map(|o| !seen.insert(o)).collect()
}

fn process_item(
    backend: &impl ImageBackend,
    input: &Path,
    output: &Path,
    options: &BatchOptions,
) -> Result<(), ProcessError> {
    let image = process_one(backend, input, options.mode)?;
    backend
        .encode(&image, output, options.format(), options.quality)
        .map_err(|source| ProcessError::Encode {
            path: output.to_path_buf(),
            source,
        })
}

/// Process every input and write it into `options.out_dir`.
///
/// Per-item failures are recorded in the report, never returned. The run
/// itself fails only for an empty input list or an output directory that
/// cannot be created.
pub fn run_batch(
    backend: &impl ImageBackend,
    paths: &[PathBuf],
    options: &BatchOptions,
    progress: Option<Sender<BatchEvent>>,
) -> Result<BatchReport, ProcessError> {
    if paths.is_empty() {
        return Err(ProcessError::NoInputSelected);
    }
    std::fs::create_dir_all(&options.out_dir)?;

    let total = paths.len();
    let outputs: Vec<PathBuf> = paths.iter().map(|p| options.output_path(p)).collect();
    let collisions = find_collisions(&outputs);

    let results: Vec<Result<(), ProcessError>> = (0..total)
        .into_par_iter()
        .map(|i| {
            let (input, output) = (&paths[i], &outputs[i]);
            let result = if collisions[i] {
                Err(ProcessError::OutputCollision {
                    output: output.clone(),
                })
            } else {
                process_item(backend, input, output, options)
            };

            if let Some(tx) = &progress {
                let event = match &result {
                    Ok(()) => BatchEvent::ItemSucceeded {
                        index: i + 1,
                        total,
                        input: input.clone(),
                        output: output.clone(),
                    },
                    Err(e) => BatchEvent::ItemFailed {
                        index: i + 1,
                        total,
                        input: input.clone(),
                        error: e.to_string(),
                    },
                };
                // Receiver gone just means nobody is watching
                tx.send(event).ok();
            }
            result
        })
        .collect();

    let items: Vec<ItemReport> = paths
        .iter()
        .zip(outputs)
        .zip(results)
        .map(|((input, output), result)| ItemReport {
            input: input.clone(),
            output,
            error: result.err().map(|e| e.to_string()),
        })
        .collect();
    let succeeded = items.iter().filter(|item| item.succeeded()).count();

    Ok(BatchReport {
        mode: options.mode,
        succeeded,
        total,
        items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use image::{Rgba, RgbaImage};
    use std::sync::mpsc;
    use tempfile::TempDir;

    fn single_pixel(r: u8, g: u8) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(1, 1, Rgba([r, g, 7, 42])))
    }

    // =========================================================================
    // reconstruct_image
    // =========================================================================

    #[test]
    fn reconstruct_known_pixels_standard() {
        // Reference values: truncate(standard_z(r/255, g/255) * 255)
        for (r, g, b) in [
            (128, 128, 254),
            (127, 127, 254),
            (255, 128, 127),
            (0, 0, 127),
            (200, 100, 228),
            (64, 192, 217),
        ] {
            let out = reconstruct_image(&single_pixel(r, g), ReconstructionMode::Standard);
            assert_eq!(out.get_pixel(0, 0).0, [r, g, b], "r={r} g={g}");
        }
    }

    #[test]
    fn reconstruct_known_pixels_alternate() {
        for (r, g, b) in [
            (128, 128, 254),
            (255, 128, 0),
            (0, 0, 0),
            (200, 100, 202),
            (64, 192, 179),
        ] {
            let out = reconstruct_image(&single_pixel(r, g), ReconstructionMode::Alternate);
            assert_eq!(out.get_pixel(0, 0).0, [r, g, b], "r={r} g={g}");
        }
    }

    #[test]
    fn reconstruct_keeps_dimensions_and_red_green() {
        let src = RgbaImage::from_fn(17, 5, |x, y| Rgba([(x * 15) as u8, (y * 50) as u8, 0, 0]));
        let out = reconstruct_image(
            &DynamicImage::ImageRgba8(src.clone()),
            ReconstructionMode::Standard,
        );

        assert_eq!(out.dimensions(), (17, 5));
        for (x, y, p) in out.enumerate_pixels() {
            let s = src.get_pixel(x, y);
            assert_eq!((p[0], p[1]), (s[0], s[1]));
        }
    }

    #[test]
    fn reconstruct_ignores_source_blue_and_alpha() {
        let a = DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 2, Rgba([90, 160, 0, 0])));
        let b = DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 2, Rgba([90, 160, 255, 255])));
        assert_eq!(
            reconstruct_image(&a, ReconstructionMode::Standard),
            reconstruct_image(&b, ReconstructionMode::Standard)
        );
    }

    #[test]
    fn reconstruct_accepts_rgb_and_gray_sources() {
        let rgb = DynamicImage::ImageRgb8(RgbImage::from_pixel(3, 2, Rgb([128, 128, 0])));
        let out = reconstruct_image(&rgb, ReconstructionMode::Standard);
        assert_eq!(out.get_pixel(2, 1).0, [128, 128, 254]);

        let gray = DynamicImage::ImageLuma8(image::GrayImage::from_pixel(3, 2, image::Luma([255])));
        let out = reconstruct_image(&gray, ReconstructionMode::Standard);
        assert_eq!(out.get_pixel(0, 0).0, [255, 255, 127]);
    }

    #[test]
    fn reconstruct_empty_image() {
        let empty = DynamicImage::ImageRgba8(RgbaImage::new(0, 0));
        let out = reconstruct_image(&empty, ReconstructionMode::Alternate);
        assert_eq!(out.dimensions(), (0, 0));
    }

    // =========================================================================
    // process / process_with_backend
    // =========================================================================

    #[test]
    fn process_empty_list_is_no_input() {
        let backend = MockBackend::new();
        let result = process_with_backend(&backend, &[], ReconstructionMode::Standard);
        assert!(matches!(result, Err(ProcessError::NoInputSelected)));
    }

    #[test]
    fn process_preserves_order_and_isolates_failures() {
        let backend = MockBackend::new()
            .with_image("/in/a.png", 4, 4, [128, 128, 0, 255])
            .with_image("/in/c.png", 2, 3, [255, 128, 0, 255]);
        let paths = vec![
            PathBuf::from("/in/a.png"),
            PathBuf::from("/in/b.png"),
            PathBuf::from("/in/c.png"),
        ];

        let results =
            process_with_backend(&backend, &paths, ReconstructionMode::Standard).unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().dimensions(), (4, 4));
        assert!(matches!(
            &results[1],
            Err(ProcessError::Decode { path, .. }) if path == Path::new("/in/b.png")
        ));
        let c = results[2].as_ref().unwrap();
        assert_eq!(c.dimensions(), (2, 3));
        assert_eq!(c.get_pixel(0, 0).0, [255, 128, 127]);
    }

    #[test]
    fn process_does_not_encode() {
        let backend = MockBackend::new().with_image("/in/a.png", 1, 1, [0, 0, 0, 255]);
        process_with_backend(
            &backend,
            &[PathBuf::from("/in/a.png")],
            ReconstructionMode::Alternate,
        )
        .unwrap();
        assert!(backend.encoded_outputs().is_empty());
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    #[test]
    fn dispatch_by_input_count() {
        assert!(matches!(
            Dispatch::from_paths(&[]),
            Err(ProcessError::NoInputSelected)
        ));

        let one = vec![PathBuf::from("a.png")];
        assert_eq!(
            Dispatch::from_paths(&one).unwrap(),
            Dispatch::Single(Path::new("a.png"))
        );

        let two = vec![PathBuf::from("a.png"), PathBuf::from("b.png")];
        assert_eq!(Dispatch::from_paths(&two).unwrap(), Dispatch::Batch(&two));
    }

    // =========================================================================
    // Session
    // =========================================================================

    #[test]
    fn session_save_before_process_is_no_result() {
        let backend = MockBackend::new();
        let session = Session::new();
        let result = session.save(&backend, Path::new("/out/x.png"), Quality::default());
        assert!(matches!(result, Err(ProcessError::NoProcessedResult)));
        assert!(backend.get_operations().is_empty());
    }

    #[test]
    fn session_process_requires_input() {
        let backend = MockBackend::new();
        let mut session = Session::new();
        let result = session.process(&backend, &[], ReconstructionMode::Standard);
        assert!(matches!(result, Err(ProcessError::NoInputSelected)));
    }

    #[test]
    fn session_failure_keeps_previous_result() {
        let backend = MockBackend::new().with_image("/in/good.png", 3, 3, [128, 128, 0, 255]);
        let mut session = Session::new();

        session
            .process(
                &backend,
                &[PathBuf::from("/in/good.png")],
                ReconstructionMode::Standard,
            )
            .unwrap();

        let result = session.process(
            &backend,
            &[PathBuf::from("/in/missing.png")],
            ReconstructionMode::Standard,
        );
        assert!(matches!(result, Err(ProcessError::Decode { .. })));

        let held = session.processed().unwrap();
        assert_eq!(held.dimensions(), (3, 3));
    }

    #[test]
    fn session_save_dispatches_on_extension() {
        let backend = MockBackend::new().with_image("/in/a.png", 2, 2, [128, 128, 0, 255]);
        let mut session = Session::new();
        session
            .process(
                &backend,
                &[PathBuf::from("/in/a.png")],
                ReconstructionMode::Standard,
            )
            .unwrap();

        for (path, expected) in [
            ("/out/a.jpg", OutputFormat::Jpeg),
            ("/out/a.JPEG", OutputFormat::Jpeg),
            ("/out/a.tga", OutputFormat::Tga),
            ("/out/a.png", OutputFormat::Png),
            ("/out/a.bmp", OutputFormat::Png),
            ("/out/a", OutputFormat::Png),
        ] {
            let format = session
                .save(&backend, Path::new(path), Quality::new(80))
                .unwrap();
            assert_eq!(format, expected, "{path}");
        }
    }

    #[test]
    fn session_save_failure_is_encode_error() {
        let backend = MockBackend::new()
            .with_image("/in/a.png", 2, 2, [128, 128, 0, 255])
            .failing_encode("/out/a.png");
        let mut session = Session::new();
        session
            .process(
                &backend,
                &[PathBuf::from("/in/a.png")],
                ReconstructionMode::Standard,
            )
            .unwrap();

        let result = session.save(&backend, Path::new("/out/a.png"), Quality::default());
        assert!(matches!(result, Err(ProcessError::Encode { .. })));
        assert!(session.processed().is_some());
    }

    #[test]
    fn session_clear_forgets_result() {
        let backend = MockBackend::new().with_image("/in/a.png", 1, 1, [0, 0, 0, 255]);
        let mut session = Session::new();
        session
            .process(
                &backend,
                &[PathBuf::from("/in/a.png")],
                ReconstructionMode::Standard,
            )
            .unwrap();
        session.clear();
        assert!(session.processed().is_none());
    }

    // =========================================================================
    // run_batch
    // =========================================================================

    fn batch_backend() -> MockBackend {
        MockBackend::new()
            .with_image("/in/a.png", 4, 4, [128, 128, 0, 255])
            .with_image("/in/b.tga", 8, 2, [200, 100, 0, 255])
            .with_image("/in/d.bmp", 1, 1, [0, 0, 0, 255])
    }

    fn batch_inputs() -> Vec<PathBuf> {
        ["/in/a.png", "/in/b.tga", "/in/c.jpg", "/in/d.bmp"]
            .iter()
            .map(PathBuf::from)
            .collect()
    }

    #[test]
    fn batch_counts_successes_and_names_outputs() {
        let tmp = TempDir::new().unwrap();
        let backend = batch_backend();
        let options = BatchOptions::new(tmp.path(), ReconstructionMode::Standard);

        let report = run_batch(&backend, &batch_inputs(), &options, None).unwrap();

        assert_eq!(report.total, 4);
        assert_eq!(report.succeeded, 3);
        assert_eq!(report.failed(), 1);

        let expected: Vec<String> = ["a", "b", "d"]
            .iter()
            .map(|s| {
                tmp.path()
                    .join(format!("{s}_processed.png"))
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();
        assert_eq!(backend.encoded_outputs(), expected);

        let failed: Vec<&ItemReport> = report.failures().collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].input, PathBuf::from("/in/c.jpg"));
    }

    #[test]
    fn batch_report_is_in_input_order() {
        let tmp = TempDir::new().unwrap();
        let options = BatchOptions::new(tmp.path(), ReconstructionMode::Alternate);
        let report = run_batch(&batch_backend(), &batch_inputs(), &options, None).unwrap();

        let inputs: Vec<&Path> = report.items.iter().map(|i| i.input.as_path()).collect();
        assert_eq!(
            inputs,
            vec![
                Path::new("/in/a.png"),
                Path::new("/in/b.tga"),
                Path::new("/in/c.jpg"),
                Path::new("/in/d.bmp"),
            ]
        );
        assert_eq!(report.mode, ReconstructionMode::Alternate);
        assert_eq!(
            report.items[1].output,
            tmp.path().join("b_processed.png")
        );
    }

    #[test]
    fn batch_uses_extension_format_and_quality() {
        let tmp = TempDir::new().unwrap();
        let backend = batch_backend();
        let options = BatchOptions {
            extension: ".jpg".to_string(),
            quality: Quality::new(70),
            ..BatchOptions::new(tmp.path(), ReconstructionMode::Standard)
        };

        run_batch(
            &backend,
            &[PathBuf::from("/in/b.tga")],
            &options,
            None,
        )
        .unwrap();

        let encodes: Vec<RecordedOp> = backend
            .get_operations()
            .into_iter()
            .filter(|op| matches!(op, RecordedOp::Encode { .. }))
            .collect();
        assert_eq!(
            encodes,
            vec![RecordedOp::Encode {
                output: tmp.path().join("b_processed.jpg").to_string_lossy().into_owned(),
                format: OutputFormat::Jpeg,
                quality: 70,
                width: 8,
                height: 2,
            }]
        );
    }

    #[test]
    fn batch_encode_failure_does_not_abort() {
        let tmp = TempDir::new().unwrap();
        let bad = tmp.path().join("a_processed.png");
        let backend = batch_backend().failing_encode(&bad.to_string_lossy());
        let options = BatchOptions::new(tmp.path(), ReconstructionMode::Standard);

        let report = run_batch(&backend, &batch_inputs(), &options, None).unwrap();

        assert_eq!(report.succeeded, 2);
        assert!(
            report.items[0]
                .error
                .as_deref()
                .is_some_and(|e| e.starts_with("Cannot write"))
        );
        assert!(report.items[1].succeeded());
        assert!(report.items[3].succeeded());
    }

    #[test]
    fn batch_colliding_outputs_fail_later_items() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::new()
            .with_image("/in/rock.png", 1, 1, [0, 0, 0, 255])
            .with_image("/in/rock.tga", 1, 1, [0, 0, 0, 255]);
        let options = BatchOptions::new(tmp.path(), ReconstructionMode::Standard);
        let inputs = vec![PathBuf::from("/in/rock.png"), PathBuf::from("/in/rock.tga")];

        let report = run_batch(&backend, &inputs, &options, None).unwrap();

        assert_eq!(report.succeeded, 1);
        assert!(report.items[0].succeeded());
        assert!(!report.items[1].succeeded());
        assert_eq!(backend.encoded_outputs().len(), 1);
    }

    #[test]
    fn batch_emits_one_event_per_item() {
        let tmp = TempDir::new().unwrap();
        let options = BatchOptions::new(tmp.path(), ReconstructionMode::Standard);
        let (tx, rx) = mpsc::channel();

        run_batch(&batch_backend(), &batch_inputs(), &options, Some(tx)).unwrap();

        let mut events: Vec<BatchEvent> = rx.iter().collect();
        assert_eq!(events.len(), 4);
        events.sort_by_key(|e| match e {
            BatchEvent::ItemSucceeded { index, .. } | BatchEvent::ItemFailed { index, .. } => {
                *index
            }
        });
        assert!(matches!(
            &events[0],
            BatchEvent::ItemSucceeded { index: 1, total: 4, .. }
        ));
        assert!(matches!(
            &events[2],
            BatchEvent::ItemFailed { index: 3, total: 4, input, .. } if input == Path::new("/in/c.jpg")
        ));
    }

    #[test]
    fn batch_empty_list_is_no_input() {
        let tmp = TempDir::new().unwrap();
        let options = BatchOptions::new(tmp.path(), ReconstructionMode::Standard);
        let result = run_batch(&MockBackend::new(), &[], &options, None);
        assert!(matches!(result, Err(ProcessError::NoInputSelected)));
    }

    #[test]
    fn batch_creates_output_directory() {
        let tmp = TempDir::new().unwrap();
        let out_dir = tmp.path().join("nested/out");
        let options = BatchOptions::new(&out_dir, ReconstructionMode::Standard);

        run_batch(&batch_backend(), &batch_inputs(), &options, None).unwrap();
        assert!(out_dir.is_dir());
    }

    #[test]
    fn batch_report_serializes_errors_only_for_failures() {
        let tmp = TempDir::new().unwrap();
        let options = BatchOptions::new(tmp.path(), ReconstructionMode::Standard);
        let report = run_batch(&batch_backend(), &batch_inputs(), &options, None).unwrap();

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["mode"], "standard");
        assert_eq!(json["succeeded"], 3);
        assert_eq!(json["total"], 4);
        assert!(json["items"][0].get("error").is_none());
        assert!(json["items"][2]["error"].is_string());
    }
}
