//! # normal-z
//!
//! Rebuilds the Z (blue) channel of tangent-space normal maps from the X
//! (red) and Y (green) channels. Useful for textures exported with two-channel
//! compression (BC5/ATI2, or packed with something else in blue), for
//! textures whose blue channel was damaged by editing, and for verifying that
//! a normal map is actually unit length.
//!
//! # Pipeline
//!
//! ```text
//! input paths ──► decode ──► R, G ──► reconstruct B ──► RGB ──► hold (single)
//!                                                           └─► write (batch)
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`reconstruct`] | Per-pixel Z math: Standard and Alternate formulas, 8-bit conversion |
//! | [`process`] | Per-image transform, single-image [`Session`](process::Session), batch runner |
//! | [`imaging`] | Decode/encode seam: [`ImageBackend`](imaging::ImageBackend), `image`-crate backend, output format dispatch |
//! | [`naming`] | `<stem>_processed.<ext>` output path derivation |
//! | [`scan`] | Expands files and directories into batch inputs |
//! | [`config`] | Optional TOML config layered over stock defaults |
//! | [`output`] | CLI output formatting for single and batch runs |
//!
//! # Design Decisions
//!
//! ## Two Formulas, Kept Distinct
//!
//! Standard reconstruction renormalizes the vector and stores `(z + 1) / 2`.
//! Alternate stores `sqrt(max(1 - x² - y², 0))` without the remap. The two
//! disagree for every non-flat normal; textures exist that were baked with
//! each, so both are exposed and neither is "corrected" into the other. See
//! [`reconstruct`] for the exact math.
//!
//! ## Stateless Processing
//!
//! Processing functions take their inputs and mode explicitly and return
//! results. The only state, the one processed image held between "process"
//! and "save" in the single-image flow, lives in a caller-owned
//! [`Session`](process::Session).
//!
//! ## Failures Don't Stop a Batch
//!
//! Every batch item is independent. A file that won't decode or can't be
//! written is recorded in the [`BatchReport`](process::BatchReport) and the
//! rest of the batch carries on; the caller gets the full tally.

pub mod config;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod process;
pub mod reconstruct;
pub mod scan;

#[cfg(test)]
pub(crate) mod test_helpers;
