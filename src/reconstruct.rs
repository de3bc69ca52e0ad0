//! Per-pixel Z reconstruction for tangent-space normal maps.
//!
//! A tangent-space normal is a unit vector `(x, y, z)` stored in an 8-bit
//! image as `(x + 1) / 2` per channel. Because the vector is unit length,
//! `z` is fully determined by `x` and `y` (up to sign, and tangent-space
//! normals always point out of the surface, so `z >= 0`). This module
//! recovers it.
//!
//! Two formulas are available, selected by [`ReconstructionMode`]:
//!
//! | Mode | Formula | Output range |
//! |---|---|---|
//! | `Standard` | `z = sqrt(1 - clamp(x² + y², 0, 1))`, renormalized | `(z + 1) / 2` |
//! | `Alternate` | `z = sqrt(max(1 - x² - y², 0))` | `z` as-is |
//!
//! The Alternate output is **not** remapped through `(z + 1) / 2`. For a flat
//! normal both modes give `1.0`, but a normal lying in the tangent plane comes
//! out as `0.5` in Standard and `0.0` in Alternate. Existing textures have been
//! baked with both, so the asymmetry is kept as-is.
//!
//! All math is done in `f64`. Conversion back to 8-bit truncates (see
//! [`to_channel`]).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which formula computes the blue channel from red and green.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReconstructionMode {
    /// Renormalized reconstruction, remapped to `[0, 1]` storage range.
    #[default]
    Standard,
    /// Direct reconstruction without renormalization or remap.
    Alternate,
}

impl ReconstructionMode {
    /// Reconstruct the stored blue value for a single `(r, g)` sample.
    pub fn reconstruct(self, r: f64, g: f64) -> f64 {
        match self {
            Self::Standard => standard_z(r, g),
            Self::Alternate => alternate_z(r, g),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Alternate => "alternate",
        }
    }
}

impl fmt::Display for ReconstructionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReconstructionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "alternate" => Ok(Self::Alternate),
            other => Err(format!(
                "unknown reconstruction mode '{other}' (expected 'standard' or 'alternate')"
            )),
        }
    }
}

/// Map a `[0, 1]` storage value to the signed `[-1, 1]` range.
#[inline]
fn to_signed(v: f64) -> f64 {
    v * 2.0 - 1.0
}

/// The full renormalized normal `(x, y, z)` for a sample, in signed range.
///
/// `z` is computed from the clamped radicand, then the whole vector is
/// divided by its length. The length is never zero: below the unit circle it
/// is 1, on or beyond it `z` is 0 and the length is `sqrt(x² + y²) >= 1`.
pub fn standard_normal(r: f64, g: f64) -> [f64; 3] {
    let x = to_signed(r);
    let y = to_signed(g);
    let z = (1.0 - (x * x + y * y).clamp(0.0, 1.0)).sqrt();

    let norm = (x * x + y * y + z * z).sqrt();
    [x / norm, y / norm, z / norm]
}

/// Standard reconstruction: renormalized `z`, remapped to `[0, 1]`.
#[inline]
pub fn standard_z(r: f64, g: f64) -> f64 {
    let [_, _, z] = standard_normal(r, g);
    (z + 1.0) * 0.5
}

/// Alternate reconstruction: `sqrt(max(1 - x² - y², 0))`, returned unmapped.
#[inline]
pub fn alternate_z(r: f64, g: f64) -> f64 {
    let sx = to_signed(r);
    let sy = to_signed(g);
    let mr = sx * sx;
    let mg = sy * sy;
    (1.0 - mr - mg).max(0.0).sqrt()
}

/// Reconstruct a whole blue plane from red and green planes.
///
/// Each output element equals `mode.reconstruct(r[i], g[i])`. Planes of
/// different lengths produce an output as long as the shorter one.
pub fn reconstruct_plane(r: &[f64], g: &[f64], mode: ReconstructionMode) -> Vec<f64> {
    match mode {
        ReconstructionMode::Standard => r.iter().zip(g).map(|(&r, &g)| standard_z(r, g)).collect(),
        ReconstructionMode::Alternate => {
            r.iter().zip(g).map(|(&r, &g)| alternate_z(r, g)).collect()
        }
    }
}

/// Normalize an 8-bit channel value to `[0, 1]`.
#[inline]
pub fn from_channel(v: u8) -> f64 {
    v as f64 / 255.0
}

/// Convert a `[0, 1]` value back to 8-bit by truncation, clamped to `0..=255`.
///
/// Truncation (not rounding) keeps output byte-identical to textures produced
/// by existing tooling: `0.999 * 255 = 254.7` stores as 254.
#[inline]
pub fn to_channel(v: f64) -> u8 {
    // `as` saturates on overflow and maps NaN to 0
    (v * 255.0).clamp(0.0, 255.0) as u8
}
