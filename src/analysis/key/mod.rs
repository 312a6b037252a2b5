//! Key detection by template correlation
//!
//! The time-averaged chroma profile is correlated against binary major and
//! minor scale templates at all 12 rotations. The best (template, rotation)
//! pair names the root and mode.

pub mod camelot;

use crate::dsp::{mean_chroma, Spectrogram};
use crate::error::{MixprepError, Result};
use crate::types::{Mode, PitchClass};
use tracing::{debug, warn};

/// Key reported when detection fails
pub const FALLBACK_KEY: &str = "12A";

/// Scale degrees of the major scale, tonic first
const MAJOR_TEMPLATE: [f64; 12] = [1.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0];

/// Scale degrees of the natural minor scale, tonic first
const MINOR_TEMPLATE: [f64; 12] = [1.0, 0.0, 1.0, 1.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0, 0.0];

/// Detect the key of a spectrogram as Camelot notation
///
/// Never fails: any internal failure is logged and reported as [`FALLBACK_KEY`].
pub fn detect_key(spec: &Spectrogram) -> String {
    match estimate_key(spec) {
        Ok((pitch, mode)) => {
            let code = camelot::to_camelot(pitch, mode);
            debug!("Key: {} {:?} -> {}", pitch.to_standard_notation(), mode, code);
            code
        }
        Err(e) => {
            warn!("Key detection failed, using {}: {}", FALLBACK_KEY, e);
            FALLBACK_KEY.to_string()
        }
    }
}

/// Root and mode with the best template correlation
pub fn estimate_key(spec: &Spectrogram) -> Result<(PitchClass, Mode)> {
    let chroma = mean_chroma(spec);
    match_templates(&chroma)
}

fn match_templates(chroma: &[f64; 12]) -> Result<(PitchClass, Mode)> {
    let major: Vec<f64> = (0..12)
        .map(|root| pearson_correlation(chroma, &MAJOR_TEMPLATE, root))
        .collect::<Result<_>>()?;
    let minor: Vec<f64> = (0..12)
        .map(|root| pearson_correlation(chroma, &MINOR_TEMPLATE, root))
        .collect::<Result<_>>()?;

    let (major_root, major_best) = argmax(&major);
    let (minor_root, minor_best) = argmax(&minor);

    // Exact ties go to minor
    if major_best > minor_best {
        Ok((PitchClass::from_index(major_root), Mode::Major))
    } else {
        Ok((PitchClass::from_index(minor_root), Mode::Minor))
    }
}

/// First index of the maximum value
fn argmax(values: &[f64]) -> (usize, f64) {
    values
        .iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |(best_i, best), (i, &v)| {
            if v > best {
                (i, v)
            } else {
                (best_i, best)
            }
        })
}

/// Pearson correlation between the chroma and a template rotated to `root`
///
/// Rotation puts the template's tonic on pitch class `root`. Sums run in
/// pitch-class order so relative major/minor pairs, which cover the same
/// pitch set, score exactly equal.
fn pearson_correlation(chroma: &[f64; 12], template: &[f64; 12], root: usize) -> Result<f64> {
    let n = 12.0;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_x2 = 0.0;
    let mut sum_y2 = 0.0;

    for (pc, &x) in chroma.iter().enumerate() {
        let y = template[(pc + 12 - root) % 12];
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_x2 += x * x;
        sum_y2 += y * y;
    }

    let numerator = n * sum_xy - sum_x * sum_y;
    let denominator = ((n * sum_x2 - sum_x * sum_x) * (n * sum_y2 - sum_y * sum_y)).sqrt();

    if !denominator.is_finite() || denominator < 1e-12 {
        return Err(MixprepError::analysis(
            "Key detection",
            "chroma profile has no variance",
        ));
    }
    Ok(numerator / denominator)
}
