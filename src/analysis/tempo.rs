//! Tempo and key estimation from the onset envelope
//!
//! Tempo is the autocorrelation peak of the onset-strength envelope inside
//! 30-320 BPM, weighted by a log-normal prior centered on 120 BPM. Only a
//! single estimate is produced: half/double-tempo ambiguity is not resolved.

use crate::analysis::key::detect_key;
use crate::analysis::traits::{TempoKey, TempoKeyEstimator};
use crate::dsp::{moving_average_same, onset_strength, stft, HOP_LENGTH};
use crate::error::{MixprepError, Result};
use crate::types::AudioBuffer;
use tracing::debug;

/// Tempo search range in BPM
pub const MIN_BPM: f64 = 30.0;
pub const MAX_BPM: f64 = 320.0;

/// Center of the tempo prior
const PRIOR_BPM: f64 = 120.0;

/// Prior width in octaves
const PRIOR_STD_OCTAVES: f64 = 1.0;

/// Frames of pre-smoothing applied to the onset envelope
const ENVELOPE_SMOOTHING: usize = 3;

/// Built-in DSP estimator
#[derive(Debug, Default, Clone, Copy)]
pub struct OnsetTempoEstimator;

impl OnsetTempoEstimator {
    pub fn new() -> Self {
        Self
    }
}

impl TempoKeyEstimator for OnsetTempoEstimator {
    fn estimate(&self, buffer: &AudioBuffer) -> Result<TempoKey> {
        if buffer.is_empty() || buffer.sample_rate == 0 {
            return Err(MixprepError::analysis("BPM/Key detection", "empty audio buffer"));
        }

        let spec = stft(&buffer.samples, buffer.sample_rate);
        let envelope = onset_strength(&spec);
        let bpm = estimate_tempo(&envelope, buffer.sample_rate);
        let key = detect_key(&spec);

        debug!("Tempo {:.2} BPM, key {}", bpm, key);
        Ok(TempoKey { bpm, key })
    }

    fn name(&self) -> &'static str {
        "onset-autocorrelation"
    }
}

/// Dominant tempo of an onset envelope in BPM
///
/// Returns 0.0 when the envelope carries no periodic energy.
pub fn estimate_tempo(envelope: &[f32], sample_rate: u32) -> f64 {
    let frame_rate = sample_rate as f64 / HOP_LENGTH as f64;
    if envelope.len() < 2 || frame_rate <= 0.0 {
        return 0.0;
    }

    let smoothed = moving_average_same(envelope, ENVELOPE_SMOOTHING);
    let mean = smoothed.iter().map(|&v| v as f64).sum::<f64>() / smoothed.len() as f64;
    let centered: Vec<f64> = smoothed.iter().map(|&v| v as f64 - mean).collect();

    let energy: f64 = centered.iter().map(|v| v * v).sum();
    if energy <= f64::EPSILON {
        return 0.0;
    }

    let min_lag = ((60.0 * frame_rate / MAX_BPM).floor() as usize).max(1);
    let max_lag = ((60.0 * frame_rate / MIN_BPM).ceil() as usize).min(centered.len() - 1);
    if min_lag >= max_lag {
        return 0.0;
    }

    // Weighted autocorrelation, indexed by lag (padded by one on each side
    // for peak interpolation)
    let lo = min_lag.saturating_sub(1).max(1);
    let hi = (max_lag + 1).min(centered.len() - 1);
    let scores: Vec<f64> = (lo..=hi)
        .map(|lag| {
            let ac: f64 = centered
                .iter()
                .zip(centered[lag..].iter())
                .map(|(a, b)| a * b)
                .sum();
            ac / energy * tempo_prior(60.0 * frame_rate / lag as f64)
        })
        .collect();

    let (best_offset, best_score) = scores
        .iter()
        .enumerate()
        .filter(|(i, _)| (min_lag..=max_lag).contains(&(lo + i)))
        .fold((0usize, f64::NEG_INFINITY), |(bi, bs), (i, &s)| {
            if s > bs {
                (i, s)
            } else {
                (bi, bs)
            }
        });

    if !best_score.is_finite() || best_score <= 0.0 {
        return 0.0;
    }

    let lag = lo as f64 + best_offset as f64 + parabolic_offset(&scores, best_offset);
    60.0 * frame_rate / lag
}

/// Log-normal tempo prior
fn tempo_prior(bpm: f64) -> f64 {
    let octaves = (bpm / PRIOR_BPM).log2() / PRIOR_STD_OCTAVES;
    (-0.5 * octaves * octaves).exp()
}

/// Sub-sample offset of a peak from its two neighbours
fn parabolic_offset(values: &[f64], peak: usize) -> f64 {
    if peak == 0 || peak + 1 >= values.len() {
        return 0.0;
    }
    let (y0, y1, y2) = (values[peak - 1], values[peak], values[peak + 1]);
    let denom = y0 - 2.0 * y1 + y2;
    if denom.abs() < 1e-12 {
        return 0.0;
    }
    (0.5 * (y0 - y2) / denom).clamp(-0.5, 0.5)
}
