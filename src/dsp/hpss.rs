//! Harmonic/percussive source separation by median filtering
//!
//! Harmonic energy is smooth along time, percussive energy is smooth along
//! frequency. Median-filtering the magnitude spectrogram in each direction
//! gives two estimates that become soft Wiener-style masks.

use super::stft::{istft, stft, Spectrogram};
use rayon::prelude::*;

/// Median filter length in frames (harmonic) and bins (percussive)
pub const KERNEL_SIZE: usize = 31;

/// Exponent applied to both estimates when building the soft masks
const MASK_POWER: i32 = 2;

/// Harmonic and percussive time-domain components
#[derive(Debug, Clone)]
pub struct HpssOutput {
    pub harmonic: Vec<f32>,
    pub percussive: Vec<f32>,
}

/// Split a mono signal into harmonic and percussive components
///
/// Both outputs have the same length as the input.
pub fn hpss(samples: &[f32], sample_rate: u32) -> HpssOutput {
    let spec = stft(samples, sample_rate);
    let (harmonic, percussive) = split_spectrogram(&spec);
    HpssOutput {
        harmonic: istft(&harmonic, samples.len()),
        percussive: istft(&percussive, samples.len()),
    }
}

/// Harmonic component only
pub fn harmonic(samples: &[f32], sample_rate: u32) -> Vec<f32> {
    let spec = stft(samples, sample_rate);
    let (harmonic, _) = split_spectrogram(&spec);
    istft(&harmonic, samples.len())
}

/// Apply the soft masks to a complex spectrogram
pub fn split_spectrogram(spec: &Spectrogram) -> (Spectrogram, Spectrogram) {
    let mags = spec.magnitudes();
    let num_frames = mags.len();
    let num_bins = mags.first().map_or(0, Vec::len);

    // Along time, one bin at a time: result is [bin][t]
    let harmonic_by_bin: Vec<Vec<f32>> = (0..num_bins)
        .into_par_iter()
        .map(|bin| {
            let track: Vec<f32> = mags.iter().map(|frame| frame[bin]).collect();
            median_filter(&track, KERNEL_SIZE)
        })
        .collect();

    // Along frequency, one frame at a time: result is [t][bin]
    let percussive: Vec<Vec<f32>> = mags
        .par_iter()
        .map(|frame| median_filter(frame, KERNEL_SIZE))
        .collect();

    let mut harmonic_frames = Vec::with_capacity(num_frames);
    let mut percussive_frames = Vec::with_capacity(num_frames);

    for (t, frame) in spec.frames.iter().enumerate() {
        let mut h_frame = Vec::with_capacity(num_bins);
        let mut p_frame = Vec::with_capacity(num_bins);
        for (bin, &value) in frame.iter().enumerate() {
            let h = harmonic_by_bin[bin][t].powi(MASK_POWER);
            let p = percussive[t][bin].powi(MASK_POWER);
            let total = h + p;
            let (mask_h, mask_p) = if total > f32::EPSILON {
                (h / total, p / total)
            } else {
                (0.0, 0.0)
            };
            h_frame.push(value * mask_h);
            p_frame.push(value * mask_p);
        }
        harmonic_frames.push(h_frame);
        percussive_frames.push(p_frame);
    }

    (
        Spectrogram {
            frames: harmonic_frames,
            sample_rate: spec.sample_rate,
        },
        Spectrogram {
            frames: percussive_frames,
            sample_rate: spec.sample_rate,
        },
    )
}

/// Sliding median with a window centered on each sample, shrunk at the edges
fn median_filter(values: &[f32], kernel: usize) -> Vec<f32> {
    let half = kernel / 2;
    let mut window: Vec<f32> = Vec::with_capacity(kernel);
    (0..values.len())
        .map(|i| {
            let lo = i.saturating_sub(half);
            let hi = (i + half + 1).min(values.len());
            window.clear();
            window.extend_from_slice(&values[lo..hi]);
            let mid = window.len() / 2;
            let (_, median, _) = window.select_nth_unstable_by(mid, f32::total_cmp);
            *median
        })
        .collect()
}
