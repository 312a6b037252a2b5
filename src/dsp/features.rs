//! Frame-level features over the centered STFT grid
//!
//! Every function here returns one value per frame, aligned with
//! [`super::stft::stft`] so envelopes can be combined element-wise.

use super::stft::{num_frames, Spectrogram, HOP_LENGTH, N_FFT};

/// Lowest frequency mapped into the chromagram (A0)
const CHROMA_MIN_FREQ: f32 = 27.5;

/// Highest frequency mapped into the chromagram (C8)
const CHROMA_MAX_FREQ: f32 = 4186.0;

/// Dynamic range kept by the log-power spectrogram
const TOP_DB: f32 = 80.0;

/// Root-mean-square energy per centered frame
pub fn rms(samples: &[f32]) -> Vec<f32> {
    let pad = (N_FFT / 2) as isize;
    (0..num_frames(samples.len()))
        .map(|t| {
            let start = (t * HOP_LENGTH) as isize - pad;
            let lo = start.max(0) as usize;
            let hi = ((start + N_FFT as isize).max(0) as usize).min(samples.len());
            let energy: f32 = if lo < hi {
                samples[lo..hi].iter().map(|s| s * s).sum()
            } else {
                0.0
            };
            (energy / N_FFT as f32).sqrt()
        })
        .collect()
}

/// Onset strength as positive spectral flux of the log-power spectrogram
///
/// Frame 0 has no predecessor and is 0.
pub fn onset_strength(spec: &Spectrogram) -> Vec<f32> {
    let log_power: Vec<Vec<f32>> = {
        let raw: Vec<Vec<f32>> = spec
            .frames
            .iter()
            .map(|frame| {
                frame
                    .iter()
                    .map(|c| 10.0 * c.norm_sqr().max(1e-10).log10())
                    .collect()
            })
            .collect();
        let peak = raw
            .iter()
            .flat_map(|f| f.iter().copied())
            .fold(f32::NEG_INFINITY, f32::max);
        let floor = peak - TOP_DB;
        raw.into_iter()
            .map(|f| f.into_iter().map(|v| v.max(floor)).collect())
            .collect()
    };

    let mut envelope = Vec::with_capacity(log_power.len());
    envelope.push(0.0);
    for pair in log_power.windows(2) {
        let (prev, cur) = (&pair[0], &pair[1]);
        let flux: f32 = cur
            .iter()
            .zip(prev.iter())
            .map(|(c, p)| (c - p).max(0.0))
            .sum();
        envelope.push(flux / cur.len().max(1) as f32);
    }
    envelope.truncate(log_power.len());
    envelope
}

/// Magnitude-weighted mean frequency per frame (0 for silent frames)
pub fn spectral_centroid(spec: &Spectrogram) -> Vec<f32> {
    spec.frames
        .iter()
        .map(|frame| {
            let mut weighted = 0.0f64;
            let mut total = 0.0f64;
            for (bin, c) in frame.iter().enumerate() {
                let mag = c.norm() as f64;
                weighted += spec.bin_frequency(bin) as f64 * mag;
                total += mag;
            }
            if total > 0.0 {
                (weighted / total) as f32
            } else {
                0.0
            }
        })
        .collect()
}

/// Time-averaged chroma profile, C first
///
/// Each frame's pitch-class energies are scaled so the loudest class is 1
/// before averaging, so loud passages do not dominate the profile.
pub fn mean_chroma(spec: &Spectrogram) -> [f64; 12] {
    let bin_to_pitch_class: Vec<Option<usize>> = (0..spec.frames.first().map_or(0, Vec::len))
        .map(|bin| {
            let freq = spec.bin_frequency(bin);
            if !(CHROMA_MIN_FREQ..=CHROMA_MAX_FREQ).contains(&freq) {
                return None;
            }
            let semitones_from_a = 12.0 * (freq / 440.0).log2();
            Some((((semitones_from_a.round() as i32 + 9) % 12 + 12) % 12) as usize)
        })
        .collect();

    let mut profile = [0.0f64; 12];
    let mut counted = 0usize;

    for frame in &spec.frames {
        let mut chroma = [0.0f64; 12];
        for (bin, pc) in bin_to_pitch_class.iter().enumerate() {
            if let Some(pc) = pc {
                chroma[*pc] += frame[bin].norm_sqr() as f64;
            }
        }
        let max = chroma.iter().copied().fold(0.0, f64::max);
        if max > 0.0 {
            for (acc, v) in profile.iter_mut().zip(chroma.iter()) {
                *acc += v / max;
            }
        }
        counted += 1;
    }

    if counted > 0 {
        for v in profile.iter_mut() {
            *v /= counted as f64;
        }
    }
    profile
}
