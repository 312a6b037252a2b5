//! Texture and color descriptors
//!
//! Texture compares harmonic and percussive energy after HPSS; color buckets
//! the mean spectral centroid. Both look at the opening window only.

use crate::dsp::{hpss::hpss, rms, spectral_centroid, stft};
use crate::error::{MixprepError, Result};
use crate::types::{AudioBuffer, Color, Texture, Timbre};
use tracing::{debug, warn};

/// Seconds of audio examined from the start of the track
pub const TIMBRE_WINDOW_SECS: f64 = 30.0;

/// Classify texture and color, falling back to (Balanced, Warm) on failure
pub fn classify(buffer: &AudioBuffer) -> Timbre {
    match try_classify(buffer) {
        Ok(timbre) => timbre,
        Err(e) => {
            warn!("Timbre classification failed, using defaults: {}", e);
            Timbre::default()
        }
    }
}

/// Classify texture and color
pub fn try_classify(buffer: &AudioBuffer) -> Result<Timbre> {
    let window = buffer.head(TIMBRE_WINDOW_SECS);
    if window.is_empty() {
        return Err(MixprepError::analysis("Timbre classification", "empty audio window"));
    }

    let spec = stft(&window.samples, window.sample_rate);
    let centroids = spectral_centroid(&spec);
    let mean_centroid = mean(&centroids);
    if mean_centroid <= 0.0 {
        return Err(MixprepError::analysis("Timbre classification", "no spectral energy"));
    }

    let split = hpss(&window.samples, window.sample_rate);
    let harmonic_energy = mean(&rms(&split.harmonic));
    let percussive_energy = mean(&rms(&split.percussive));

    let texture = texture_from_energy(harmonic_energy, percussive_energy);
    let color = color_from_centroid(mean_centroid);

    debug!(
        "Timbre: harmonic {:.4}, percussive {:.4}, centroid {:.0} Hz -> {} {}",
        harmonic_energy, percussive_energy, mean_centroid, texture, color
    );

    Ok(Timbre { texture, color })
}

fn texture_from_energy(harmonic: f64, percussive: f64) -> Texture {
    if percussive > harmonic * 1.5 {
        Texture::Rhythmic
    } else if harmonic > percussive * 1.2 {
        Texture::Melodic
    } else {
        Texture::Balanced
    }
}

fn color_from_centroid(centroid: f64) -> Color {
    match centroid {
        c if c < 1500.0 => Color::Deep,
        c if c < 2500.0 => Color::Warm,
        c if c < 3500.0 => Color::Crisp,
        _ => Color::Bright,
    }
}

fn mean(values: &[f32]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().map(|&v| v as f64).sum::<f64>() / values.len() as f64
}
