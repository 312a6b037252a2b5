//! Kick/hats split of the drum stem
//!
//! A 4th-order Butterworth low-pass at 150 Hz keeps the kick; the matching
//! high-pass keeps hats and the rest of the kit.

use crate::analysis::stems::separator::stem_path;
use crate::audio::{decode, write_wav_mono};
use crate::dsp::{butterworth4, FilterKind};
use crate::error::{MixprepError, Result};
use crate::types::{AudioBuffer, StemName};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Crossover between kick and hats
pub const CROSSOVER_HZ: f64 = 150.0;

/// Low and high bands of a drum signal
#[derive(Debug, Clone)]
pub struct DrumSplit {
    pub kick: Vec<f32>,
    pub hats: Vec<f32>,
}

/// Split a drum signal into kick and hats
///
/// `None` when the sample rate cannot carry the crossover.
pub fn split_drums(drums: &AudioBuffer) -> Option<DrumSplit> {
    let kick = butterworth4(&drums.samples, drums.sample_rate, CROSSOVER_HZ, FilterKind::LowPass)?;
    let hats = butterworth4(&drums.samples, drums.sample_rate, CROSSOVER_HZ, FilterKind::HighPass)?;
    Some(DrumSplit { kick, hats })
}

/// Decode the drum stem, split it and write `<base>_kick.wav` / `<base>_hats.wav`
///
/// Returns the kick and hats paths.
pub fn split_drum_stem(drum_stem: &Path, output_dir: &Path, base_name: &str) -> Result<(PathBuf, PathBuf)> {
    let drums = decode(drum_stem, None)?;
    let split = split_drums(&drums).ok_or_else(|| {
        MixprepError::analysis(
            "Drum split",
            format!("cannot filter at {} Hz sample rate", drums.sample_rate),
        )
    })?;

    let kick_path = stem_path(output_dir, base_name, StemName::Kick);
    let hats_path = stem_path(output_dir, base_name, StemName::Hats);
    write_wav_mono(&kick_path, &split.kick, drums.sample_rate)?;
    write_wav_mono(&hats_path, &split.hats, drums.sample_rate)?;

    debug!("Drum split written to {} / {}", kick_path.display(), hats_path.display());
    Ok((kick_path, hats_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SR: u32 = 22050;

    fn tone(freq: f32) -> Vec<f32> {
        (0..SR as usize)
            .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / SR as f32).sin() * 0.5)
            .collect()
    }

    fn energy(samples: &[f32]) -> f32 {
        samples[samples.len() / 2..].iter().map(|s| s * s).sum()
    }

    #[test]
    fn test_split_separates_bands() {
        let mixed: Vec<f32> = tone(50.0).iter().zip(tone(5000.0)).map(|(a, b)| a + b).collect();
        let split = split_drums(&AudioBuffer::new(mixed, SR)).unwrap();
        let low_only = energy(&tone(50.0));
        let high_only = energy(&tone(5000.0));
        assert!((energy(&split.kick) - low_only).abs() / low_only < 0.1);
        assert!((energy(&split.hats) - high_only).abs() / high_only < 0.1);
    }

    #[test]
    fn test_zero_sample_rate_is_none() {
        assert!(split_drums(&AudioBuffer::new(vec![0.0; 100], 0)).is_none());
    }

    #[test]
    fn test_split_drum_stem_writes_files() {
        let dir = TempDir::new().unwrap();
        let drum_path = dir.path().join("song_drums.wav");
        write_wav_mono(&drum_path, &tone(80.0), SR).unwrap();

        let (kick, hats) = split_drum_stem(&drum_path, dir.path(), "song").unwrap();
        assert_eq!(kick, dir.path().join("song_kick.wav"));
        assert_eq!(hats, dir.path().join("song_hats.wav"));
        assert!(kick.exists() && hats.exists());
    }

    #[test]
    fn test_unreadable_drum_stem_is_error() {
        let dir = TempDir::new().unwrap();
        let bogus = dir.path().join("song_drums.wav");
        std::fs::write(&bogus, b"not audio").unwrap();
        assert!(split_drum_stem(&bogus, dir.path(), "song").is_err());
    }
}
