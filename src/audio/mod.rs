//! Audio I/O: symphonia decoding and hound WAV output

pub mod decoder;

pub use decoder::{decode, TARGET_SAMPLE_RATE};

use crate::error::{MixprepError, Result};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::path::Path;

/// Write mono samples as a 16-bit PCM WAV file
///
/// Samples are clamped to [-1.0, 1.0] before quantization.
pub fn write_wav_mono(path: &Path, samples: &[f32], sample_rate: u32) -> Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let to_output_error = |e: hound::Error| match e {
        hound::Error::IoError(io) => MixprepError::output_error(path, io),
        other => MixprepError::OutputError {
            path: path.to_path_buf(),
            reason: other.to_string(),
        },
    };

    let mut writer = WavWriter::create(path, spec).map_err(to_output_error)?;
    for &sample in samples {
        let quantized = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        writer.write_sample(quantized).map_err(to_output_error)?;
    }
    writer.finalize().map_err(to_output_error)?;

    Ok(())
}
