//! Structural landmarks: drop, intro end, outro start

use crate::dsp::{frame_to_time, moving_average_same, onset_strength, rms, stft, window_frames};
use crate::error::{MixprepError, Result};
use crate::types::{AudioBuffer, MixPoints, UNDETECTED_TIME};
use tracing::debug;

/// Seconds skipped before searching for the drop
pub const DROP_SKIP_SECS: f64 = 30.0;

/// Smoothing window for energy curves
pub const SMOOTHING_SECS: f64 = 2.0;

/// Longest intro/outro window examined
pub const MIX_WINDOW_MAX_SECS: f64 = 45.0;

const INTRO_THRESHOLD: f32 = 0.6;
const OUTRO_THRESHOLD: f32 = 0.4;

/// Format seconds as zero-padded `mm:ss`
pub fn format_time(seconds: f64) -> String {
    let total = seconds.max(0.0);
    let minutes = (total / 60.0).floor() as u64;
    let secs = (total % 60.0).floor() as u64;
    format!("{:02}:{:02}", minutes, secs)
}

/// Parse `mm:ss` back to whole seconds
pub fn parse_time(value: &str) -> Option<u64> {
    let (minutes, seconds) = value.split_once(':')?;
    let minutes: u64 = minutes.trim().parse().ok()?;
    let seconds: u64 = seconds.trim().parse().ok()?;
    Some(minutes * 60 + seconds)
}

/// Time of peak smoothed onset×RMS energy after the intro
///
/// `None` when the track is no longer than the skipped intro.
pub fn detect_drop(buffer: &AudioBuffer) -> Option<f64> {
    let sr = buffer.sample_rate;
    let spec = stft(&buffer.samples, sr);
    let onset = onset_strength(&spec);
    let energy_rms = rms(&buffer.samples);

    let energy: Vec<f32> = onset
        .iter()
        .zip(energy_rms.iter().chain(std::iter::repeat(&0.0)))
        .map(|(o, r)| o * r)
        .collect();

    let smoothed = moving_average_same(&energy, window_frames(SMOOTHING_SECS, sr));
    let skip = window_frames(DROP_SKIP_SECS, sr);
    if smoothed.len() <= skip {
        return None;
    }

    let (offset, _) = smoothed[skip..]
        .iter()
        .enumerate()
        .fold((0usize, f32::NEG_INFINITY), |(bi, bv), (i, &v)| {
            if v > bv {
                (i, v)
            } else {
                (bi, bv)
            }
        });

    let time = frame_to_time(skip + offset, sr);
    debug!("Drop at {:.2}s", time);
    Some(time)
}

/// Intro-end and outro-start from RMS thresholds
///
/// Both windows span `min(45 s, duration / 4)`; the outro window is cut from
/// the end of `buffer` and placed on the absolute timeline.
pub fn find_mix_points(buffer: &AudioBuffer) -> Result<MixPoints> {
    if buffer.sample_rate == 0 {
        return Err(MixprepError::analysis("Mix point detection", "invalid sample rate"));
    }

    let duration = buffer.duration;
    let window_secs = MIX_WINDOW_MAX_SECS.min(duration / 4.0);
    let mut points = MixPoints::default();

    let intro = buffer.head(window_secs);
    if !intro.is_empty() {
        let envelope = rms(&intro.samples);
        let threshold = peak(&envelope) * INTRO_THRESHOLD;
        if let Some(frame) = envelope.iter().position(|&v| v > threshold) {
            points.intro_end = format_time(frame_to_time(frame, buffer.sample_rate));
        }
    }

    let outro = buffer.tail(window_secs);
    if !outro.is_empty() {
        let envelope = rms(&outro.samples);
        let threshold = peak(&envelope) * OUTRO_THRESHOLD;
        if let Some(frame) = envelope.iter().rposition(|&v| v > threshold) {
            let start_offset = duration - window_secs;
            points.outro_start = format_time(start_offset + frame_to_time(frame, buffer.sample_rate));
        }
    }

    debug!(
        "Mix points: intro end {}, outro start {}",
        points.intro_end, points.outro_start
    );
    Ok(points)
}

/// True when a formatted time is the "undetected" default
pub fn is_undetected(time: &str) -> bool {
    time == UNDETECTED_TIME
}

fn peak(values: &[f32]) -> f32 {
    values.iter().copied().fold(0.0, f32::max)
}
