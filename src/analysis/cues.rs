//! Cue point detection
//!
//! Vocal activity is the min-max normalized RMS of a vocal proxy signal,
//! weighted by how close its spectral centroid sits to the vocal formant
//! region. Spans where the smoothed activity stays above threshold become
//! range cues; structural landmarks become point cues.

use crate::analysis::structure::{format_time, is_undetected, parse_time, SMOOTHING_SECS};
use crate::dsp::{frame_to_time, moving_average_same, rms, spectral_centroid, stft, window_frames};
use crate::types::{AudioBuffer, Cue, CueSpan, MixPoints};
use tracing::debug;

/// Smoothed activity above this counts as vocal
pub const ACTIVITY_THRESHOLD: f32 = 0.25;

/// Range cues must be strictly longer than this many seconds
pub const MIN_RANGE_SECS: f64 = 4.0;

/// Center and width of the formant weighting curve (Hz)
const FORMANT_CENTER_HZ: f32 = 1500.0;
const FORMANT_WIDTH_HZ: f32 = 1000.0;

const CHORUS_COLOR: &str = "#8b5cf6";
const VERSE_COLOR: &str = "#3b82f6";
const INTRO_COLOR: &str = "#10b981";
const OUTRO_COLOR: &str = "#ef4444";
const DROP_COLOR: &str = "#f59e0b";

/// Detect vocal range cues and merge in structural point cues
///
/// The returned list is sorted by start time.
pub fn detect_cues(vocal_proxy: &AudioBuffer, mix_points: &MixPoints, drop: Option<f64>) -> Vec<Cue> {
    let mut cues = vocal_cues(vocal_proxy);

    if !is_undetected(&mix_points.intro_end) {
        cues.push(point_cue("intro", "INTRO END", &mix_points.intro_end, INTRO_COLOR));
    }
    if !is_undetected(&mix_points.outro_start) {
        cues.push(point_cue("outro", "OUTRO START", &mix_points.outro_start, OUTRO_COLOR));
    }
    if let Some(time) = drop {
        cues.push(Cue {
            id: "drop".to_string(),
            label: "DROP".to_string(),
            time: format_time(time),
            start_time: time,
            span: CueSpan::Point,
            color: DROP_COLOR.to_string(),
        });
    }

    // Stable: equal start times keep insertion order
    cues.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
    cues
}

fn point_cue(id: &str, label: &str, time: &str, color: &str) -> Cue {
    Cue {
        id: id.to_string(),
        label: label.to_string(),
        time: time.to_string(),
        start_time: parse_time(time).unwrap_or(0) as f64,
        span: CueSpan::Point,
        color: color.to_string(),
    }
}

/// Smoothed vocal-activity curve, one value per frame
pub fn vocal_activity(proxy: &AudioBuffer) -> Vec<f32> {
    let sr = proxy.sample_rate;
    let envelope = rms(&proxy.samples);
    let centroid = spectral_centroid(&stft(&proxy.samples, sr));

    let (lo, hi) = envelope
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let range = hi - lo;

    let activity: Vec<f32> = envelope
        .iter()
        .zip(centroid.iter())
        .map(|(&r, &c)| {
            let normalized = if range > 0.0 { (r - lo) / range } else { r };
            let distance = c - FORMANT_CENTER_HZ;
            let weight = (-(distance * distance) / (2.0 * FORMANT_WIDTH_HZ * FORMANT_WIDTH_HZ)).exp();
            normalized * weight
        })
        .collect();

    moving_average_same(&activity, window_frames(SMOOTHING_SECS, sr))
}

fn vocal_cues(proxy: &AudioBuffer) -> Vec<Cue> {
    let sr = proxy.sample_rate;
    let smoothed = vocal_activity(proxy);
    if smoothed.is_empty() {
        return Vec::new();
    }

    let active: Vec<bool> = smoothed.iter().map(|&v| v > ACTIVITY_THRESHOLD).collect();
    let active_values: Vec<f64> = smoothed
        .iter()
        .zip(active.iter())
        .filter(|(_, &a)| a)
        .map(|(&v, _)| v as f64)
        .collect();
    let average = if active_values.is_empty() {
        0.0
    } else {
        active_values.iter().sum::<f64>() / active_values.len() as f64
    };

    // (start frame, end frame) with end exclusive; a span still open when
    // the track ends has no end and is not reported
    let mut spans = Vec::new();
    let mut start: Option<usize> = None;
    for (i, &is_active) in active.iter().enumerate() {
        match (is_active, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                spans.push((s, i));
                start = None;
            }
            _ => {}
        }
    }

    let mut cues = Vec::new();
    for (s, e) in spans {
        let start_time = frame_to_time(s, sr);
        let end_time = frame_to_time(e, sr);
        let duration = ((end_time - start_time) * 10.0).round() / 10.0;
        if duration <= MIN_RANGE_SECS {
            continue;
        }

        let section = &smoothed[s..e];
        let energy = section.iter().map(|&v| v as f64).sum::<f64>() / section.len() as f64;
        let label = if energy > average * 1.2 {
            "VOCAL CHORUS"
        } else if energy < average * 0.8 {
            "VOCAL AD-LIB/BRIDGE"
        } else {
            "VOCAL VERSE"
        };
        let color = if label == "VOCAL CHORUS" {
            CHORUS_COLOR
        } else {
            VERSE_COLOR
        };

        cues.push(Cue {
            id: format!("vocal_{}", cues.len()),
            label: label.to_string(),
            time: format_time(start_time),
            start_time,
            span: CueSpan::Range { end_time, duration },
            color: color.to_string(),
        });
    }

    debug!("{} vocal sections (mean activity {:.3})", cues.len(), average);
    cues
}
