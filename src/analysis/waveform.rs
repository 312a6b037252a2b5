//! Peak waveform rendering for display

/// Points per rendered waveform
pub const DEFAULT_POINTS: usize = 150;

/// Downsample to `points` peak-absolute values normalized to a max of 1.0
///
/// Segments are `max(len / points, 1)` samples wide; segments that start
/// past the end of the buffer are 0. Silent input renders as all zeros.
pub fn render(samples: &[f32], points: usize) -> Vec<f32> {
    let hop = (samples.len() / points.max(1)).max(1);

    let mut peaks: Vec<f32> = (0..points)
        .map(|i| {
            let start = i * hop;
            if start >= samples.len() {
                return 0.0;
            }
            let end = (start + hop).min(samples.len());
            samples[start..end].iter().fold(0.0f32, |m, s| m.max(s.abs()))
        })
        .collect();

    let max = peaks.iter().copied().fold(0.0f32, f32::max);
    if max > 0.0 && max.is_finite() {
        for p in peaks.iter_mut() {
            *p = ((*p / max) * 1000.0).round() / 1000.0;
        }
    } else {
        peaks.iter_mut().for_each(|p| *p = 0.0);
    }
    peaks
}

/// Flat waveform used when a stem cannot be rendered
pub fn silent(points: usize) -> Vec<f32> {
    vec![0.0; points]
}
