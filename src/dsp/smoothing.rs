//! Moving-average smoothing of frame envelopes

use super::stft::HOP_LENGTH;

/// Window length in frames covering `seconds` of audio
pub fn window_frames(seconds: f64, sample_rate: u32) -> usize {
    ((sample_rate as f64 * seconds) / HOP_LENGTH as f64) as usize
}

/// Boxcar moving average with "same"-size output
///
/// Output sample `i` averages the zero-padded window `[i - n/2, i + n - 1 - n/2]`
/// and is always divided by `n`, so values taper toward the edges.
pub fn moving_average_same(values: &[f32], n: usize) -> Vec<f32> {
    if n <= 1 || values.is_empty() {
        return values.to_vec();
    }

    // Prefix sums in f64 to avoid drift on long envelopes
    let mut prefix = Vec::with_capacity(values.len() + 1);
    prefix.push(0.0f64);
    for &v in values {
        let last = prefix[prefix.len() - 1];
        prefix.push(last + v as f64);
    }

    let before = n / 2;
    let after = n - 1 - before;
    (0..values.len())
        .map(|i| {
            let lo = i.saturating_sub(before);
            let hi = (i + after + 1).min(values.len());
            ((prefix[hi] - prefix[lo]) / n as f64) as f32
        })
        .collect()
}
