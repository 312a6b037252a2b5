//! Centered short-time Fourier transform
//!
//! Frames are centered on `t * HOP_LENGTH` by zero-padding `N_FFT / 2`
//! samples on both ends, so a signal of `n` samples yields `1 + n / HOP_LENGTH`
//! frames and frame `t` sits at time `t * HOP_LENGTH / sr`.

use rustfft::{num_complex::Complex, FftPlanner};

/// FFT window size (~93 ms at 22.05 kHz)
pub const N_FFT: usize = 2048;

/// Hop between consecutive frames (75% overlap)
pub const HOP_LENGTH: usize = 512;

/// Positive-frequency bins per frame
pub const NUM_BINS: usize = N_FFT / 2 + 1;

/// Complex spectrogram: `frames[t][bin]`
#[derive(Debug, Clone)]
pub struct Spectrogram {
    pub frames: Vec<Vec<Complex<f32>>>,
    pub sample_rate: u32,
}

impl Spectrogram {
    pub fn num_frames(&self) -> usize {
        self.frames.len()
    }

    /// Magnitude spectrogram `[t][bin]`
    pub fn magnitudes(&self) -> Vec<Vec<f32>> {
        self.frames
            .iter()
            .map(|frame| frame.iter().map(|c| c.norm()).collect())
            .collect()
    }

    /// Center frequency of a bin in Hz
    pub fn bin_frequency(&self, bin: usize) -> f32 {
        bin as f32 * self.sample_rate as f32 / N_FFT as f32
    }
}

/// Number of centered frames for a signal of `len` samples
pub fn num_frames(len: usize) -> usize {
    1 + len / HOP_LENGTH
}

/// Time in seconds of a frame index
pub fn frame_to_time(frame: usize, sample_rate: u32) -> f64 {
    if sample_rate == 0 {
        return 0.0;
    }
    (frame * HOP_LENGTH) as f64 / sample_rate as f64
}

/// Frame index containing a time in seconds
pub fn time_to_frame(seconds: f64, sample_rate: u32) -> usize {
    (seconds.max(0.0) * sample_rate as f64 / HOP_LENGTH as f64) as usize
}

/// Compute the centered STFT of a mono signal
pub fn stft(samples: &[f32], sample_rate: u32) -> Spectrogram {
    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(N_FFT);
    let window = hann_window(N_FFT);

    let pad = N_FFT / 2;
    let count = num_frames(samples.len());
    let mut frames = Vec::with_capacity(count);

    for frame_idx in 0..count {
        // Index into the virtual padded signal
        let start = (frame_idx * HOP_LENGTH) as isize - pad as isize;

        let mut buffer: Vec<Complex<f32>> = window
            .iter()
            .enumerate()
            .map(|(i, &w)| {
                let idx = start + i as isize;
                let sample = if idx >= 0 && (idx as usize) < samples.len() {
                    samples[idx as usize]
                } else {
                    0.0
                };
                Complex::new(sample * w, 0.0)
            })
            .collect();

        fft.process(&mut buffer);
        buffer.truncate(NUM_BINS);
        frames.push(buffer);
    }

    Spectrogram {
        frames,
        sample_rate,
    }
}

/// Inverse of [`stft`] by windowed overlap-add, trimmed to `length` samples
pub fn istft(spectrogram: &Spectrogram, length: usize) -> Vec<f32> {
    let mut planner = FftPlanner::new();
    let ifft = planner.plan_fft_inverse(N_FFT);
    let window = hann_window(N_FFT);

    let pad = N_FFT / 2;
    let padded_len = length + 2 * pad;
    let mut output = vec![0.0f32; padded_len];
    let mut window_sum = vec![0.0f32; padded_len];
    let scale = 1.0 / N_FFT as f32;

    for (frame_idx, frame) in spectrogram.frames.iter().enumerate() {
        let start = frame_idx * HOP_LENGTH;

        let mut buffer = vec![Complex::new(0.0, 0.0); N_FFT];
        buffer[..frame.len()].copy_from_slice(frame);
        // Conjugate-symmetric negative frequencies
        for i in 1..NUM_BINS - 1 {
            buffer[N_FFT - i] = frame[i].conj();
        }

        ifft.process(&mut buffer);

        for (i, &w) in window.iter().enumerate() {
            let pos = start + i;
            if pos >= padded_len {
                break;
            }
            output[pos] += buffer[i].re * scale * w;
            window_sum[pos] += w * w;
        }
    }

    for (sample, &ws) in output.iter_mut().zip(window_sum.iter()) {
        if ws > 1e-8 {
            *sample /= ws;
        }
    }

    output.into_iter().skip(pad).take(length).collect()
}

/// Periodic Hann window
pub fn hann_window(size: usize) -> Vec<f32> {
    use std::f32::consts::PI;
    (0..size)
        .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f32 / size as f32).cos()))
        .collect()
}
