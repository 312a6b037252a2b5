//! Butterworth filters as cascaded second-order sections

use std::f64::consts::PI;

/// Section Q values for a 4th-order Butterworth response
const BUTTERWORTH_4_Q: [f64; 2] = [0.541_196_1, 1.306_563];

/// Filter response type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    LowPass,
    HighPass,
}

/// One biquad section, transposed direct form II
#[derive(Debug, Clone, Copy)]
struct Biquad {
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,
    z1: f64,
    z2: f64,
}

impl Biquad {
    fn new(kind: FilterKind, cutoff: f64, sample_rate: f64, q: f64) -> Self {
        let w0 = 2.0 * PI * cutoff / sample_rate;
        let (sin_w0, cos_w0) = w0.sin_cos();
        let alpha = sin_w0 / (2.0 * q);
        let a0 = 1.0 + alpha;

        let (b0, b1, b2) = match kind {
            FilterKind::LowPass => {
                let b = (1.0 - cos_w0) / 2.0;
                (b, 1.0 - cos_w0, b)
            }
            FilterKind::HighPass => {
                let b = (1.0 + cos_w0) / 2.0;
                (b, -(1.0 + cos_w0), b)
            }
        };

        Self {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: -2.0 * cos_w0 / a0,
            a2: (1.0 - alpha) / a0,
            z1: 0.0,
            z2: 0.0,
        }
    }

    #[inline]
    fn process(&mut self, x: f64) -> f64 {
        let y = self.b0 * x + self.z1;
        self.z1 = self.b1 * x - self.a1 * y + self.z2;
        self.z2 = self.b2 * x - self.a2 * y;
        y
    }
}

/// Causal 4th-order Butterworth filter, zero initial state
///
/// Returns `None` when the cutoff is not strictly between 0 and Nyquist.
pub fn butterworth4(samples: &[f32], sample_rate: u32, cutoff: f64, kind: FilterKind) -> Option<Vec<f32>> {
    let nyquist = sample_rate as f64 / 2.0;
    if sample_rate == 0 || cutoff <= 0.0 || cutoff >= nyquist {
        return None;
    }

    let mut sections: Vec<Biquad> = BUTTERWORTH_4_Q
        .iter()
        .map(|&q| Biquad::new(kind, cutoff, sample_rate as f64, q))
        .collect();

    Some(
        samples
            .iter()
            .map(|&s| {
                sections
                    .iter_mut()
                    .fold(s as f64, |acc, section| section.process(acc)) as f32
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, sr: u32, n: usize) -> Vec<f32> {
        (0..n)
            .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / sr as f32).sin())
            .collect()
    }

    fn steady_peak(samples: &[f32]) -> f32 {
        samples[samples.len() / 2..]
            .iter()
            .fold(0.0f32, |m, s| m.max(s.abs()))
    }

    #[test]
    fn test_lowpass_separates_bands() {
        let sr = 44100;
        let low = butterworth4(&sine(50.0, sr, 44100), sr, 150.0, FilterKind::LowPass).unwrap();
        let high = butterworth4(&sine(3000.0, sr, 44100), sr, 150.0, FilterKind::LowPass).unwrap();
        assert!(steady_peak(&low) > 0.9);
        assert!(steady_peak(&high) < 0.01);
    }

    #[test]
    fn test_highpass_separates_bands() {
        let sr = 44100;
        let low = butterworth4(&sine(40.0, sr, 44100), sr, 150.0, FilterKind::HighPass).unwrap();
        let high = butterworth4(&sine(3000.0, sr, 44100), sr, 150.0, FilterKind::HighPass).unwrap();
        assert!(steady_peak(&low) < 0.05);
        assert!(steady_peak(&high) > 0.95);
    }

    #[test]
    fn test_cutoff_at_cutoff_is_minus_3db() {
        let sr = 44100;
        let out = butterworth4(&sine(150.0, sr, 88200), sr, 150.0, FilterKind::LowPass).unwrap();
        assert!((steady_peak(&out) - std::f32::consts::FRAC_1_SQRT_2).abs() < 0.03);
    }

    #[test]
    fn test_invalid_cutoff() {
        assert!(butterworth4(&[0.0; 10], 0, 150.0, FilterKind::LowPass).is_none());
        assert!(butterworth4(&[0.0; 10], 200, 150.0, FilterKind::LowPass).is_none());
    }
}
