//! Signal-processing building blocks shared by the analyzers
//!
//! All frame-based features use the centered grid defined in [`stft`]:
//! `N_FFT = 2048`, `HOP_LENGTH = 512`.

pub mod features;
pub mod filter;
pub mod hpss;
pub mod smoothing;
pub mod stft;

pub use features::{mean_chroma, onset_strength, rms, spectral_centroid};
pub use filter::{butterworth4, FilterKind};
pub use smoothing::{moving_average_same, window_frames};
pub use stft::{frame_to_time, stft, Spectrogram, HOP_LENGTH, N_FFT};
