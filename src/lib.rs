//! mixprep - Track preparation for DJ mixing
//!
//! Analyzes one audio file and streams the results as newline-delimited
//! JSON events: tempo, key, timbre, mix points, stems (via an external
//! separator), per-stem waveforms, cue points and MIDI transcriptions of
//! melodic stems.
//!
//! # Architecture
//!
//! - `config`: CLI argument parsing and runtime settings
//! - `audio`: decoding with symphonia, resampling, WAV output
//! - `dsp`: STFT, frame features, HPSS, filters, smoothing
//! - `analysis`: the analyzers and the swappable backends behind traits
//! - `process`: bounded external process execution
//! - `pipeline`: the stage machine and its event stream
//!
//! # Example
//!
//! ```no_run
//! use mixprep::config::Settings;
//! use mixprep::pipeline::Pipeline;
//! use std::path::Path;
//!
//! let pipeline = Pipeline::new(Settings::default()).expect("valid settings");
//! for event in pipeline.analyze(Path::new("track.mp3"), Default::default()) {
//!     print!("{}", event.to_ndjson().expect("serializable event"));
//! }
//! ```

pub mod analysis;
pub mod audio;
pub mod config;
pub mod dsp;
pub mod error;
pub mod pipeline;
pub mod process;
pub mod types;

// Re-export key types at crate root
pub use error::{MixprepError, Result};
pub use pipeline::{Pipeline, PipelineEvent};
pub use types::{AnalysisResult, AudioBuffer, SeparationModel, StemName};
