//! Analysis trait abstractions
//!
//! These traits are the seams between the pipeline and its backends: the
//! built-in DSP estimator, the external separator and transcriber processes,
//! and the online metadata service. Tests swap in fakes at the same seams.

use crate::error::Result;
use crate::types::{AudioBuffer, SeparationModel, StemSet, TrackMeta};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Tempo and key estimate for one buffer
#[derive(Debug, Clone, PartialEq)]
pub struct TempoKey {
    /// Beats per minute, unrounded
    pub bpm: f64,
    /// Camelot notation (or a literal root fallback)
    pub key: String,
}

/// Tempo/key detection backend
pub trait TempoKeyEstimator: Send + Sync {
    /// Estimate tempo and key. Key failures fall back internally; an error
    /// here means tempo could not be estimated at all.
    fn estimate(&self, buffer: &AudioBuffer) -> Result<TempoKey>;

    /// Get the name of this estimator (for logging)
    fn name(&self) -> &'static str;
}

/// Stem separation backend
pub trait StemSeparator: Send + Sync {
    /// Separate `input` into stems written as siblings inside `output_dir`
    ///
    /// Stems the model does not produce are simply absent from the set.
    fn separate(&self, input: &Path, model: SeparationModel, output_dir: &Path) -> Result<StemSet>;

    /// Get the name of this separator (for logging)
    fn name(&self) -> &'static str;
}

/// Recording metadata lookup backend
pub trait MetadataLookup: Send + Sync {
    /// Query the service with an already-cleaned search string
    fn lookup(&self, query: &str) -> Result<TrackMeta>;

    /// Get the name of this lookup (for logging)
    fn name(&self) -> &'static str;

    /// Look up a file name, substituting an empty record on any failure
    fn resolve(&self, filename: &str) -> TrackMeta {
        let query = crate::analysis::metadata::clean_filename(filename);
        if query.is_empty() {
            return TrackMeta::default();
        }
        match self.lookup(&query) {
            Ok(meta) => meta,
            Err(e) => {
                warn!("{} lookup for '{}' failed: {}", self.name(), query, e);
                TrackMeta::default()
            }
        }
    }
}

/// Audio-to-MIDI transcription backend
pub trait MidiTranscriber: Send + Sync {
    /// Transcribe one stem, writing into `output_dir`
    ///
    /// `Ok(None)` means the backend ran but produced no file.
    fn transcribe(&self, stem: &Path, output_dir: &Path) -> Result<Option<PathBuf>>;

    /// Get the name of this transcriber (for logging)
    fn name(&self) -> &'static str;
}
