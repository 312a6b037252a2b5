//! Unified error types for mixprep
//!
//! Error strategy:
//! - Fatal errors (decode, core analysis, separation): end the run with a
//!   single error event, nothing follows it
//! - Degradable errors (metadata, per-stem rendering, transcription): logged,
//!   the affected result field falls back to its documented default
//!
//! All errors include actionable suggestions where possible.

use std::path::PathBuf;
use thiserror::Error;

/// Supported audio formats for helpful error messages
pub const SUPPORTED_FORMATS: &str = "MP3, WAV, FLAC, AIFF, OGG";

/// Top-level error type for mixprep operations
#[derive(Debug, Error)]
pub enum MixprepError {
    // =========================================================================
    // Fatal errors - abort the run
    // =========================================================================
    #[error("Failed to decode audio file '{path}': {reason}\n  Supported formats: {SUPPORTED_FORMATS}\n  Tip: If the file plays in other apps, it may be corrupted or use an unsupported codec")]
    LoadError { path: PathBuf, reason: String },

    #[error("{stage} failed: {reason}")]
    AnalysisError { stage: &'static str, reason: String },

    /// Kept distinct from `AnalysisError` so callers can offer a retry
    /// without stems.
    #[error("Stem separation failed: {reason}")]
    SeparationError { reason: String },

    #[error("Cannot write output to '{path}': {reason}\n  Tip: Check write permissions for the output directory")]
    OutputError { path: PathBuf, reason: String },

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // =========================================================================
    // Degradable errors - logged, field falls back to a default
    // =========================================================================
    #[error("Metadata lookup failed: {0}")]
    MetadataError(String),

    #[error("Waveform rendering failed for stem '{stem}': {reason}")]
    RenderError { stem: String, reason: String },

    #[error("MIDI transcription failed for stem '{stem}': {reason}")]
    TranscriptionError { stem: String, reason: String },
}

/// Result type alias for mixprep operations
pub type Result<T> = std::result::Result<T, MixprepError>;

impl MixprepError {
    /// Returns true if this error must terminate the event stream
    pub fn is_fatal(&self) -> bool {
        !self.is_degradable()
    }

    /// Returns true if the pipeline substitutes a default and keeps going
    pub fn is_degradable(&self) -> bool {
        matches!(
            self,
            MixprepError::MetadataError(_)
                | MixprepError::RenderError { .. }
                | MixprepError::TranscriptionError { .. }
        )
    }

    /// Underlying cause without the stage prefix or tips
    pub fn detail(&self) -> String {
        match self {
            MixprepError::LoadError { reason, .. }
            | MixprepError::AnalysisError { reason, .. }
            | MixprepError::SeparationError { reason }
            | MixprepError::OutputError { reason, .. }
            | MixprepError::RenderError { reason, .. }
            | MixprepError::TranscriptionError { reason, .. } => reason.clone(),
            MixprepError::ConfigError(reason) | MixprepError::MetadataError(reason) => reason.clone(),
            MixprepError::Io(e) => e.to_string(),
        }
    }

    /// Create a decode error with context about the issue
    pub fn decode_error(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        MixprepError::LoadError {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an analysis error for a named stage
    pub fn analysis(stage: &'static str, reason: impl Into<String>) -> Self {
        MixprepError::AnalysisError {
            stage,
            reason: reason.into(),
        }
    }

    /// Create a separation error
    pub fn separation(reason: impl Into<String>) -> Self {
        MixprepError::SeparationError {
            reason: reason.into(),
        }
    }

    /// Create an output error, checking for common issues
    pub fn output_error(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        let path = path.into();
        let reason = match err.kind() {
            std::io::ErrorKind::PermissionDenied => {
                format!("Permission denied. Check that you have write access to {}", path.display())
            }
            std::io::ErrorKind::NotFound => {
                format!("Directory does not exist: {}", path.parent().map(|p| p.display().to_string()).unwrap_or_default())
            }
            _ => err.to_string(),
        };
        MixprepError::OutputError { path, reason }
    }
}
