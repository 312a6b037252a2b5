//! Melodic stem transcription through the basic-pitch command line

use crate::analysis::traits::MidiTranscriber;
use crate::config::TranscriberSettings;
use crate::error::{MixprepError, Result};
use crate::process::run_with_timeout;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Suffix basic-pitch appends to the input's base name
const MIDI_SUFFIX: &str = "_basic_pitch.mid";

/// Transcriber running `<command> <output_dir> <audio>`
#[derive(Debug, Clone)]
pub struct BasicPitchTranscriber {
    settings: TranscriberSettings,
}

impl BasicPitchTranscriber {
    pub fn new(settings: TranscriberSettings) -> Self {
        Self { settings }
    }
}

impl Default for BasicPitchTranscriber {
    fn default() -> Self {
        Self::new(TranscriberSettings::default())
    }
}

impl MidiTranscriber for BasicPitchTranscriber {
    fn transcribe(&self, stem: &Path, output_dir: &Path) -> Result<Option<PathBuf>> {
        let stem_label = stem_label(stem);
        if !self.settings.enabled {
            debug!("Transcription disabled, skipping {}", stem_label);
            return Ok(None);
        }

        let args: [&OsStr; 2] = [output_dir.as_os_str(), stem.as_os_str()];
        run_with_timeout(&self.settings.command, &args, self.settings.timeout).map_err(|e| {
            MixprepError::TranscriptionError {
                stem: stem_label.clone(),
                reason: e.to_string(),
            }
        })?;

        let midi_path = expected_midi_path(stem, output_dir);
        if midi_path.exists() {
            Ok(Some(midi_path))
        } else {
            warn!("No MIDI file at {} after transcribing {}", midi_path.display(), stem_label);
            Ok(None)
        }
    }

    fn name(&self) -> &'static str {
        "basic-pitch"
    }
}

/// `<output_dir>/<stem base name>_basic_pitch.mid`
pub fn expected_midi_path(stem: &Path, output_dir: &Path) -> PathBuf {
    let base = stem
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    output_dir.join(format!("{base}{MIDI_SUFFIX}"))
}

fn stem_label(stem: &Path) -> String {
    stem.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| stem.display().to_string())
}
