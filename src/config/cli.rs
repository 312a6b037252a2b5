//! CLI argument parsing and configuration

use super::settings::DevicePreference;
use crate::types::SeparationModel;
use clap::Parser;
use std::path::PathBuf;

/// mixprep - Prepare a track for DJ mixing
///
/// Analyzes one audio file for tempo, key, timbre, structure and cue points,
/// separates it into stems and transcribes melodic stems to MIDI. Progress and
/// the final result are written to stdout as newline-delimited JSON.
#[derive(Parser, Debug)]
#[command(name = "mixprep")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Input audio file (stems and MIDI are written next to it)
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Separation model
    #[arg(short, long, value_enum, default_value_t = SeparationModel::HtDemucs6s)]
    pub model: SeparationModel,

    /// Command used to run the stem separator (split on whitespace)
    #[arg(long, env = "MIXPREP_DEMUCS_CMD", default_value = "python3 -m demucs.separate")]
    pub separator_cmd: String,

    /// Separation timeout in seconds
    #[arg(long, value_name = "SECS", default_value = "600")]
    pub separation_timeout: u64,

    /// Separation device
    #[arg(long, value_enum, default_value_t = DevicePreference::Auto)]
    pub device: DevicePreference,

    /// Command used to run the MIDI transcriber (split on whitespace)
    #[arg(long, env = "MIXPREP_BASIC_PITCH_CMD", default_value = "basic-pitch")]
    pub transcriber_cmd: String,

    /// Transcription timeout in seconds (per stem)
    #[arg(long, value_name = "SECS", default_value = "300")]
    pub transcription_timeout: u64,

    /// Skip MIDI transcription
    #[arg(long, default_value = "false")]
    pub no_midi: bool,

    /// Skip the online metadata lookup
    #[arg(long, default_value = "false")]
    pub offline: bool,

    /// Recording search endpoint for metadata lookup
    #[arg(long, env = "MIXPREP_METADATA_URL")]
    pub metadata_url: Option<String>,

    /// Number of threads used for per-stem waveform rendering
    #[arg(short = 'j', long, value_name = "N")]
    pub threads: Option<usize>,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress the progress bar and non-error logs)
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

impl Cli {
    /// Get the log level based on verbosity flags
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            return tracing::Level::ERROR;
        }
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}
