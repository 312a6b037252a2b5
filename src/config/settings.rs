//! Runtime configuration settings

use crate::error::{MixprepError, Result};
use crate::types::SeparationModel;
use std::path::PathBuf;
use std::time::Duration;

/// Default recording search endpoint
pub const MUSICBRAINZ_ENDPOINT: &str = "https://musicbrainz.org/ws/2/recording";

/// Default cover art base URL (release id and `/front` are appended)
pub const COVER_ART_BASE: &str = "http://coverartarchive.org/release";

/// Compute device preference for the separator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum DevicePreference {
    /// Accelerator when one is visible, CPU otherwise
    #[default]
    Auto,
    Cpu,
    Cuda,
}

/// External separator process settings
#[derive(Debug, Clone)]
pub struct SeparatorSettings {
    /// Program followed by its leading arguments
    pub command: Vec<String>,
    pub timeout: Duration,
    pub device: DevicePreference,
}

impl Default for SeparatorSettings {
    fn default() -> Self {
        Self {
            command: split_command("python3 -m demucs.separate"),
            timeout: Duration::from_secs(600),
            device: DevicePreference::Auto,
        }
    }
}

/// External MIDI transcriber settings
#[derive(Debug, Clone)]
pub struct TranscriberSettings {
    pub command: Vec<String>,
    pub timeout: Duration,
    pub enabled: bool,
}

impl Default for TranscriberSettings {
    fn default() -> Self {
        Self {
            command: split_command("basic-pitch"),
            timeout: Duration::from_secs(300),
            enabled: true,
        }
    }
}

/// Metadata service client configuration
///
/// Immutable value handed to the resolver at construction.
#[derive(Debug, Clone)]
pub struct MetadataConfig {
    pub endpoint: String,
    pub user_agent: String,
    pub timeout: Duration,
    pub cover_art_base: String,
    pub enabled: bool,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            endpoint: MUSICBRAINZ_ENDPOINT.to_string(),
            user_agent: format!(
                "mixprep/{} (https://github.com/mixprep/mixprep)",
                env!("CARGO_PKG_VERSION")
            ),
            timeout: Duration::from_secs(10),
            cover_art_base: COVER_ART_BASE.to_string(),
            enabled: true,
        }
    }
}

/// Runtime settings for the analysis pipeline
#[derive(Debug, Clone)]
pub struct Settings {
    /// Input audio file
    pub input: PathBuf,
    /// Separation model
    pub model: SeparationModel,
    pub separation: SeparatorSettings,
    pub transcription: TranscriberSettings,
    pub metadata: MetadataConfig,
    /// Length of the bounded-latency analysis window
    pub analysis_window: Duration,
    /// Points per rendered waveform
    pub waveform_points: usize,
    /// Threads for per-stem waveform rendering
    pub render_threads: usize,
    /// Show a progress bar on stderr
    pub show_progress: bool,
}

impl Settings {
    /// Create settings from CLI arguments
    pub fn from_cli(cli: &super::cli::Cli) -> Result<Self> {
        let separator_cmd = split_command(&cli.separator_cmd);
        if separator_cmd.is_empty() {
            return Err(MixprepError::ConfigError("separator command is empty".to_string()));
        }
        let transcriber_cmd = split_command(&cli.transcriber_cmd);
        if transcriber_cmd.is_empty() && !cli.no_midi {
            return Err(MixprepError::ConfigError("transcriber command is empty".to_string()));
        }

        let mut metadata = MetadataConfig {
            enabled: !cli.offline,
            ..MetadataConfig::default()
        };
        if let Some(url) = &cli.metadata_url {
            metadata.endpoint = url.clone();
        }

        let defaults = Self::default();

        Ok(Self {
            input: cli.input.clone(),
            model: cli.model,
            separation: SeparatorSettings {
                command: separator_cmd,
                timeout: Duration::from_secs(cli.separation_timeout),
                device: cli.device,
            },
            transcription: TranscriberSettings {
                command: transcriber_cmd,
                timeout: Duration::from_secs(cli.transcription_timeout),
                enabled: !cli.no_midi,
            },
            metadata,
            analysis_window: defaults.analysis_window,
            waveform_points: defaults.waveform_points,
            render_threads: cli.threads.unwrap_or(defaults.render_threads).max(1),
            show_progress: !cli.quiet,
        })
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input: PathBuf::from("."),
            model: SeparationModel::default(),
            separation: SeparatorSettings::default(),
            transcription: TranscriberSettings::default(),
            metadata: MetadataConfig::default(),
            analysis_window: Duration::from_secs(180),
            waveform_points: crate::analysis::waveform::DEFAULT_POINTS,
            render_threads: num_cpus::get().saturating_sub(1).max(1),
            show_progress: true,
        }
    }
}

/// Split a command line on whitespace into program and arguments
pub fn split_command(command: &str) -> Vec<String> {
    command.split_whitespace().map(str::to_string).collect()
}
