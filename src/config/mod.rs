//! Configuration and CLI handling

pub mod cli;
pub mod settings;

pub use cli::Cli;
pub use settings::{
    DevicePreference, MetadataConfig, SeparatorSettings, Settings, TranscriberSettings,
};
