//! Analysis pipeline: stage orchestration and the NDJSON event stream

pub mod events;
pub mod orchestrator;

pub use events::PipelineEvent;
pub use orchestrator::{Analysis, Pipeline, Stage, REFERENCE_LOUDNESS};
