//! NDJSON wire events
//!
//! Each event serializes to one JSON object tagged by `type` and terminated
//! by a newline. A run emits progress events followed by exactly one
//! terminal event (`error` or `complete`).

use crate::types::AnalysisResult;
use serde::{Deserialize, Serialize};

/// One event of an analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PipelineEvent {
    Progress { message: String, percent: u8 },
    Error { message: String },
    Complete { data: Box<AnalysisResult> },
}

impl PipelineEvent {
    pub fn progress(message: impl Into<String>, percent: u8) -> Self {
        PipelineEvent::Progress {
            message: message.into(),
            percent,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        PipelineEvent::Error {
            message: message.into(),
        }
    }

    pub fn complete(result: AnalysisResult) -> Self {
        PipelineEvent::Complete {
            data: Box::new(result),
        }
    }

    /// True for the event that ends a run
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PipelineEvent::Progress { .. })
    }

    pub fn percent(&self) -> Option<u8> {
        match self {
            PipelineEvent::Progress { percent, .. } => Some(*percent),
            _ => None,
        }
    }

    /// Serialize as one newline-terminated JSON line
    pub fn to_ndjson(&self) -> serde_json::Result<String> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }
}
