//! Per-stage execution records.

use crate::utils::{elapsed_ms, Timestamp};
use serde::{Deserialize, Serialize};

/// The outcome of one stage within a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageRecord {
    /// Zero-based position of the stage in the pipeline.
    pub index: usize,
    /// The stage name.
    pub stage: String,
    /// The stage's agent label.
    pub agent: String,
    /// Raw text returned by the model, if the call succeeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
    /// Post-processed output, if the stage has a post-processor and it ran.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed: Option<serde_json::Value>,
    /// When the stage started.
    pub started_at: Timestamp,
    /// When the stage ended.
    pub ended_at: Timestamp,
    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
    /// Whether the stage succeeded.
    pub success: bool,
    /// Error description for a failed stage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StageRecord {
    /// Creates a record for a stage that succeeded.
    #[must_use]
    pub fn succeeded(
        index: usize,
        stage: impl Into<String>,
        agent: impl Into<String>,
        raw: String,
        processed: Option<serde_json::Value>,
        started_at: Timestamp,
        ended_at: Timestamp,
    ) -> Self {
        Self {
            index,
            stage: stage.into(),
            agent: agent.into(),
            raw: Some(raw),
            processed,
            started_at,
            ended_at,
            duration_ms: elapsed_ms(started_at, ended_at),
            success: true,
            error: None,
        }
    }

    /// Creates a record for a stage that failed.
    #[must_use]
    pub fn failed(
        index: usize,
        stage: impl Into<String>,
        agent: impl Into<String>,
        error: impl Into<String>,
        started_at: Timestamp,
        ended_at: Timestamp,
    ) -> Self {
        Self {
            index,
            stage: stage.into(),
            agent: agent.into(),
            raw: None,
            processed: None,
            started_at,
            ended_at,
            duration_ms: elapsed_ms(started_at, ended_at),
            success: false,
            error: Some(error.into()),
        }
    }

    /// Keeps the raw model text on a failed record.
    ///
    /// Used when the model call succeeded but post-processing did not.
    #[must_use]
    pub fn with_raw(mut self, raw: String) -> Self {
        self.raw = Some(raw);
        self
    }
}
