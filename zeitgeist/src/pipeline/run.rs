//! Run state and outcome types.

use crate::core::{RunStatus, StageRecord};
use crate::errors::ZeitgeistError;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Mutable state of one run while it executes.
///
/// Holds one record per executed stage, in order. Once the status is
/// terminal, further transitions are ignored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineRun {
    /// Unique id of the run.
    pub run_id: Uuid,
    /// Current lifecycle status.
    pub status: RunStatus,
    /// Index of the stage being executed, or the last one attempted.
    pub current_stage_index: usize,
    /// Per-stage records, in execution order.
    pub records: Vec<StageRecord>,
}

impl Default for PipelineRun {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineRun {
    /// Creates a pending run with a fresh id.
    #[must_use]
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            status: RunStatus::Pending,
            current_stage_index: 0,
            records: Vec::new(),
        }
    }

    /// Moves a pending run to `Running`.
    pub fn start(&mut self) {
        if self.status == RunStatus::Pending {
            self.status = RunStatus::Running;
        }
    }

    /// Marks the stage at `index` as the one executing.
    pub fn enter_stage(&mut self, index: usize) {
        if !self.status.is_terminal() {
            self.current_stage_index = index;
        }
    }

    /// Appends a stage record.
    pub fn record(&mut self, record: StageRecord) {
        if !self.status.is_terminal() {
            self.records.push(record);
        }
    }

    /// Marks the run as completed.
    pub fn complete(&mut self) {
        if !self.status.is_terminal() {
            self.status = RunStatus::Completed;
        }
    }

    /// Marks the run as failed at `index`.
    pub fn fail(&mut self, index: usize) {
        if !self.status.is_terminal() {
            self.current_stage_index = index;
            self.status = RunStatus::Failed;
        }
    }
}

/// The output of a run in which every stage succeeded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineResult {
    /// Unique id of the run.
    pub run_id: Uuid,
    /// Name of the last stage.
    pub stage: String,
    /// Raw text of the last stage.
    pub output: String,
    /// Post-processed value of the last stage, if it has a post-processor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed: Option<serde_json::Value>,
    /// Per-stage records, in execution order.
    pub records: Vec<StageRecord>,
}

impl PipelineResult {
    /// Returns the record of the stage called `name`.
    #[must_use]
    pub fn record(&self, name: &str) -> Option<&StageRecord> {
        self.records.iter().find(|record| record.stage == name)
    }

    /// Returns the raw output of the stage called `name`.
    #[must_use]
    pub fn stage_output(&self, name: &str) -> Option<&str> {
        self.record(name).and_then(|record| record.raw.as_deref())
    }

    /// Returns the post-processed value of the stage called `name`.
    #[must_use]
    pub fn stage_processed(&self, name: &str) -> Option<&serde_json::Value> {
        self.record(name).and_then(|record| record.processed.as_ref())
    }
}

/// A run that stopped before its last stage finished.
#[derive(Debug, Error)]
#[error("Pipeline failed at stage {index} ('{stage}'): {cause}")]
pub struct PipelineFailure {
    /// Unique id of the run.
    pub run_id: Uuid,
    /// Zero-based index of the failed or first unexecuted stage.
    pub index: usize,
    /// Name of that stage.
    pub stage: String,
    /// Why the run stopped.
    #[source]
    pub cause: ZeitgeistError,
    /// Records of the stages that were attempted, the failed one included.
    pub records: Vec<StageRecord>,
}

impl PipelineFailure {
    /// Returns true if the run was cancelled rather than failing.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self.cause, ZeitgeistError::Cancelled(_))
    }
}

/// The tagged outcome of a run.
#[derive(Debug)]
pub enum PipelineOutcome {
    /// Every stage succeeded.
    Completed(PipelineResult),
    /// A stage failed or the run was cancelled.
    Failed(PipelineFailure),
}

impl PipelineOutcome {
    /// Returns true if every stage succeeded.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    /// Returns the per-stage records.
    #[must_use]
    pub fn records(&self) -> &[StageRecord] {
        match self {
            Self::Completed(result) => &result.records,
            Self::Failed(failure) => &failure.records,
        }
    }

    /// Converts the outcome into a `Result`.
    ///
    /// # Errors
    ///
    /// Returns the [`PipelineFailure`] for a failed run.
    pub fn into_result(self) -> Result<PipelineResult, PipelineFailure> {
        match self {
            Self::Completed(result) => Ok(result),
            Self::Failed(failure) => Err(failure),
        }
    }
}
