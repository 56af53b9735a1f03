//! Sequenced progress emission for one pipeline run.

use super::ProgressSink;
use crate::core::{ProgressEvent, ProgressStatus};
use std::sync::Arc;

/// Sequences progress events for a single run and pushes them to a sink.
///
/// Step numbers start at 0 and increase by one per emitted event. Emission
/// is push-only: events go through [`ProgressSink::try_emit`], so a slow
/// consumer never holds up the run. Once a pipeline-level terminal event
/// has been emitted the emitter is closed and ignores further calls.
pub struct ProgressEmitter {
    sink: Arc<dyn ProgressSink>,
    label: String,
    next_step: u64,
    closed: bool,
}

impl std::fmt::Debug for ProgressEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressEmitter")
            .field("label", &self.label)
            .field("next_step", &self.next_step)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

impl ProgressEmitter {
    /// Creates an emitter whose pipeline-level events carry `label`.
    #[must_use]
    pub fn new(sink: Arc<dyn ProgressSink>, label: impl Into<String>) -> Self {
        Self {
            sink,
            label: label.into(),
            next_step: 0,
            closed: false,
        }
    }

    /// Returns the step number the next event will carry.
    #[must_use]
    pub fn next_step(&self) -> u64 {
        self.next_step
    }

    /// Returns true once a pipeline-level terminal event was emitted.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Emits the pipeline "started" event.
    pub async fn started(&mut self, total_stages: usize) {
        let message = format!("Starting {} with {total_stages} stages", self.label);
        let event = self.event(self.label.clone(), ProgressStatus::Working, message);
        self.push(event).await;
    }

    /// Emits a stage's `Working` event.
    pub async fn stage_working(&mut self, ordinal: usize, agent: &str, message: &str) {
        let event = self
            .event(agent, ProgressStatus::Working, message)
            .for_stage(ordinal);
        self.push(event).await;
    }

    /// Emits a stage's `Complete` event, optionally with a payload.
    pub async fn stage_complete(
        &mut self,
        ordinal: usize,
        agent: &str,
        message: &str,
        payload: Option<serde_json::Value>,
    ) {
        let mut event = self
            .event(agent, ProgressStatus::Complete, message)
            .for_stage(ordinal);
        event.payload = payload;
        self.push(event).await;
    }

    /// Emits a stage's `Error` event.
    pub async fn stage_error(&mut self, ordinal: usize, agent: &str, message: &str) {
        let event = self
            .event(agent, ProgressStatus::Error, message)
            .for_stage(ordinal);
        self.push(event).await;
    }

    /// Emits the pipeline-level `Complete` event and closes the emitter.
    pub async fn pipeline_complete(&mut self) {
        let message = format!("{} completed", self.label);
        let event = self.event(self.label.clone(), ProgressStatus::Complete, message);
        self.push(event).await;
        self.closed = true;
    }

    /// Emits the pipeline-level `Error` event and closes the emitter.
    pub async fn pipeline_failed(&mut self, message: &str) {
        let event = self.event(self.label.clone(), ProgressStatus::Error, message);
        self.push(event).await;
        self.closed = true;
    }

    fn event(
        &self,
        agent: impl Into<String>,
        status: ProgressStatus,
        message: impl Into<String>,
    ) -> ProgressEvent {
        ProgressEvent::new(self.next_step, agent, status, message)
    }

    async fn push(&mut self, event: ProgressEvent) {
        if self.closed {
            return;
        }
        self.next_step += 1;
        self.sink.try_emit(event);
        tokio::task::yield_now().await;
    }
}
