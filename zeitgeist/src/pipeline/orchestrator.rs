//! Sequential stage execution against a model gateway.

use super::run::{PipelineFailure, PipelineOutcome, PipelineResult, PipelineRun};
use super::validate::validate_stages;
use crate::cancellation::CancellationToken;
use crate::context::StageContext;
use crate::core::StageRecord;
use crate::errors::{ConfigurationError, ZeitgeistError};
use crate::events::{ProgressEmitter, ProgressSink};
use crate::gateway::ModelGateway;
use crate::observability::SpanTimer;
use crate::stages::{GenerationDefaults, Stage};
use crate::utils::now_utc;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Label used on pipeline-level events when none is configured.
pub const DEFAULT_PIPELINE_LABEL: &str = "Pipeline";

struct StageFailure {
    cause: ZeitgeistError,
    raw: Option<String>,
}

/// Runs stages strictly in order against a [`ModelGateway`].
///
/// Each stage sees the initial input plus exactly the outputs it declares in
/// `depends_on`. The first failing stage aborts the run; there is no retry.
/// Progress is pushed to a [`ProgressSink`] and never waits on its consumer.
#[derive(Clone)]
pub struct PipelineOrchestrator {
    gateway: Arc<dyn ModelGateway>,
    defaults: GenerationDefaults,
    label: String,
    secrets: Vec<String>,
}

impl std::fmt::Debug for PipelineOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineOrchestrator")
            .field("defaults", &self.defaults)
            .field("label", &self.label)
            .field("secrets", &self.secrets.len())
            .finish_non_exhaustive()
    }
}

impl PipelineOrchestrator {
    /// Creates an orchestrator around `gateway`.
    #[must_use]
    pub fn new(gateway: Arc<dyn ModelGateway>) -> Self {
        Self {
            gateway,
            defaults: GenerationDefaults::default(),
            label: DEFAULT_PIPELINE_LABEL.to_string(),
            secrets: Vec::new(),
        }
    }

    /// Sets the generation parameters used when a request leaves them unset.
    #[must_use]
    pub fn with_defaults(mut self, defaults: GenerationDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Sets the agent label of pipeline-level events.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets values that must never appear in failure messages.
    #[must_use]
    pub fn with_secrets(mut self, secrets: Vec<String>) -> Self {
        self.secrets = secrets;
        self
    }

    /// Returns the pipeline-level label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the generation defaults.
    #[must_use]
    pub fn defaults(&self) -> GenerationDefaults {
        self.defaults
    }

    /// Runs `stages` with `initial_input`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] when the stage list is invalid. No
    /// stage runs and no event is emitted in that case. Stage failures are
    /// not errors; they come back as [`PipelineOutcome::Failed`].
    pub async fn run(
        &self,
        stages: &[Stage],
        initial_input: &str,
        sink: Arc<dyn ProgressSink>,
    ) -> Result<PipelineOutcome, ConfigurationError> {
        self.run_with_cancellation(stages, initial_input, sink, &CancellationToken::new())
            .await
    }

    /// Runs `stages`, checking `cancel` before each stage.
    ///
    /// A cancelled run ends as [`PipelineOutcome::Failed`] at the index of
    /// the first stage that did not run, with a `Cancelled` cause. Only the
    /// pipeline-level failure event is emitted for it.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] when the stage list is invalid.
    pub async fn run_with_cancellation(
        &self,
        stages: &[Stage],
        initial_input: &str,
        sink: Arc<dyn ProgressSink>,
        cancel: &CancellationToken,
    ) -> Result<PipelineOutcome, ConfigurationError> {
        validate_stages(stages)?;

        let mut run = PipelineRun::new();
        let mut emitter = ProgressEmitter::new(sink, self.label.clone());
        let mut context = StageContext::new(initial_input);
        let last_index = stages.len() - 1;

        info!(
            run_id = %run.run_id,
            pipeline = %self.label,
            stages = stages.len(),
            "Pipeline run started"
        );
        run.start();
        emitter.started(stages.len()).await;

        for (index, stage) in stages.iter().enumerate() {
            let ordinal = index + 1;

            if cancel.is_cancelled() {
                let reason = cancel.reason().unwrap_or_else(|| "cancelled".to_string());
                warn!(
                    run_id = %run.run_id,
                    stage = %stage.name(),
                    reason = %reason,
                    "Pipeline cancelled before stage"
                );
                emitter
                    .pipeline_failed(&format!(
                        "{} cancelled before stage {ordinal} ({}): {reason}",
                        self.label,
                        stage.name()
                    ))
                    .await;
                run.fail(index);
                return Ok(PipelineOutcome::Failed(PipelineFailure {
                    run_id: run.run_id,
                    index,
                    stage: stage.name().to_string(),
                    cause: ZeitgeistError::Cancelled(reason),
                    records: run.records,
                }));
            }

            run.enter_stage(index);
            info!(
                run_id = %run.run_id,
                stage = %stage.name(),
                step = emitter.next_step(),
                "Stage started"
            );
            emitter
                .stage_working(ordinal, stage.agent_label(), stage.working_message())
                .await;

            let started_at = now_utc();
            let timer = SpanTimer::start(stage.name());
            let executed = match self.execute_stage(stage, &context).await {
                Ok((raw, processed)) => context
                    .insert(stage.name(), index, raw.clone(), processed.clone())
                    .map(|()| (raw, processed))
                    .map_err(|conflict| StageFailure {
                        cause: conflict.into(),
                        raw: None,
                    }),
                Err(failure) => Err(failure),
            };
            let duration_ms = timer.finish();
            let ended_at = now_utc();

            match executed {
                Ok((raw, processed)) => {
                    info!(
                        run_id = %run.run_id,
                        stage = %stage.name(),
                        step = emitter.next_step(),
                        duration_ms,
                        "Stage completed"
                    );
                    let payload = (index == last_index).then(|| {
                        json!({
                            "stage": stage.name(),
                            "output": raw,
                            "processed": processed,
                        })
                    });
                    run.record(StageRecord::succeeded(
                        index,
                        stage.name(),
                        stage.agent_label(),
                        raw,
                        processed,
                        started_at,
                        ended_at,
                    ));
                    emitter
                        .stage_complete(
                            ordinal,
                            stage.agent_label(),
                            &format!("{} complete", stage.agent_label()),
                            payload,
                        )
                        .await;
                }
                Err(StageFailure { cause, raw }) => {
                    let message = cause.to_string();
                    error!(
                        run_id = %run.run_id,
                        stage = %stage.name(),
                        step = emitter.next_step(),
                        duration_ms,
                        error = %message,
                        "Stage failed"
                    );
                    let mut record = StageRecord::failed(
                        index,
                        stage.name(),
                        stage.agent_label(),
                        message.clone(),
                        started_at,
                        ended_at,
                    );
                    if let Some(raw) = raw {
                        record = record.with_raw(raw);
                    }
                    run.record(record);
                    emitter
                        .stage_error(
                            ordinal,
                            stage.agent_label(),
                            &format!("{} failed: {message}", stage.agent_label()),
                        )
                        .await;
                    emitter
                        .pipeline_failed(&format!(
                            "{} failed at stage {ordinal} ({})",
                            self.label,
                            stage.name()
                        ))
                        .await;
                    run.fail(index);
                    return Ok(PipelineOutcome::Failed(PipelineFailure {
                        run_id: run.run_id,
                        index,
                        stage: stage.name().to_string(),
                        cause,
                        records: run.records,
                    }));
                }
            }
        }

        run.complete();
        emitter.pipeline_complete().await;
        info!(run_id = %run.run_id, pipeline = %self.label, "Pipeline run completed");

        let (stage, output, processed) = context.last().map_or_else(
            || (String::new(), String::new(), None),
            |entry| (entry.stage.clone(), entry.raw.clone(), entry.processed.clone()),
        );
        Ok(PipelineOutcome::Completed(PipelineResult {
            run_id: run.run_id,
            stage,
            output,
            processed,
            records: run.records,
        }))
    }

    async fn execute_stage(
        &self,
        stage: &Stage,
        context: &StageContext,
    ) -> Result<(String, Option<Value>), StageFailure> {
        let inputs = context.view_for(stage.name(), stage.dependencies());
        let request = stage.build_request(&inputs);

        let raw = self
            .gateway
            .generate(
                &request.prompt,
                &request.system_instructions,
                request.max_output_tokens_or(&self.defaults),
                request.temperature_or(&self.defaults),
            )
            .await
            .map_err(|err| StageFailure {
                cause: err.redacted(&self.secrets).into(),
                raw: None,
            })?;

        let processed = stage.post_process(&raw).map_err(|cause| StageFailure {
            cause,
            raw: Some(raw.clone()),
        })?;
        Ok((raw, processed))
    }
}
