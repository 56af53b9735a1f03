//! Scripted model gateway and stage fixtures.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;

use crate::context::StageInputs;
use crate::errors::UpstreamError;
use crate::gateway::ModelGateway;
use crate::stages::{GenerationRequest, Stage};

/// One queued gateway reply.
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    /// Return this text.
    Text(String),
    /// Fail with this error.
    Fail(UpstreamError),
}

/// The arguments of one `generate` call.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    /// The prompt text.
    pub prompt: String,
    /// The system instructions.
    pub system_instructions: String,
    /// The output token cap.
    pub max_output_tokens: u32,
    /// The sampling temperature.
    pub temperature: f32,
}

/// A gateway that replays queued replies in order and records every call.
///
/// When the queue is empty the fallback reply is used if one is set;
/// otherwise the call fails with an `Other` upstream error.
#[derive(Debug, Default)]
pub struct ScriptedGateway {
    replies: Mutex<VecDeque<ScriptedReply>>,
    fallback: Option<String>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedGateway {
    /// Creates a gateway with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful reply.
    #[must_use]
    pub fn with_response(self, text: impl Into<String>) -> Self {
        self.replies.lock().push_back(ScriptedReply::Text(text.into()));
        self
    }

    /// Queues a failure.
    #[must_use]
    pub fn with_failure(self, error: UpstreamError) -> Self {
        self.replies.lock().push_back(ScriptedReply::Fail(error));
        self
    }

    /// Sets the reply used once the queue is exhausted.
    #[must_use]
    pub fn with_fallback(mut self, text: impl Into<String>) -> Self {
        self.fallback = Some(text.into());
        self
    }

    /// Returns every recorded call.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    /// Returns the number of calls made.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Returns the prompts of every call, in order.
    #[must_use]
    pub fn prompts(&self) -> Vec<String> {
        self.calls.lock().iter().map(|c| c.prompt.clone()).collect()
    }
}

#[async_trait]
impl ModelGateway for ScriptedGateway {
    async fn generate(
        &self,
        prompt: &str,
        system_instructions: &str,
        max_output_tokens: u32,
        temperature: f32,
    ) -> Result<String, UpstreamError> {
        self.calls.lock().push(RecordedCall {
            prompt: prompt.to_string(),
            system_instructions: system_instructions.to_string(),
            max_output_tokens,
            temperature,
        });

        let next = self.replies.lock().pop_front();
        match next {
            Some(ScriptedReply::Text(text)) => Ok(text),
            Some(ScriptedReply::Fail(error)) => Err(error),
            None => self
                .fallback
                .clone()
                .ok_or_else(|| UpstreamError::other("no scripted reply left")),
        }
    }
}

/// Builds `count` stages named `stage_1..=stage_count`, each depending on
/// the one before it and prompting with the initial input plus that
/// dependency's output.
#[must_use]
pub fn linear_stages(count: usize) -> Vec<Stage> {
    (1..=count)
        .map(|n| {
            let name = format!("stage_{n}");
            let stage = Stage::new(name.clone(), |inputs: &StageInputs| {
                GenerationRequest::new(format!(
                    "{}\n{}",
                    inputs.initial_input(),
                    inputs.render_dependencies()
                ))
            })
            .with_agent_label(format!("Agent {n}"));
            if n > 1 {
                stage.depends_on([format!("stage_{}", n - 1)])
            } else {
                stage
            }
        })
        .collect()
}
