//! Stage definitions.
//!
//! A stage is one generation call: a prompt built from the stage's view of
//! prior outputs, plus an optional post-processor that turns the raw text
//! into a structured value. Stages are plain data and immutable once a run
//! starts.

mod request;

pub use request::{GenerationDefaults, GenerationRequest};

use crate::context::StageInputs;
use crate::errors::ZeitgeistError;
use std::collections::BTreeSet;
use std::fmt::Debug;
use std::sync::Arc;

/// Builds the generation request for a stage from its context view.
pub trait PromptBuilder: Send + Sync {
    /// Builds the request.
    fn build(&self, inputs: &StageInputs) -> GenerationRequest;
}

impl<F> PromptBuilder for F
where
    F: Fn(&StageInputs) -> GenerationRequest + Send + Sync,
{
    fn build(&self, inputs: &StageInputs) -> GenerationRequest {
        self(inputs)
    }
}

/// Turns a stage's raw text into a structured value.
pub trait PostProcessor: Send + Sync {
    /// Processes the raw text.
    ///
    /// # Errors
    ///
    /// An error fails the stage.
    fn process(&self, raw: &str) -> Result<serde_json::Value, ZeitgeistError>;
}

impl<F> PostProcessor for F
where
    F: Fn(&str) -> Result<serde_json::Value, ZeitgeistError> + Send + Sync,
{
    fn process(&self, raw: &str) -> Result<serde_json::Value, ZeitgeistError> {
        self(raw)
    }
}

/// One unit of work in a pipeline.
#[derive(Clone)]
pub struct Stage {
    name: String,
    agent_label: String,
    working_message: String,
    depends_on: BTreeSet<String>,
    prompt: Arc<dyn PromptBuilder>,
    post_processor: Option<Arc<dyn PostProcessor>>,
}

impl Debug for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stage")
            .field("name", &self.name)
            .field("agent_label", &self.agent_label)
            .field("depends_on", &self.depends_on)
            .field("has_post_processor", &self.post_processor.is_some())
            .finish_non_exhaustive()
    }
}

impl Stage {
    /// Creates a stage with no dependencies.
    ///
    /// The agent label defaults to the stage name.
    #[must_use]
    pub fn new(name: impl Into<String>, prompt: impl PromptBuilder + 'static) -> Self {
        let name = name.into();
        Self {
            agent_label: name.clone(),
            working_message: format!("Running {name}..."),
            name,
            depends_on: BTreeSet::new(),
            prompt: Arc::new(prompt),
            post_processor: None,
        }
    }

    /// Sets the human-readable agent label used in progress events.
    #[must_use]
    pub fn with_agent_label(mut self, label: impl Into<String>) -> Self {
        self.agent_label = label.into();
        self
    }

    /// Sets the message carried by the stage's `Working` event.
    #[must_use]
    pub fn with_working_message(mut self, message: impl Into<String>) -> Self {
        self.working_message = message.into();
        self
    }

    /// Declares the prior stages this stage may read.
    #[must_use]
    pub fn depends_on<I, S>(mut self, stages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends_on.extend(stages.into_iter().map(Into::into));
        self
    }

    /// Attaches a post-processor.
    #[must_use]
    pub fn with_post_processor(mut self, processor: impl PostProcessor + 'static) -> Self {
        self.post_processor = Some(Arc::new(processor));
        self
    }

    /// Returns the stage name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the agent label.
    #[must_use]
    pub fn agent_label(&self) -> &str {
        &self.agent_label
    }

    /// Returns the working message.
    #[must_use]
    pub fn working_message(&self) -> &str {
        &self.working_message
    }

    /// Returns the declared dependencies.
    #[must_use]
    pub fn dependencies(&self) -> &BTreeSet<String> {
        &self.depends_on
    }

    /// Returns true if the stage declares a post-processor.
    #[must_use]
    pub fn has_post_processor(&self) -> bool {
        self.post_processor.is_some()
    }

    /// Builds the generation request from the stage's view.
    #[must_use]
    pub fn build_request(&self, inputs: &StageInputs) -> GenerationRequest {
        self.prompt.build(inputs)
    }

    /// Runs the post-processor, if any.
    ///
    /// # Errors
    ///
    /// Propagates the post-processor's error.
    pub fn post_process(&self, raw: &str) -> Result<Option<serde_json::Value>, ZeitgeistError> {
        self.post_processor
            .as_ref()
            .map(|processor| processor.process(raw))
            .transpose()
    }
}
