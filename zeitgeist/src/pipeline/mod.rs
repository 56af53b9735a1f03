//! Sequential pipeline execution.
//!
//! A pipeline is an ordered list of [`Stage`](crate::stages::Stage)s. The
//! list is checked once with [`validate_stages`] before anything runs, then
//! [`PipelineOrchestrator`] executes the stages one at a time and returns a
//! [`PipelineOutcome`].

mod orchestrator;
mod run;
mod validate;

pub use orchestrator::{PipelineOrchestrator, DEFAULT_PIPELINE_LABEL};
pub use run::{PipelineFailure, PipelineOutcome, PipelineResult, PipelineRun};
pub use validate::validate_stages;
