//! # Zeitgeist
//!
//! A staged marketing-content pipeline with streaming progress and heuristic
//! trend extraction.
//!
//! Zeitgeist provides:
//!
//! - **Sequential stages**: each stage builds a prompt from the initial input
//!   and the outputs it declares, calls a [`ModelGateway`](gateway::ModelGateway)
//!   and stores the result
//! - **Streaming progress**: numbered progress events pushed to a sink, with an
//!   NDJSON frame stream for transports
//! - **Trend extraction**: a total, deterministic parser from generated prose to
//!   structured [`Trend`](trends::Trend) records
//! - **Campaigns**: the four-stage campaign pipeline and trend discovery built
//!   on the above
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use zeitgeist::prelude::*;
//!
//! let settings = Settings::from_env()?;
//! let gateway = Arc::new(OpenRouterGateway::from_settings(&settings, ModelTier::Pro)?);
//! let orchestrator = PipelineOrchestrator::new(gateway)
//!     .with_defaults(settings.generation_defaults())
//!     .with_secrets(settings.secrets());
//!
//! let (sink, frames) = ndjson_channel(settings.event_buffer);
//! let outcome = orchestrator.run(&campaign_pipeline(), &brief.render(), sink).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod campaign;
pub mod cancellation;
pub mod config;
pub mod context;
pub mod core;
pub mod errors;
pub mod events;
pub mod extract;
pub mod gateway;
pub mod observability;
pub mod pipeline;
pub mod stages;
pub mod testing;
pub mod trends;
pub mod utils;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::campaign::{
        campaign_pipeline, CampaignBrief, CampaignOutput, CompanyProfile, TrendDiscovery,
        TrendReport,
    };
    pub use crate::cancellation::CancellationToken;
    pub use crate::config::{ModelTier, Settings};
    pub use crate::context::{StageContext, StageInputs};
    pub use crate::core::{ProgressEvent, ProgressStatus, RunStatus, StageRecord};
    pub use crate::errors::{
        ConfigurationError, ContractErrorInfo, UpstreamError, UpstreamErrorKind, ZeitgeistError,
    };
    pub use crate::events::{
        ndjson_channel, ChannelProgressSink, CollectingProgressSink, LoggingProgressSink,
        NdjsonFrames, NoOpProgressSink, ProgressEmitter, ProgressSink, TeeProgressSink,
    };
    pub use crate::extract::{PlainTextExtractor, TextExtractor};
    #[cfg(feature = "http")]
    pub use crate::gateway::OpenRouterGateway;
    pub use crate::gateway::ModelGateway;
    pub use crate::pipeline::{
        PipelineFailure, PipelineOrchestrator, PipelineOutcome, PipelineResult,
    };
    pub use crate::stages::{GenerationDefaults, GenerationRequest, PostProcessor, Stage};
    pub use crate::trends::{parse_trends, OpportunityWindow, Trend, TrendExtractor};
    pub use crate::utils::{iso_timestamp, Timestamp};
}
