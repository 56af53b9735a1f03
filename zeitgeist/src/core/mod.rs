//! Core domain model types.
//!
//! This module contains the fundamental types shared by the orchestrator,
//! the progress emitter and the streaming transport:
//! - Run and progress status enums
//! - The progress event carried on the stream
//! - Per-stage result records

mod event;
mod record;
mod status;

pub use event::ProgressEvent;
pub use record::StageRecord;
pub use status::{ProgressStatus, RunStatus};
