//! Context management for pipeline execution.
//!
//! This module provides:
//! - The append-only store of completed stage outputs
//! - Read-restricted per-stage views over that store

mod inputs;
mod store;

pub use inputs::StageInputs;
pub use store::{StageContext, StageEntry};
