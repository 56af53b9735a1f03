//! Test doubles and assertions for pipelines built on this crate.
//!
//! This module provides:
//! - [`ScriptedGateway`], a model gateway that replays queued replies
//! - event-sequence assertions over collected [`ProgressEvent`]s
//! - [`linear_stages`] for quick stage lists
//!
//! [`ProgressEvent`]: crate::core::ProgressEvent

mod assertions;
mod mocks;

pub use assertions::{
    assert_event_statuses, assert_no_events_for_stage, assert_payload_only_on_final_stage,
    assert_single_error_for_stage, assert_steps_sequential,
};
pub use mocks::{linear_stages, RecordedCall, ScriptedGateway, ScriptedReply};

pub use crate::events::CollectingProgressSink;
