//! Assertions over collected progress events.

use crate::core::{ProgressEvent, ProgressStatus};

/// Asserts that steps run 0, 1, 2, ... with no gaps or repeats.
pub fn assert_steps_sequential(events: &[ProgressEvent]) {
    let steps: Vec<u64> = events.iter().map(|e| e.step).collect();
    let expected: Vec<u64> = (0u64..).take(steps.len()).collect();
    assert_eq!(steps, expected, "Expected sequential steps, got {steps:?}");
}

/// Asserts the exact status sequence of `events`.
pub fn assert_event_statuses(events: &[ProgressEvent], expected: &[ProgressStatus]) {
    let actual: Vec<ProgressStatus> = events.iter().map(|e| e.status).collect();
    assert_eq!(
        actual, expected,
        "Expected statuses {expected:?}, got {actual:?}"
    );
}

/// Asserts that stage `ordinal` has exactly one `Error` event.
pub fn assert_single_error_for_stage(events: &[ProgressEvent], ordinal: usize) {
    let errors = events
        .iter()
        .filter(|e| e.stage == Some(ordinal) && e.status == ProgressStatus::Error)
        .count();
    assert_eq!(
        errors, 1,
        "Expected exactly one error event for stage {ordinal}, got {errors}"
    );
}

/// Asserts that stage `ordinal` emitted nothing.
pub fn assert_no_events_for_stage(events: &[ProgressEvent], ordinal: usize) {
    let found: Vec<&ProgressEvent> = events.iter().filter(|e| e.stage == Some(ordinal)).collect();
    assert!(
        found.is_empty(),
        "Expected no events for stage {ordinal}, got {found:?}"
    );
}

/// Asserts that only the `Complete` event of stage `last_ordinal` carries
/// a payload.
pub fn assert_payload_only_on_final_stage(events: &[ProgressEvent], last_ordinal: usize) {
    for event in events {
        let is_final = event.stage == Some(last_ordinal) && event.status == ProgressStatus::Complete;
        assert_eq!(
            event.payload.is_some(),
            is_final,
            "Unexpected payload state on step {}: {event:?}",
            event.step
        );
    }
}
