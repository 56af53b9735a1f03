//! Progress event type carried on the streaming transport.

use super::ProgressStatus;
use serde::{Deserialize, Serialize};

/// One unit of the streamed status sequence.
///
/// `step` is the emission sequence number within a run: it starts at 0 for
/// the pipeline "started" event and increases by one for every event after
/// it. `stage` holds the 1-based ordinal of the stage an event belongs to and
/// is absent on pipeline-level events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// Emission sequence number.
    pub step: u64,

    /// Human-readable label of the agent doing the work.
    #[serde(rename = "agent")]
    pub agent_label: String,

    /// Event status.
    pub status: ProgressStatus,

    /// Human-readable message.
    pub message: String,

    /// 1-based stage ordinal; `None` for pipeline-level events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<usize>,

    /// Optional payload.
    #[serde(default, rename = "data", skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,

    /// When the event was emitted (ISO 8601).
    pub timestamp: String,
}

impl ProgressEvent {
    /// Creates a new event stamped with the current time.
    #[must_use]
    pub fn new(
        step: u64,
        agent_label: impl Into<String>,
        status: ProgressStatus,
        message: impl Into<String>,
    ) -> Self {
        Self {
            step,
            agent_label: agent_label.into(),
            status,
            message: message.into(),
            stage: None,
            payload: None,
            timestamp: crate::utils::iso_timestamp(),
        }
    }

    /// Attaches the stage ordinal.
    #[must_use]
    pub fn for_stage(mut self, ordinal: usize) -> Self {
        self.stage = Some(ordinal);
        self
    }

    /// Attaches a payload.
    #[must_use]
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Returns true for events that describe the pipeline as a whole.
    #[must_use]
    pub fn is_pipeline_level(&self) -> bool {
        self.stage.is_none()
    }

    /// Returns true for the pipeline-level `Complete` or `Error` event that
    /// closes a stream.
    #[must_use]
    pub fn closes_stream(&self) -> bool {
        self.is_pipeline_level() && self.status.is_terminal()
    }

    /// Serializes the event as one newline-terminated JSON frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be serialized.
    pub fn to_frame(&self) -> Result<String, serde_json::Error> {
        let mut frame = serde_json::to_string(self)?;
        frame.push('\n');
        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_creation() {
        let event = ProgressEvent::new(0, "Pipeline", ProgressStatus::Working, "Initializing");
        assert_eq!(event.step, 0);
        assert!(event.is_pipeline_level());
        assert!(!event.closes_stream());
        assert!(event.payload.is_none());
    }

    #[test]
    fn test_stage_event_does_not_close_stream() {
        let event = ProgressEvent::new(2, "Optimizer", ProgressStatus::Complete, "done").for_stage(1);
        assert!(!event.is_pipeline_level());
        assert!(!event.closes_stream());
    }

    #[test]
    fn test_pipeline_error_closes_stream() {
        let event = ProgressEvent::new(4, "Pipeline", ProgressStatus::Error, "failed");
        assert!(event.closes_stream());
    }

    #[test]
    fn test_frame_wire_fields() {
        let event = ProgressEvent::new(3, "Brutalist Optimizer", ProgressStatus::Complete, "ok")
            .for_stage(2)
            .with_payload(serde_json::json!({"output": "text"}));

        let frame = event.to_frame().unwrap();
        assert!(frame.ends_with('\n'));
        assert_eq!(frame.matches('\n').count(), 1);

        let value: serde_json::Value = serde_json::from_str(frame.trim_end()).unwrap();
        assert_eq!(value["step"], 3);
        assert_eq!(value["agent"], "Brutalist Optimizer");
        assert_eq!(value["status"], "complete");
        assert_eq!(value["message"], "ok");
        assert_eq!(value["stage"], 2);
        assert_eq!(value["data"]["output"], "text");
    }

    #[test]
    fn test_frame_omits_absent_payload() {
        let frame = ProgressEvent::new(1, "A", ProgressStatus::Working, "m")
            .for_stage(1)
            .to_frame()
            .unwrap();
        assert!(!frame.contains("\"data\""));
    }
}
