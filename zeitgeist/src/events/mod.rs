//! Progress event delivery.
//!
//! The emitter sequences events for a run, sinks decide where they go, and
//! [`NdjsonFrames`] turns a channel of events into the newline-delimited JSON
//! stream a transport writes out.

mod backpressure;
mod emitter;
mod ndjson;
mod sink;

pub use backpressure::{ChannelProgressSink, DeliveryMetrics};
pub use emitter::ProgressEmitter;
pub use ndjson::NdjsonFrames;
pub use sink::{
    CollectingProgressSink, LoggingProgressSink, NoOpProgressSink, ProgressSink, TeeProgressSink,
};

use std::sync::Arc;

/// Creates a bounded channel sink and the NDJSON frame stream reading from it.
#[must_use]
pub fn ndjson_channel(capacity: usize) -> (Arc<ChannelProgressSink>, NdjsonFrames) {
    let (sink, rx) = ChannelProgressSink::channel(capacity);
    (sink, NdjsonFrames::new(rx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn test_ndjson_channel_end_to_end() {
        let (sink, frames) = ndjson_channel(16);
        let mut emitter = ProgressEmitter::new(sink, "Pipeline");
        emitter.started(0).await;
        emitter.pipeline_complete().await;
        drop(emitter);

        let frames: Vec<String> = frames.collect().await;
        assert_eq!(frames.len(), 2);
        assert!(frames[1].contains("\"status\":\"complete\""));
    }
}
