//! Progress sink trait and implementations.

use crate::core::ProgressEvent;
use std::sync::Arc;
use tracing::{debug, info, warn, Level};

/// Trait for consumers of progress events.
pub trait ProgressSink: Send + Sync {
    /// Delivers an event without blocking.
    ///
    /// Must never panic. Events that cannot be delivered right away are
    /// dropped.
    fn try_emit(&self, event: ProgressEvent);
}

/// A sink that discards all events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpProgressSink;

impl ProgressSink for NoOpProgressSink {
    fn try_emit(&self, _event: ProgressEvent) {}
}

/// A sink that mirrors events to the tracing framework.
#[derive(Debug, Clone)]
pub struct LoggingProgressSink {
    level: Level,
}

impl Default for LoggingProgressSink {
    fn default() -> Self {
        Self { level: Level::INFO }
    }
}

impl LoggingProgressSink {
    /// Creates a logging sink with the specified level.
    #[must_use]
    pub fn new(level: Level) -> Self {
        Self { level }
    }

    /// Creates a debug-level logging sink.
    #[must_use]
    pub fn debug() -> Self {
        Self::new(Level::DEBUG)
    }

    fn log_event(&self, event: &ProgressEvent) {
        if event.status == crate::core::ProgressStatus::Error {
            warn!(
                step = event.step,
                agent = %event.agent_label,
                stage = ?event.stage,
                "Progress: {}", event.message
            );
            return;
        }

        if self.level == Level::DEBUG {
            debug!(
                step = event.step,
                agent = %event.agent_label,
                status = %event.status,
                stage = ?event.stage,
                "Progress: {}", event.message
            );
        } else {
            info!(
                step = event.step,
                agent = %event.agent_label,
                status = %event.status,
                stage = ?event.stage,
                "Progress: {}", event.message
            );
        }
    }
}

impl ProgressSink for LoggingProgressSink {
    fn try_emit(&self, event: ProgressEvent) {
        self.log_event(&event);
    }
}

/// Forwards every event to several sinks in order.
#[derive(Clone, Default)]
pub struct TeeProgressSink {
    sinks: Vec<Arc<dyn ProgressSink>>,
}

impl std::fmt::Debug for TeeProgressSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TeeProgressSink")
            .field("sinks", &self.sinks.len())
            .finish()
    }
}

impl TeeProgressSink {
    /// Creates a tee over the given sinks.
    #[must_use]
    pub fn new(sinks: Vec<Arc<dyn ProgressSink>>) -> Self {
        Self { sinks }
    }

    /// Adds a sink.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.sinks.push(sink);
        self
    }
}

impl ProgressSink for TeeProgressSink {
    fn try_emit(&self, event: ProgressEvent) {
        for sink in &self.sinks {
            sink.try_emit(event.clone());
        }
    }
}

/// A sink that keeps every event in memory.
#[derive(Debug, Default)]
pub struct CollectingProgressSink {
    events: parking_lot::RwLock<Vec<ProgressEvent>>,
}

impl CollectingProgressSink {
    /// Creates a new collecting sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected events.
    #[must_use]
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.read().clone()
    }

    /// Returns the number of collected events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// Returns true if no events have been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Returns the events belonging to one stage ordinal.
    #[must_use]
    pub fn events_for_stage(&self, ordinal: usize) -> Vec<ProgressEvent> {
        self.events
            .read()
            .iter()
            .filter(|e| e.stage == Some(ordinal))
            .cloned()
            .collect()
    }

    /// Clears all collected events.
    pub fn clear(&self) {
        self.events.write().clear();
    }
}

impl ProgressSink for CollectingProgressSink {
    fn try_emit(&self, event: ProgressEvent) {
        self.events.write().push(event);
    }
}
