//! Bounded channel sink that drops instead of blocking.

use super::ProgressSink;
use crate::core::ProgressEvent;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::warn;

/// Delivery counters for a channel sink.
#[derive(Debug, Default)]
pub struct DeliveryMetrics {
    delivered: AtomicU64,
    dropped: AtomicU64,
}

impl DeliveryMetrics {
    /// Records a delivered event.
    pub fn record_delivery(&self) {
        self.delivered.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a dropped event.
    pub fn record_drop(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the number of delivered events.
    #[must_use]
    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    /// Returns the number of dropped events.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// A sink that pushes events into a bounded channel.
///
/// `try_emit` never waits: when the channel is full or the receiver is gone
/// the event is dropped and counted.
#[derive(Debug)]
pub struct ChannelProgressSink {
    tx: mpsc::Sender<ProgressEvent>,
    capacity: usize,
    metrics: Arc<DeliveryMetrics>,
}

impl ChannelProgressSink {
    /// Creates a sink and the receiver a consumer reads from.
    ///
    /// A capacity of zero is raised to one.
    #[must_use]
    pub fn channel(capacity: usize) -> (Arc<Self>, mpsc::Receiver<ProgressEvent>) {
        let capacity = capacity.max(1);
        let (tx, rx) = mpsc::channel(capacity);
        let sink = Arc::new(Self {
            tx,
            capacity,
            metrics: Arc::new(DeliveryMetrics::default()),
        });
        (sink, rx)
    }

    /// Returns the number of events waiting in the channel.
    #[must_use]
    pub fn queue_size(&self) -> usize {
        self.capacity - self.tx.capacity()
    }

    /// Returns true once the receiver has been dropped.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Returns the delivery metrics, shared with the sink.
    #[must_use]
    pub fn metrics(&self) -> Arc<DeliveryMetrics> {
        Arc::clone(&self.metrics)
    }
}

impl ProgressSink for ChannelProgressSink {
    fn try_emit(&self, event: ProgressEvent) {
        let step = event.step;
        match self.tx.try_send(event) {
            Ok(()) => self.metrics.record_delivery(),
            Err(err) => {
                self.metrics.record_drop();
                let reason = match err {
                    mpsc::error::TrySendError::Full(_) => "full",
                    mpsc::error::TrySendError::Closed(_) => "closed",
                };
                warn!(
                    step,
                    reason,
                    queue_size = self.queue_size(),
                    dropped_total = self.metrics.dropped(),
                    "Progress event dropped"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ProgressStatus;

    fn event(step: u64) -> ProgressEvent {
        ProgressEvent::new(step, "A", ProgressStatus::Working, "m")
    }

    #[test]
    fn test_metrics_default() {
        let metrics = DeliveryMetrics::default();
        assert_eq!(metrics.delivered(), 0);
        assert_eq!(metrics.dropped(), 0);
    }

    #[test]
    fn test_metrics_recording() {
        let metrics = DeliveryMetrics::default();
        metrics.record_delivery();
        metrics.record_delivery();
        metrics.record_drop();

        assert_eq!(metrics.delivered(), 2);
        assert_eq!(metrics.dropped(), 1);
    }

    #[tokio::test]
    async fn test_try_emit_delivers() {
        let (sink, mut rx) = ChannelProgressSink::channel(4);
        sink.try_emit(event(0));

        assert_eq!(sink.queue_size(), 1);
        assert_eq!(rx.recv().await.unwrap().step, 0);
        assert_eq!(sink.metrics().delivered(), 1);
    }

    #[tokio::test]
    async fn test_try_emit_drops_when_full() {
        let (sink, mut rx) = ChannelProgressSink::channel(2);
        for step in 0..5 {
            sink.try_emit(event(step));
        }

        assert_eq!(sink.metrics().delivered(), 2);
        assert_eq!(sink.metrics().dropped(), 3);
        assert_eq!(rx.recv().await.unwrap().step, 0);
        assert_eq!(rx.recv().await.unwrap().step, 1);
    }

    #[tokio::test]
    async fn test_try_emit_drops_when_closed() {
        let (sink, rx) = ChannelProgressSink::channel(2);
        drop(rx);

        assert!(sink.is_closed());
        sink.try_emit(event(0));
        assert_eq!(sink.metrics().dropped(), 1);
    }

    #[tokio::test]
    async fn test_zero_capacity_is_raised() {
        let (sink, _rx) = ChannelProgressSink::channel(0);
        sink.try_emit(event(0));
        assert_eq!(sink.metrics().delivered(), 1);
    }
}
