//! Newline-delimited JSON framing over a progress channel.

use crate::core::ProgressEvent;
use futures::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tracing::warn;

/// A stream of NDJSON frames read from a progress channel.
///
/// Each item is one serialized [`ProgressEvent`] followed by `\n`. The
/// stream ends right after the pipeline-level terminal frame, or when every
/// sender is gone.
#[derive(Debug)]
pub struct NdjsonFrames {
    rx: mpsc::Receiver<ProgressEvent>,
    finished: bool,
}

impl NdjsonFrames {
    /// Wraps a progress receiver.
    #[must_use]
    pub fn new(rx: mpsc::Receiver<ProgressEvent>) -> Self {
        Self { rx, finished: false }
    }
}

impl Stream for NdjsonFrames {
    type Item = String;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            if self.finished {
                return Poll::Ready(None);
            }

            match self.rx.poll_recv(cx) {
                Poll::Ready(Some(event)) => {
                    if event.closes_stream() {
                        self.finished = true;
                        self.rx.close();
                    }
                    match event.to_frame() {
                        Ok(frame) => return Poll::Ready(Some(frame)),
                        Err(e) => warn!(step = event.step, error = %e, "Skipping unserializable progress event"),
                    }
                }
                Poll::Ready(None) => {
                    self.finished = true;
                    return Poll::Ready(None);
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ProgressStatus;
    use futures::StreamExt;

    #[tokio::test]
    async fn test_stream_ends_after_terminal_frame() {
        let (tx, rx) = mpsc::channel(8);
        tx.send(ProgressEvent::new(0, "P", ProgressStatus::Working, "start")).await.unwrap();
        tx.send(ProgressEvent::new(1, "P", ProgressStatus::Complete, "done")).await.unwrap();

        let frames: Vec<String> = NdjsonFrames::new(rx).collect().await;
        assert_eq!(frames.len(), 2);
        assert!(frames.iter().all(|f| f.ends_with('\n')));

        assert!(tx.send(ProgressEvent::new(2, "P", ProgressStatus::Working, "late")).await.is_err());
    }

    #[tokio::test]
    async fn test_stage_complete_does_not_end_stream() {
        let (tx, rx) = mpsc::channel(8);
        tx.send(ProgressEvent::new(0, "A", ProgressStatus::Complete, "stage").for_stage(1))
            .await
            .unwrap();
        tx.send(ProgressEvent::new(1, "P", ProgressStatus::Error, "failed")).await.unwrap();

        let frames: Vec<String> = NdjsonFrames::new(rx).collect().await;
        assert_eq!(frames.len(), 2);

        let last: serde_json::Value = serde_json::from_str(frames[1].trim_end()).unwrap();
        assert_eq!(last["status"], "error");
    }

    #[tokio::test]
    async fn test_stream_ends_when_senders_drop() {
        let (tx, rx) = mpsc::channel(8);
        tx.send(ProgressEvent::new(0, "P", ProgressStatus::Working, "start")).await.unwrap();
        drop(tx);

        let frames: Vec<String> = NdjsonFrames::new(rx).collect().await;
        assert_eq!(frames.len(), 1);
    }
}
