//! Cancellation and deadline control for in-flight streams.
//!
//! Early termination is a first-class control path, not a side effect: the
//! consumer either returns [`ChunkAction::Stop`] from a handler or trips a
//! [`CancelHandle`], and the dispatcher aborts the in-flight read and
//! releases the connection. Chunks already delivered are never retracted.

use crate::pipeline::ChunkStream;
use crate::types::ResponseChunk;
use crate::{Error, Result};
use futures::Stream;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::watch;
use tokio::time::Instant;

/// Consumer verdict after each delivered chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkAction {
    /// Keep consuming.
    Continue,
    /// Abort the exchange; the call ends in `Cancelled`.
    Stop,
}

/// Handle for cooperative cancellation of one call.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Trip the cancel signal. Idempotent; takes effect before the next
    /// chunk read, or immediately for a read already in flight.
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }
}

/// Create a linked cancel handle and receiver.
pub fn cancel_pair() -> (CancelHandle, watch::Receiver<bool>) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, rx)
}

/// A chunk stream guarded by a cancel signal and an optional deadline.
///
/// Both are checked before each chunk read and also interrupt a read that is
/// already pending. After any terminal item the stream is fused.
pub struct ControlledStream {
    inner: ChunkStream,
    cancel: Option<Pin<Box<dyn Future<Output = ()> + Send>>>,
    deadline: Option<Deadline>,
    finished: bool,
}

/// The timer wakes a pending read when the deadline passes; the raw instant
/// is kept as well because a timer for an already-past deadline is not
/// guaranteed ready on its first poll.
struct Deadline {
    at: Instant,
    sleep: Pin<Box<tokio::time::Sleep>>,
}

impl ControlledStream {
    pub(crate) fn new(
        inner: ChunkStream,
        cancel: Option<watch::Receiver<bool>>,
        deadline: Option<Instant>,
    ) -> Self {
        let cancel = cancel.map(|mut rx| {
            Box::pin(async move {
                // Resolves once the handle fires; a dropped handle can
                // never fire, so pending-forever is the correct fallback.
                if rx.wait_for(|cancelled| *cancelled).await.is_err() {
                    std::future::pending::<()>().await;
                }
            }) as Pin<Box<dyn Future<Output = ()> + Send>>
        });
        Self {
            inner,
            cancel,
            deadline: deadline.map(|at| Deadline {
                at,
                sleep: Box::pin(tokio::time::sleep_until(at)),
            }),
            finished: false,
        }
    }
}

impl Stream for ControlledStream {
    type Item = Result<ResponseChunk>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.finished {
            return Poll::Ready(None);
        }

        if let Some(cancel) = this.cancel.as_mut() {
            if cancel.as_mut().poll(cx).is_ready() {
                this.finished = true;
                return Poll::Ready(Some(Err(Error::Cancelled)));
            }
        }

        if let Some(deadline) = this.deadline.as_mut() {
            if Instant::now() >= deadline.at || deadline.sleep.as_mut().poll(cx).is_ready() {
                this.finished = true;
                return Poll::Ready(Some(Err(Error::TimedOut)));
            }
        }

        match this.inner.as_mut().poll_next(cx) {
            Poll::Ready(Some(Err(e))) => {
                this.finished = true;
                Poll::Ready(Some(Err(e)))
            }
            Poll::Ready(None) => {
                this.finished = true;
                Poll::Ready(None)
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    fn chunk(content: &str, done: bool) -> ResponseChunk {
        ResponseChunk::Completion {
            content: content.into(),
            done,
        }
    }

    #[tokio::test]
    async fn passes_chunks_through_when_not_cancelled() {
        let inner: ChunkStream = Box::pin(futures::stream::iter(vec![
            Ok(chunk("a", false)),
            Ok(chunk("b", true)),
        ]));
        let (_handle, rx) = cancel_pair();
        let mut stream = ControlledStream::new(inner, Some(rx), None);

        assert_eq!(stream.next().await.unwrap().unwrap().fragment(), "a");
        assert!(stream.next().await.unwrap().unwrap().is_done());
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn cancel_trips_before_the_next_read() {
        let inner: ChunkStream = Box::pin(futures::stream::iter(vec![
            Ok(chunk("a", false)),
            Ok(chunk("b", true)),
        ]));
        let (handle, rx) = cancel_pair();
        let mut stream = ControlledStream::new(inner, Some(rx), None);

        assert_eq!(stream.next().await.unwrap().unwrap().fragment(), "a");
        handle.cancel();
        let err = stream.next().await.unwrap().unwrap_err();
        assert!(matches!(err, Error::Cancelled));
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn cancel_interrupts_a_pending_read() {
        let inner: ChunkStream = Box::pin(futures::stream::pending());
        let (handle, rx) = cancel_pair();
        let mut stream = ControlledStream::new(inner, Some(rx), None);

        let handle2 = handle.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            handle2.cancel();
        });

        let err = stream.next().await.unwrap().unwrap_err();
        assert!(matches!(err, Error::Cancelled));
    }

    #[tokio::test]
    async fn already_elapsed_deadline_trips_before_the_first_read() {
        // Chunks are sitting ready in the inner stream; the deadline must
        // still win without waiting for a timer tick.
        let inner: ChunkStream = Box::pin(futures::stream::iter(vec![
            Ok(chunk("a", false)),
            Ok(chunk("b", true)),
        ]));
        let mut stream = ControlledStream::new(inner, None, Some(Instant::now()));

        let err = stream.next().await.unwrap().unwrap_err();
        assert!(matches!(err, Error::TimedOut));
        assert!(stream.next().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_trips_as_timed_out() {
        let inner: ChunkStream = Box::pin(futures::stream::pending());
        let deadline = Instant::now() + std::time::Duration::from_millis(50);
        let mut stream = ControlledStream::new(inner, None, Some(deadline));

        let err = stream.next().await.unwrap().unwrap_err();
        assert!(matches!(err, Error::TimedOut));
        assert!(stream.next().await.is_none());
    }
}
