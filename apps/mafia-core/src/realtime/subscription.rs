use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::Stream;

use crate::domain::Notification;

/// A player's live event feed, returned by `Subscribe`.
///
/// Ends when the player departs, the session is evicted, or a newer
/// subscription replaces this one. Events already buffered are still
/// yielded before the end.
#[derive(Debug)]
pub struct NotificationStream {
    inner: ReceiverStream<Notification>,
}

impl NotificationStream {
    pub(crate) fn new(receiver: mpsc::Receiver<Notification>) -> Self {
        Self {
            inner: ReceiverStream::new(receiver),
        }
    }

    /// Next event, or `None` once the feed has ended.
    pub async fn recv(&mut self) -> Option<Notification> {
        self.inner.as_mut().recv().await
    }

    /// Non-blocking poll for an already-buffered event.
    pub fn try_recv(&mut self) -> Option<Notification> {
        self.inner.as_mut().try_recv().ok()
    }
}

impl Stream for NotificationStream {
    type Item = Notification;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
