//! Forward-only event stream of a pipeline run.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use uuid::Uuid;

use crate::event::PipelineEvent;

/// Events of one pipeline run.
///
/// The stream ends after the terminal event. Dropping it cancels the run at
/// its next event.
pub struct EventStream {
    request_id: Uuid,
    inner: ReceiverStream<PipelineEvent>,
}

impl EventStream {
    pub(crate) fn new(request_id: Uuid, receiver: mpsc::Receiver<PipelineEvent>) -> Self {
        Self {
            request_id,
            inner: ReceiverStream::new(receiver),
        }
    }

    /// Returns the ID of the request driving this stream.
    pub fn request_id(&self) -> Uuid {
        self.request_id
    }
}

impl Stream for EventStream {
    type Item = PipelineEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl std::fmt::Debug for EventStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventStream")
            .field("request_id", &self.request_id)
            .finish_non_exhaustive()
    }
}
