//! # Result stream adapters
//!
//! Bridges a task's result channel to the caller's transport. A
//! [`SpeechHandle`] is the awaitable side returned by submission; it resolves
//! the task's single terminal message either as one buffer
//! ([`SpeechHandle::audio`]) or as a chunk stream ([`SpeechHandle::stream`]).
//!
//! The adapter owns the request's [`ScopedResource`] and releases it once the
//! terminal state is reached — success, fault, wait timeout, or the caller
//! dropping the stream mid-relay. Release is exactly-once on every path.

use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use futures::{Future, Stream, StreamExt};
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use crate::audio::AudioChunk;
use crate::communication::TaskResult;
use crate::error::{Error, Result};
use crate::request::ScopedResource;

/// The caller's handle to a submitted task.
///
/// Submission returns immediately; the handle is how the caller later awaits
/// the terminal message. Dropping the handle abandons the result (the engine
/// still runs the task and the output is discarded) and releases the scoped
/// resource.
#[derive(Debug)]
pub struct SpeechHandle {
    id: Uuid,
    receiver: oneshot::Receiver<TaskResult>,
    scope: Option<ScopedResource>,
}

impl SpeechHandle {
    pub(crate) fn new(
        id: Uuid,
        receiver: oneshot::Receiver<TaskResult>,
        scope: Option<ScopedResource>,
    ) -> Self {
        Self {
            id,
            receiver,
            scope,
        }
    }

    /// The task's process-unique identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Complete-buffer mode: waits for the terminal message and returns all
    /// chunks at once.
    pub async fn audio(self) -> Result<Vec<AudioChunk>> {
        let SpeechHandle {
            receiver,
            scope: _scope,
            ..
        } = self;
        match receiver.await {
            Ok(Ok(chunks)) => Ok(chunks),
            Ok(Err(fault)) => Err(Error::Engine(fault)),
            // Sender gone without a terminal message: the loop was torn down
            // underneath us.
            Err(_) => Err(Error::SchedulerUnavailable),
        }
    }

    /// Like [`audio`](Self::audio), but gives up after `wait`.
    ///
    /// Giving up is a caller-side disconnect: the scoped resource is
    /// released, the engine-side work is discarded when it completes.
    pub async fn audio_timeout(self, wait: Duration) -> Result<Vec<AudioChunk>> {
        match tokio::time::timeout(wait, self.audio()).await {
            Ok(result) => result,
            Err(_) => Err(Error::TransportAborted),
        }
    }

    /// Chunked mode: converts the handle into a stream of chunks.
    pub fn stream(self) -> SpeechStream {
        SpeechStream {
            id: self.id,
            state: StreamState::Waiting(self.receiver),
            scope: self.scope,
        }
    }
}

enum StreamState {
    /// Terminal message not yet observed.
    Waiting(oneshot::Receiver<TaskResult>),
    /// Success observed; chunks being relayed one by one.
    Streaming(std::vec::IntoIter<AudioChunk>),
    Done,
}

/// A caller-visible stream over one task's chunks.
///
/// Yields each chunk in production order, or a single error item when the
/// task faulted, then ends. Implements [`Stream`] so it composes with the
/// usual combinators and chunked HTTP bodies.
pub struct SpeechStream {
    id: Uuid,
    state: StreamState,
    scope: Option<ScopedResource>,
}

impl SpeechStream {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Relays every chunk into a transport sink.
    ///
    /// Returns [`Error::TransportAborted`] when the sink's receiving side
    /// hangs up mid-stream; the scoped resource is released either way and
    /// sibling tasks are untouched.
    pub async fn relay(mut self, sink: mpsc::Sender<AudioChunk>) -> Result<()> {
        while let Some(next) = self.next().await {
            let chunk = next?;
            if sink.send(chunk).await.is_err() {
                return Err(Error::TransportAborted);
            }
        }
        Ok(())
    }

    fn finish(&mut self) {
        self.state = StreamState::Done;
        if let Some(scope) = self.scope.as_mut() {
            scope.release();
        }
    }
}

impl Stream for SpeechStream {
    type Item = Result<AudioChunk>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            match &mut this.state {
                StreamState::Waiting(receiver) => match Pin::new(receiver).poll(cx) {
                    Poll::Pending => return Poll::Pending,
                    Poll::Ready(Ok(Ok(chunks))) => {
                        this.state = StreamState::Streaming(chunks.into_iter());
                    }
                    Poll::Ready(Ok(Err(fault))) => {
                        this.finish();
                        return Poll::Ready(Some(Err(Error::Engine(fault))));
                    }
                    Poll::Ready(Err(_)) => {
                        this.finish();
                        return Poll::Ready(Some(Err(Error::SchedulerUnavailable)));
                    }
                },
                StreamState::Streaming(chunks) => match chunks.next() {
                    Some(chunk) => return Poll::Ready(Some(Ok(chunk))),
                    None => {
                        this.finish();
                        return Poll::Ready(None);
                    }
                },
                StreamState::Done => return Poll::Ready(None),
            }
        }
    }
}
