//! Error taxonomy for the scheduler and its callers.
//!
//! Errors split along a hard boundary: [`Error::InvalidRequest`] and
//! [`Error::SchedulerUnavailable`] are rejected synchronously at submission
//! and never produce a task, while an [`EngineFault`] is only ever delivered
//! on the owning task's result channel and never crosses task boundaries.

use thiserror::Error;

/// A failure raised by the speech engine while synthesizing one task.
///
/// Faults are scoped to a single task: the executor catches them, delivers
/// them as that task's terminal message, and carries on with the rest of the
/// batch. The scheduler loop itself never observes them as fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("speech engine fault: {0}")]
pub struct EngineFault(pub String);

impl EngineFault {
    /// Builds a fault from any displayable cause.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Caller-visible errors produced by the scheduler and stream adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The request was malformed or incomplete and was rejected before a
    /// task was created. Never enters the scheduler.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Submission was attempted while the intake queue was closed, either
    /// because the scheduler is shutting down or was never started.
    #[error("scheduler unavailable: intake queue is closed")]
    SchedulerUnavailable,

    /// The engine failed for this specific task.
    #[error(transparent)]
    Engine(#[from] EngineFault),

    /// The caller disconnected before the result was fully relayed. The
    /// request's scoped resource is still released; sibling tasks and the
    /// engine are unaffected.
    #[error("transport aborted: caller disconnected before relay completed")]
    TransportAborted,
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
