//! # Task
//!
//! The immutable unit of work that flows from submission to execution.
//!
//! A `Task` pairs one caller's [`SynthesisInput`] with a private oneshot
//! sender. Exactly one terminal message — success with the produced chunks,
//! or an [`EngineFault`] — is ever sent on that channel; the executor consumes
//! the sender when it delivers. Tasks are never retried or re-enqueued.

use tokio::sync::oneshot;
use uuid::Uuid;

use crate::audio::AudioChunk;
use crate::error::EngineFault;
use crate::request::SynthesisInput;

/// The single terminal message delivered on a task's result channel.
pub type TaskResult = Result<Vec<AudioChunk>, EngineFault>;

/// One caller's unit of work plus its private result channel.
#[derive(Debug)]
pub struct Task {
    /// Process-unique identifier, generated at submission time.
    id: Uuid,

    /// The input payload. Immutable after creation.
    input: SynthesisInput,

    /// Channel for the terminal message back to the requester.
    sender: oneshot::Sender<TaskResult>,
}

impl Task {
    /// Creates a task with a fresh identifier.
    pub fn new(input: SynthesisInput, sender: oneshot::Sender<TaskResult>) -> Self {
        Self {
            id: Uuid::new_v4(),
            input,
            sender,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn input(&self) -> &SynthesisInput {
        &self.input
    }

    /// Splits the task for execution: the input moves onto the blocking
    /// worker, the sender stays with the executor for delivery.
    pub fn into_parts(self) -> (Uuid, SynthesisInput, oneshot::Sender<TaskResult>) {
        (self.id, self.input, self.sender)
    }
}

impl PartialEq for Task {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Task {}
