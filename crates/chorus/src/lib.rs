//! # Chorus
//!
//! A micro-batching scheduler that exposes one expensive, stateful speech
//! synthesis engine to many concurrent callers through a request/stream
//! interface.
//!
//! ## Overview
//!
//! Generative speech models are usually non-re-entrant: one handle, one job
//! at a time, seconds of GPU work per job. Serving such a model to concurrent
//! callers needs admission discipline more than it needs parallelism. Chorus
//! provides that discipline:
//!
//! - Submissions become **tasks**, each with a private result channel, and
//!   enter a FIFO intake queue without ever waiting on inference.
//! - A **collector** groups queued tasks into batches bounded by a maximum
//!   size and a maximum wait, so a lone request never starves and a burst
//!   never overwhelms.
//! - An **executor** runs each batch strictly sequentially against the
//!   engine on the blocking pool, isolating per-task faults.
//! - A **stream adapter** relays each task's result to its caller, chunked
//!   or buffered, and releases per-request scoped resources on every exit
//!   path.
//!
//! ## Architecture
//!
//! The scheduler loop is the only component with real concurrency
//! coordination; everything around it (HTTP routing, upload parsing, codecs,
//! engine internals) is a collaborator behind a narrow trait boundary:
//!
//! - [`SpeechEngine`] is the contract for the opaque engine: one blocking
//!   invocation in, a lazy finite sequence of [`AudioChunk`]s or an
//!   [`EngineFault`] out.
//! - [`SpeechBatcher`] is the submission seam; [`Scheduler`] is its
//!   production implementation.
//! - [`SpeechHandle`] / [`SpeechStream`] carry results back out.
//!
//! ## Guarantees
//!
//! - The engine is never invoked concurrently with itself.
//! - Tasks execute in arrival order; a fault in one task never affects its
//!   batch siblings or the loop.
//! - Every accepted task receives exactly one terminal message.
//! - Shutdown drains queued work before stopping; late submissions fail fast
//!   with [`Error::SchedulerUnavailable`].

mod audio;
mod communication;
mod config;
mod error;
mod request;
mod scheduler;
mod stream;

#[cfg(test)]
pub(crate) mod testing;

pub use audio::{concat_samples, AudioChunk};
pub use communication::TaskResult;
pub use config::SchedulerConfig;
pub use error::{EngineFault, Error, Result};
pub use request::{
    ScopedResource, SynthesisInput, SynthesisMode, SynthesisRequest, VoiceReference,
};
pub use scheduler::{Scheduler, SchedulerState, SpeechBatcher, SpeechEngine};
pub use stream::{SpeechHandle, SpeechStream};
