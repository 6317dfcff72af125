use async_trait::async_trait;

use crate::audio::AudioChunk;
use crate::error::{EngineFault, Result};
use crate::request::{SynthesisInput, SynthesisRequest};
use crate::stream::SpeechHandle;

/// # SpeechEngine
///
/// The opaque, stateful, non-re-entrant resource performing the actual
/// synthesis.
///
/// One invocation consumes one task's input and produces a lazy, finite,
/// non-restartable sequence of audio chunks — or raises an [`EngineFault`].
/// The engine must surface structured faults, never silent empty output.
///
/// ## Contract
///
/// - `synthesize` is blocking, CPU- or GPU-bound work. The scheduler runs it
///   on the blocking pool, never on its own control flow.
/// - The engine is **not** safe for concurrent invocation. It takes
///   `&mut self` and the scheduler guarantees at most one invocation is in
///   flight at any time, across all tasks and batches.
/// - The returned iterator may fault mid-sequence; the executor stops there
///   and delivers the fault as that task's terminal message.
///
/// ## Example
///
/// ```rust
/// use chorus::{AudioChunk, EngineFault, SpeechEngine, SynthesisInput};
///
/// struct ToneEngine;
///
/// impl SpeechEngine for ToneEngine {
///     type Chunks = std::vec::IntoIter<Result<AudioChunk, EngineFault>>;
///
///     fn synthesize(&mut self, input: &SynthesisInput) -> Result<Self::Chunks, EngineFault> {
///         let chunk = AudioChunk::new(vec![0.0; input.text.len()], 24_000);
///         Ok(vec![Ok(chunk)].into_iter())
///     }
/// }
/// ```
pub trait SpeechEngine: Send + 'static {
    /// The lazy chunk sequence produced by one invocation.
    type Chunks: Iterator<Item = Result<AudioChunk, EngineFault>>;

    /// Synthesizes speech for one task's input.
    ///
    /// Returns the chunk sequence, or a fault if synthesis cannot start.
    fn synthesize(&mut self, input: &SynthesisInput) -> Result<Self::Chunks, EngineFault>;
}

/// # SpeechBatcher
///
/// The submission seam between callers and a batching scheduler.
///
/// Implementations accept a request, validate it, enqueue a task, and return
/// a [`SpeechHandle`] immediately — submission never waits for synthesis to
/// complete. The handle resolves to the task's single terminal message.
#[async_trait]
pub trait SpeechBatcher {
    /// Submits a request for batched synthesis.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidRequest`](crate::Error::InvalidRequest) if the
    ///   request fails boundary validation; no task is created.
    /// - [`Error::SchedulerUnavailable`](crate::Error::SchedulerUnavailable)
    ///   if the intake queue is closed (draining or stopped).
    async fn submit(&self, request: SynthesisRequest) -> Result<SpeechHandle>;
}
