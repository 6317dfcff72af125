//! # Micro-batching scheduler
//!
//! The control core of the crate: accepts arbitrary numbers of concurrent
//! synthesis requests, groups them into bounded batches under a time budget,
//! serializes their execution against the one non-re-entrant engine, and
//! delivers each caller its own result without callers blocking each other
//! beyond the batching window.
//!
//! ## Key components
//!
//! * [`SpeechEngine`] - the contract for the opaque synthesis resource
//! * [`SpeechBatcher`] - the submission seam callers talk to
//! * [`Scheduler`] - the long-lived loop implementing both collection and
//!   execution
//! * [`SchedulerState`] - the `Stopped -> Running -> Draining -> Stopped`
//!   lifecycle
//!
//! ## Guarantees
//!
//! - At most one engine invocation is in flight at any time.
//! - Tasks execute in arrival order, within and across batches.
//! - A fault in one task never disturbs its batch siblings or the loop.
//! - Every accepted task receives exactly one terminal message.
//! - Shutdown drains: queued work completes, new work is refused.
//!
//! ## Example
//!
//! ```rust
//! use chorus::{
//!     AudioChunk, EngineFault, Scheduler, SchedulerConfig, SpeechBatcher,
//!     SpeechEngine, SynthesisInput, SynthesisRequest, VoiceReference,
//! };
//!
//! struct ToneEngine;
//!
//! impl SpeechEngine for ToneEngine {
//!     type Chunks = std::vec::IntoIter<Result<AudioChunk, EngineFault>>;
//!
//!     fn synthesize(&mut self, input: &SynthesisInput) -> Result<Self::Chunks, EngineFault> {
//!         let chunk = AudioChunk::new(vec![0.0; input.text.len()], 24_000);
//!         Ok(vec![Ok(chunk)].into_iter())
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), chorus::Error> {
//! let scheduler = Scheduler::start(ToneEngine, SchedulerConfig::default())?;
//!
//! let reference = VoiceReference::new("/voices/prompt.wav");
//! let handle = scheduler
//!     .submit(SynthesisRequest::zero_shot("hello", reference))
//!     .await?;
//! let audio = handle.audio().await?;
//! assert!(!audio.is_empty());
//!
//! scheduler.shutdown().await;
//! # Ok(())
//! # }
//! ```

mod batcher;
mod collector;
mod core_trait;
mod executor;
mod worker;

pub use batcher::Scheduler;
pub use core_trait::{SpeechBatcher, SpeechEngine};
pub use worker::SchedulerState;
