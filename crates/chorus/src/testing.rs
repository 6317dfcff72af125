//! Scriptable engine used by the unit tests.
//!
//! Behavior is keyed off the request text, so a test can mix outcomes within
//! one batch: `!fault` fails at invocation, `!midfault` fails after the first
//! chunk, `!panic` panics inside the engine. Anything else synthesizes two
//! chunks sized to the text. An atomic high-water mark records the largest
//! number of overlapping invocations ever observed.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::audio::AudioChunk;
use crate::error::EngineFault;
use crate::request::{SynthesisInput, SynthesisMode, VoiceReference};
use crate::scheduler::SpeechEngine;

pub(crate) struct MockEngine {
    calls: Arc<AtomicUsize>,
    concurrent: Arc<AtomicUsize>,
    max_concurrent: Arc<AtomicUsize>,
    latency: Duration,
}

impl Default for MockEngine {
    fn default() -> Self {
        Self::with_latency(Duration::ZERO)
    }
}

impl MockEngine {
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            concurrent: Arc::new(AtomicUsize::new(0)),
            max_concurrent: Arc::new(AtomicUsize::new(0)),
            latency,
        }
    }

    /// Counter of completed invocations.
    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }

    /// High-water mark of overlapping invocations; must never exceed 1.
    pub fn max_concurrent(&self) -> Arc<AtomicUsize> {
        self.max_concurrent.clone()
    }

    /// Convenience input with a zero-shot mode and a fixed reference.
    pub fn input(text: &str) -> SynthesisInput {
        SynthesisInput {
            text: text.into(),
            mode: SynthesisMode::ZeroShot { transcript: None },
            reference: VoiceReference::new("/tmp/prompt.wav"),
        }
    }
}

impl SpeechEngine for MockEngine {
    type Chunks = std::vec::IntoIter<Result<AudioChunk, EngineFault>>;

    fn synthesize(&mut self, input: &SynthesisInput) -> Result<Self::Chunks, EngineFault> {
        // Decrement on unwind too, so a scripted panic does not skew the
        // high-water mark for later invocations.
        struct InFlight(Arc<AtomicUsize>);
        impl Drop for InFlight {
            fn drop(&mut self) {
                self.0.fetch_sub(1, Ordering::SeqCst);
            }
        }

        let now = self.concurrent.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_concurrent.fetch_max(now, Ordering::SeqCst);
        let _in_flight = InFlight(self.concurrent.clone());

        let outcome = (|| {
            if !self.latency.is_zero() {
                std::thread::sleep(self.latency);
            }
            if input.text.contains("!panic") {
                panic!("scripted engine panic");
            }
            if input.text.contains("!fault") {
                return Err(EngineFault::new(format!(
                    "scripted fault for '{}'",
                    input.text
                )));
            }

            let chunk = AudioChunk::new(vec![0.25; input.text.len().max(1)], 24_000);
            if input.text.contains("!midfault") {
                return Ok(vec![
                    Ok(chunk),
                    Err(EngineFault::new("scripted mid-sequence fault")),
                ]
                .into_iter());
            }
            Ok(vec![Ok(chunk.clone()), Ok(chunk)].into_iter())
        })();

        self.calls.fetch_add(1, Ordering::SeqCst);
        outcome
    }
}
