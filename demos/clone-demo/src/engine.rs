use std::time::Duration;

use chorus::{AudioChunk, EngineFault, SpeechEngine, SynthesisInput, SynthesisMode};
use rand::{thread_rng, Rng};

const SAMPLE_RATE: u32 = 24_000;

/// A stand-in engine that "synthesizes" a sine tone per word.
///
/// Sleeps to imitate GPU latency and faults on request texts containing
/// "unpronounceable", so the demo shows fault isolation within a batch.
pub struct SineEngine;

impl SineEngine {
    pub fn new() -> Self {
        Self
    }
}

impl SpeechEngine for SineEngine {
    type Chunks = std::vec::IntoIter<Result<AudioChunk, EngineFault>>;

    fn synthesize(&mut self, input: &SynthesisInput) -> Result<Self::Chunks, EngineFault> {
        let mut rng = thread_rng();
        std::thread::sleep(Duration::from_millis(rng.gen_range(20..80)));

        if input.text.contains("unpronounceable") {
            return Err(EngineFault::new(format!(
                "cannot synthesize '{}'",
                input.text
            )));
        }

        let pitch = match &input.mode {
            SynthesisMode::Instruct { .. } => 330.0,
            SynthesisMode::ZeroShot { .. } => 220.0,
        };

        let chunks = input
            .text
            .split_whitespace()
            .map(|word| {
                let samples = (0..SAMPLE_RATE as usize / 10)
                    .map(|i| {
                        let t = i as f32 / SAMPLE_RATE as f32;
                        (t * pitch * (word.len() as f32) * std::f32::consts::TAU).sin() * 0.3
                    })
                    .collect();
                Ok(AudioChunk::new(samples, SAMPLE_RATE))
            })
            .collect::<Vec<_>>();

        Ok(chunks.into_iter())
    }
}
