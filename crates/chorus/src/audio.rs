//! Audio chunk type shared between the engine and transports.

/// One span of synthesized audio.
///
/// Chunks are produced lazily by the engine and relayed to callers either
/// one at a time (streaming transports) or concatenated (complete-buffer
/// transports).
#[derive(Debug, Clone, PartialEq)]
pub struct AudioChunk {
    /// PCM samples, mono, `-1.0..=1.0`.
    pub samples: Vec<f32>,

    /// Sample rate of this chunk in Hz.
    pub sample_rate: u32,
}

impl AudioChunk {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Number of samples in this chunk.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration of this chunk in seconds.
    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }

    /// Raw little-endian f32 bytes, the wire shape streaming transports send.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.samples.len() * 4);
        for sample in &self.samples {
            out.extend_from_slice(&sample.to_le_bytes());
        }
        out
    }
}

/// Concatenates a sequence of chunks into one buffer of samples.
///
/// Used by complete-buffer transports once a task's terminal message has been
/// observed. The sample rate of the first chunk wins; callers feed chunks from
/// a single engine invocation, which never mixes rates.
pub fn concat_samples(chunks: &[AudioChunk]) -> Vec<f32> {
    let total = chunks.iter().map(AudioChunk::len).sum();
    let mut samples = Vec::with_capacity(total);
    for chunk in chunks {
        samples.extend_from_slice(&chunk.samples);
    }
    samples
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_encoding_is_little_endian() {
        let chunk = AudioChunk::new(vec![0.0, 1.0], 24_000);
        let bytes = chunk.to_le_bytes();
        assert_eq!(bytes.len(), 8);
        assert_eq!(&bytes[..4], &0.0_f32.to_le_bytes());
        assert_eq!(&bytes[4..], &1.0_f32.to_le_bytes());
    }

    #[test]
    fn duration_reflects_sample_rate() {
        let chunk = AudioChunk::new(vec![0.0; 12_000], 24_000);
        assert!((chunk.duration_secs() - 0.5).abs() < f32::EPSILON);
        assert_eq!(AudioChunk::new(vec![], 0).duration_secs(), 0.0);
    }

    #[test]
    fn concat_preserves_order() {
        let chunks = vec![
            AudioChunk::new(vec![1.0, 2.0], 24_000),
            AudioChunk::new(vec![3.0], 24_000),
        ];
        assert_eq!(concat_samples(&chunks), vec![1.0, 2.0, 3.0]);
    }
}
