//! Deterministic hash-based fallback embedding.
//!
//! Derives a counter-extended SHA-256 byte stream from the input text,
//! maps each 4-byte group to a float in [-1, 1], pads/truncates to the
//! fixed dimensionality, and L2-normalizes for the cosine metric. Same
//! text always yields a bit-identical vector; this path never touches
//! the network and never fails on non-empty input.

use sha2::{Digest, Sha256};

use crate::embedding::{ensure_non_empty, EmbeddingProvider, EmbeddingVector, EMBEDDING_DIMS};
use crate::error::Result;

const DIGEST_BYTES: usize = 32;
const BYTES_PER_DIM: usize = 4;

#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dims: usize,
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self { dims: EMBEDDING_DIMS }
    }
}

impl HashEmbedder {
    pub fn new(dims: usize) -> Self {
        Self { dims }
    }

    pub fn dims(&self) -> usize {
        self.dims
    }

    fn byte_stream(&self, text: &str) -> Vec<u8> {
        let needed = self.dims * BYTES_PER_DIM;
        let blocks = needed.div_ceil(DIGEST_BYTES);
        let mut bytes = Vec::with_capacity(blocks * DIGEST_BYTES);

        for counter in 0..blocks as u32 {
            let mut hasher = Sha256::new();
            hasher.update(text.as_bytes());
            hasher.update(counter.to_le_bytes());
            bytes.extend_from_slice(&hasher.finalize());
        }

        bytes.truncate(needed);
        bytes
    }
}

impl EmbeddingProvider for HashEmbedder {
    fn embed(&self, text: &str) -> Result<EmbeddingVector> {
        ensure_non_empty(text)?;

        let bytes = self.byte_stream(text);
        let mut values: Vec<f32> = bytes
            .chunks_exact(BYTES_PER_DIM)
            .map(|chunk| {
                let raw = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
                // Map the group into [-1, 1]; raw IEEE-754 bit
                // reinterpretation would produce NaN/Inf and break the
                // cosine metric.
                ((raw as f64 / u32::MAX as f64) * 2.0 - 1.0) as f32
            })
            .collect();

        l2_normalize(&mut values);
        Ok(EmbeddingVector::from_raw(values))
    }
}

fn l2_normalize(vec: &mut [f32]) {
    let norm = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for value in vec.iter_mut() {
            *value /= norm;
        }
    }
}
