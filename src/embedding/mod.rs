//! Embedding generation with a deterministic offline fallback.
//!
//! [`ApiEmbedder`] talks to the external embedding service with retry
//! and backoff. [`HashEmbedder`] is the deterministic hash-based
//! substitute that keeps matching functional (with degraded quality)
//! when the service is unconfigured or down. [`ResilientEmbedder`] is
//! the explicit policy that decides between them, so degraded mode is
//! visible in the type system instead of hidden behind exception
//! suppression.

pub mod api;
pub mod hash;

use serde::{Deserialize, Serialize};

use crate::config::EmbeddingConfig;
use crate::error::{Result, RmError};

pub use api::ApiEmbedder;
pub use hash::HashEmbedder;

/// Fixed dimensionality of every embedding, fallback vectors included.
pub const EMBEDDING_DIMS: usize = 1536;

/// Ordered sequence of exactly [`EMBEDDING_DIMS`] floats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmbeddingVector(Vec<f32>);

impl EmbeddingVector {
    /// Wrap a vector that must already have the exact dimensionality.
    pub fn new(values: Vec<f32>) -> Result<Self> {
        if values.len() != EMBEDDING_DIMS {
            return Err(RmError::Provider(format!(
                "embedding has {} dimensions, expected {EMBEDDING_DIMS}",
                values.len()
            )));
        }
        Ok(Self(values))
    }

    /// Pad with zeros or truncate to the exact dimensionality.
    pub fn from_raw(mut values: Vec<f32>) -> Self {
        values.resize(EMBEDDING_DIMS, 0.0);
        Self(values)
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<f32> {
        self.0
    }

    /// Cosine similarity against another embedding.
    pub fn cosine(&self, other: &Self) -> f32 {
        let dot: f32 = self.0.iter().zip(other.0.iter()).map(|(x, y)| x * y).sum();
        let norm_a: f32 = self.0.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = other.0.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm_a == 0.0 || norm_b == 0.0 {
            0.0
        } else {
            dot / (norm_a * norm_b)
        }
    }
}

/// Pluggable embedding backend interface.
pub trait EmbeddingProvider: Send + Sync {
    /// Embed non-empty text. Empty/whitespace input is a validation
    /// failure, never retried.
    fn embed(&self, text: &str) -> Result<EmbeddingVector>;
}

pub(crate) fn ensure_non_empty(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(RmError::Validation(
            "cannot embed empty or whitespace-only text".to_string(),
        ));
    }
    Ok(())
}

/// Fallback policy around a primary embedding provider.
///
/// Validation errors propagate; provider failures (after the primary's
/// own retry budget) are logged and absorbed by the deterministic hash
/// fallback, so this embedder only ever fails on caller error.
pub struct ResilientEmbedder {
    primary: Option<Box<dyn EmbeddingProvider>>,
    fallback: HashEmbedder,
}

impl ResilientEmbedder {
    pub fn new(primary: Option<Box<dyn EmbeddingProvider>>) -> Self {
        Self {
            primary,
            fallback: HashEmbedder::default(),
        }
    }

    /// Build from config: an endpoint selects the API path with the
    /// hash fallback behind it; no endpoint means hash-only.
    pub fn from_config(config: &EmbeddingConfig) -> Result<Self> {
        let primary: Option<Box<dyn EmbeddingProvider>> = match &config.endpoint {
            Some(endpoint) if !endpoint.trim().is_empty() => {
                Some(Box::new(ApiEmbedder::from_config(config)?))
            }
            _ => None,
        };
        Ok(Self::new(primary))
    }
}

impl EmbeddingProvider for ResilientEmbedder {
    fn embed(&self, text: &str) -> Result<EmbeddingVector> {
        ensure_non_empty(text)?;

        if let Some(primary) = &self.primary {
            match primary.embed(text) {
                Ok(vector) => return Ok(vector),
                Err(err @ RmError::Validation(_)) => return Err(err),
                Err(err) => {
                    tracing::warn!(error = %err, "embedding provider failed, using hash fallback");
                }
            }
        }

        self.fallback.embed(text)
    }
}
