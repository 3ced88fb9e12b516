//! Text embedding providers.
//!
//! An [`EmbeddingProvider`] maps text to fixed-dimension dense vectors with
//! a static model that is loaded once per run. The matcher only depends on
//! the trait; which model backs it is a configuration choice.
//!
//! - [`HashingEmbedder`]: built-in deterministic feature-hashing model
//! - `FastEmbedProvider`: sentence-transformer model (feature `fastembed`)
//!
//! [`encode_texts`] wraps every provider call with the contract checks the
//! matcher relies on: one vector per text, uniform dimension, finite values.

mod hashing;
#[cfg(feature = "fastembed")]
mod fastembed_provider;
mod matrix;

pub use hashing::HashingEmbedder;
#[cfg(feature = "fastembed")]
pub use fastembed_provider::FastEmbedProvider;
pub use matrix::{l2_norm, EmbeddingMatrix};

use crate::config::{EmbeddingConfig, ProviderKind};
use crate::error::{EmbeddingErrorKind, MapperError, Result};

/// A dense embedding vector.
pub type Embedding = Vec<f32>;

/// Maps text to dense vectors of a fixed dimension.
///
/// Implementations must be deterministic: the same text always yields the
/// same vector, and batch encoding must agree element-for-element with
/// encoding each text on its own.
pub trait EmbeddingProvider: Send + Sync {
    /// Short identifier for logs and summaries.
    fn name(&self) -> &str;

    /// Length of every vector this provider returns.
    fn dimension(&self) -> usize;

    /// Encode a batch of texts, one vector per text, in input order.
    fn encode_batch(&self, texts: &[String]) -> Result<Vec<Embedding>>;

    /// Encode a single text.
    fn encode(&self, text: &str) -> Result<Embedding> {
        let mut batch = self.encode_batch(&[text.to_string()])?;
        batch.pop().ok_or_else(|| {
            MapperError::embedding(
                format!("{} returned no vector", self.name()),
                EmbeddingErrorKind::BatchLength {
                    expected: 1,
                    actual: 0,
                },
            )
        })
    }
}

/// Instantiate the configured provider.
pub fn create_provider(config: &EmbeddingConfig) -> Result<Box<dyn EmbeddingProvider>> {
    match config.provider {
        ProviderKind::Hashing => Ok(Box::new(HashingEmbedder::new(config.dimension)?)),
        #[cfg(feature = "fastembed")]
        ProviderKind::Fastembed => Ok(Box::new(FastEmbedProvider::with_model_name(
            &config.model,
        )?)),
        #[cfg(not(feature = "fastembed"))]
        ProviderKind::Fastembed => Err(MapperError::embedding(
            "provider 'fastembed'",
            EmbeddingErrorKind::Unavailable(
                "namaste-map was built without the `fastembed` feature".to_string(),
            ),
        )),
    }
}

/// Encode `texts` in chunks of `batch_size`, validating every vector.
///
/// `label` names each text for error messages (e.g. `"source N1"`).
pub fn encode_texts<F>(
    provider: &dyn EmbeddingProvider,
    texts: &[String],
    batch_size: usize,
    label: F,
) -> Result<Vec<Embedding>>
where
    F: Fn(usize) -> String,
{
    let expected_dim = provider.dimension();
    let mut out = Vec::with_capacity(texts.len());

    for (chunk_idx, chunk) in texts.chunks(batch_size.max(1)).enumerate() {
        let offset = chunk_idx * batch_size.max(1);
        let vectors = provider.encode_batch(chunk)?;
        if vectors.len() != chunk.len() {
            return Err(MapperError::embedding(
                format!("{} batch starting at {}", provider.name(), label(offset)),
                EmbeddingErrorKind::BatchLength {
                    expected: chunk.len(),
                    actual: vectors.len(),
                },
            ));
        }
        for (i, vector) in vectors.iter().enumerate() {
            validate_vector(vector, expected_dim, || label(offset + i))?;
        }
        out.extend(vectors);
    }

    tracing::debug!(
        "{} encoded {} texts ({} dims)",
        provider.name(),
        out.len(),
        expected_dim
    );
    Ok(out)
}

/// Check one vector's length and finiteness.
pub fn validate_vector<F>(vector: &[f32], expected_dim: usize, label: F) -> Result<()>
where
    F: FnOnce() -> String,
{
    if vector.len() != expected_dim {
        return Err(MapperError::dimension_mismatch(
            label(),
            expected_dim,
            vector.len(),
        ));
    }
    if let Some(component) = vector.iter().position(|v| !v.is_finite()) {
        return Err(MapperError::embedding(
            label(),
            EmbeddingErrorKind::NonFinite { component },
        ));
    }
    Ok(())
}
