//! Built-in feature-hashing embedding model.
//!
//! Text is lower-cased and split into alphanumeric tokens. Every token adds
//! a whole-word feature and its `#`-padded character trigrams, each hashed
//! with xxh3 into one of `dimension` buckets with a hash-derived sign. The
//! result is L2-normalised. Trigrams give morphological variants
//! ("fever" / "fevers") overlapping vectors without any trained weights.
//!
//! The model is a pure function of the text: no state, no randomness, and
//! batch encoding is the per-text encoding applied element-wise.

use super::{Embedding, EmbeddingProvider};
use crate::config::MAX_HASHING_DIMENSION;
use crate::error::{EmbeddingErrorKind, MapperError, Result};
use rayon::prelude::*;
use regex::Regex;
use xxhash_rust::xxh3::xxh3_64_with_seed;

const WORD_SEED: u64 = 0x4e41_4d41_5354_4531;
const TRIGRAM_SEED: u64 = 0x4943_4431_3154_4d32;
const WORD_WEIGHT: f64 = 1.0;
const TRIGRAM_WEIGHT: f64 = 0.5;

/// Deterministic hashing embedder.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimension: usize,
    token_pattern: Regex,
}

impl HashingEmbedder {
    pub fn new(dimension: usize) -> Result<Self> {
        if !(1..=MAX_HASHING_DIMENSION).contains(&dimension) {
            return Err(MapperError::config(format!(
                "hashing dimension must be between 1 and {MAX_HASHING_DIMENSION}, got {dimension}"
            )));
        }
        let token_pattern = Regex::new(r"[\p{L}\p{N}]+").map_err(|e| {
            MapperError::embedding(
                "hashing tokenizer",
                EmbeddingErrorKind::ModelLoad(e.to_string()),
            )
        })?;
        Ok(Self {
            dimension,
            token_pattern,
        })
    }

    /// Embed one text. Text without tokens maps to the zero vector.
    #[must_use]
    pub fn embed_text(&self, text: &str) -> Embedding {
        let mut acc = vec![0.0f64; self.dimension];
        let lowered = text.to_lowercase();

        for token in self.token_pattern.find_iter(&lowered) {
            let token = token.as_str();
            self.add_feature(&mut acc, token.as_bytes(), WORD_SEED, WORD_WEIGHT);

            let padded: Vec<char> = std::iter::once('#')
                .chain(token.chars())
                .chain(std::iter::once('#'))
                .collect();
            let mut gram = String::with_capacity(12);
            for window in padded.windows(3) {
                gram.clear();
                gram.extend(window);
                self.add_feature(&mut acc, gram.as_bytes(), TRIGRAM_SEED, TRIGRAM_WEIGHT);
            }
        }

        let norm = acc.iter().map(|x| x * x).sum::<f64>().sqrt();
        if norm == 0.0 {
            return vec![0.0; self.dimension];
        }
        acc.into_iter().map(|x| (x / norm) as f32).collect()
    }

    fn add_feature(&self, acc: &mut [f64], bytes: &[u8], seed: u64, weight: f64) {
        let hash = xxh3_64_with_seed(bytes, seed);
        let bucket = (hash % self.dimension as u64) as usize;
        let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
        acc[bucket] += sign * weight;
    }
}

impl EmbeddingProvider for HashingEmbedder {
    fn name(&self) -> &str {
        "hashing"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn encode_batch(&self, texts: &[String]) -> Result<Vec<Embedding>> {
        Ok(texts.par_iter().map(|t| self.embed_text(t)).collect())
    }
}
