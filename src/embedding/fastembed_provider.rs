//! Sentence-transformer provider backed by fastembed (ONNX, local inference).
//!
//! Loads `all-MiniLM-L6-v2` (or another fastembed model) once; the model is
//! downloaded into the fastembed cache on first use.

use super::{Embedding, EmbeddingProvider};
use crate::error::{EmbeddingErrorKind, MapperError, Result};
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use std::sync::Mutex;

/// fastembed-backed embedding provider.
pub struct FastEmbedProvider {
    model: Mutex<TextEmbedding>,
    dimension: usize,
}

impl FastEmbedProvider {
    /// Load a model by its configuration name (e.g. `all-minilm-l6-v2`).
    pub fn with_model_name(name: &str) -> Result<Self> {
        let (model, dimension) = parse_model(name)?;
        Self::with_model(model, dimension)
    }

    fn with_model(model: EmbeddingModel, dimension: usize) -> Result<Self> {
        let model_name = format!("{model:?}");
        tracing::info!("Loading embedding model: {}", model_name);
        let text_embedding =
            TextEmbedding::try_new(InitOptions::new(model).with_show_download_progress(false))
                .map_err(|e| {
                    MapperError::embedding(
                        format!("fastembed model {model_name}"),
                        EmbeddingErrorKind::ModelLoad(e.to_string()),
                    )
                })?;
        tracing::debug!("Loaded {} ({} dims)", model_name, dimension);
        Ok(Self {
            model: Mutex::new(text_embedding),
            dimension,
        })
    }
}

fn parse_model(name: &str) -> Result<(EmbeddingModel, usize)> {
    match name.to_lowercase().as_str() {
        "all-minilm-l6-v2" | "allminilml6v2" => Ok((EmbeddingModel::AllMiniLML6V2, 384)),
        "all-minilm-l12-v2" | "allminilml12v2" => Ok((EmbeddingModel::AllMiniLML12V2, 384)),
        "bge-small-en" | "bgesmallen" => Ok((EmbeddingModel::BGESmallENV15, 384)),
        "bge-base-en" | "bgebaseen" => Ok((EmbeddingModel::BGEBaseENV15, 768)),
        "multilingual-e5-small" => Ok((EmbeddingModel::MultilingualE5Small, 384)),
        other => Err(MapperError::config(format!(
            "unsupported fastembed model '{other}'"
        ))),
    }
}

impl EmbeddingProvider for FastEmbedProvider {
    fn name(&self) -> &str {
        "fastembed"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn encode_batch(&self, texts: &[String]) -> Result<Vec<Embedding>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let mut model = self.model.lock().map_err(|_| {
            MapperError::embedding(
                "fastembed model lock",
                EmbeddingErrorKind::Inference("model mutex poisoned".to_string()),
            )
        })?;
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        model.embed(refs, None).map_err(|e| {
            MapperError::embedding(
                format!("fastembed batch of {}", texts.len()),
                EmbeddingErrorKind::Inference(e.to_string()),
            )
        })
    }
}
