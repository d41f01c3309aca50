use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use std::sync::{Arc, Mutex};

use crate::config::EmbeddingsConfig;
use crate::error::{MatchError, Result};

use super::provider::{validate_batch, EmbeddingProvider};

/// On-device embeddings through fastembed. Inference is CPU-bound and runs
/// on the blocking pool.
#[derive(Clone)]
pub struct LocalEmbeddingProvider {
    model: Arc<Mutex<TextEmbedding>>,
    model_name: String,
    batch_size: usize,
    dimensions: usize,
}

impl LocalEmbeddingProvider {
    pub fn new(config: &EmbeddingsConfig, model_name: &str) -> Result<Self> {
        let embedding_model = resolve_embedding_model(model_name);
        let mut model = TextEmbedding::try_new(
            InitOptions::new(embedding_model).with_show_download_progress(true),
        )
        .map_err(|e| MatchError::Provider(e.to_string()))?;

        // One throwaway embedding tells us the model's native vector length.
        let native = model
            .embed(vec!["dimension check"], None)
            .map_err(|e| MatchError::Provider(e.to_string()))?
            .first()
            .map(Vec::len)
            .unwrap_or(0);
        let dimensions = resolve_dimensions(config.dimensions, native)?;

        tracing::info!(model = model_name, dimensions, "Loaded local embedding model");

        Ok(Self {
            model: Arc::new(Mutex::new(model)),
            model_name: model_name.to_string(),
            batch_size: config.batch_size.max(1),
            dimensions,
        })
    }
}

/// A configured length of `0` defers to the model; any other value must
/// agree with what the model actually produces.
fn resolve_dimensions(configured: usize, native: usize) -> Result<usize> {
    if native == 0 {
        return Err(MatchError::Provider(
            "Local embedding model produced an empty vector".to_string(),
        ));
    }
    if configured != 0 && configured != native {
        return Err(MatchError::Provider(format!(
            "EMBEDDING_DIMENSIONS is {configured} but the local model produces {native}"
        )));
    }
    Ok(native)
}

#[async_trait]
impl EmbeddingProvider for LocalEmbeddingProvider {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let model = Arc::clone(&self.model);
        let batch_size = self.batch_size;
        let input = texts.to_vec();
        let embeddings = tokio::task::spawn_blocking(move || {
            let mut model = model
                .lock()
                .map_err(|e| MatchError::Provider(format!("Embedding model lock poisoned: {e}")))?;
            model
                .embed(input, Some(batch_size))
                .map_err(|e| MatchError::Provider(e.to_string()))
        })
        .await
        .map_err(|e| MatchError::Provider(format!("Embedding worker failed: {e}")))??;

        validate_batch(texts.len(), &embeddings, self.dimensions)?;
        Ok(embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model(&self) -> &str {
        &self.model_name
    }
}

fn resolve_embedding_model(model_name: &str) -> EmbeddingModel {
    match model_name {
        "BAAI/bge-small-en-v1.5" | "bge-small-en-v1.5" => EmbeddingModel::BGESmallENV15,
        "BAAI/bge-base-en-v1.5" | "bge-base-en-v1.5" => EmbeddingModel::BGEBaseENV15,
        "BAAI/bge-large-en-v1.5" | "bge-large-en-v1.5" => EmbeddingModel::BGELargeENV15,
        "all-MiniLM-L6-v2" | "sentence-transformers/all-MiniLM-L6-v2" => {
            EmbeddingModel::AllMiniLML6V2
        }
        "all-MiniLM-L12-v2" | "sentence-transformers/all-MiniLM-L12-v2" => {
            EmbeddingModel::AllMiniLML12V2
        }
        "nomic-embed-text-v1.5" | "nomic-ai/nomic-embed-text-v1.5" => {
            EmbeddingModel::NomicEmbedTextV15
        }
        other => {
            tracing::warn!(model = other, "Unknown local embedding model, using bge-small-en-v1.5");
            EmbeddingModel::BGESmallENV15
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_dimensions_take_the_model_length() {
        assert_eq!(resolve_dimensions(0, 384).unwrap(), 384);
    }

    #[test]
    fn matching_override_is_accepted() {
        assert_eq!(resolve_dimensions(384, 384).unwrap(), 384);
    }

    #[test]
    fn conflicting_override_is_rejected() {
        let err = resolve_dimensions(1536, 384).unwrap_err();
        assert!(matches!(err, MatchError::Provider(msg) if msg.contains("1536") && msg.contains("384")));
    }

    #[test]
    fn empty_model_vector_is_rejected() {
        assert!(resolve_dimensions(0, 0).is_err());
    }

    #[test]
    fn unknown_model_names_fall_back_to_bge_small() {
        assert_eq!(
            resolve_embedding_model("bge-base-en-v1.5"),
            EmbeddingModel::BGEBaseENV15
        );
        assert_eq!(
            resolve_embedding_model("no-such-model"),
            EmbeddingModel::BGESmallENV15
        );
    }
}
