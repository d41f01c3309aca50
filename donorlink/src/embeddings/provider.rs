use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{parse_provider_model, EmbeddingsConfig};
use crate::error::{MatchError, Result};

use super::api::{ApiConfig, EmbeddingApiClient};
use super::cache::CachedEmbeddingProvider;
use super::local::LocalEmbeddingProvider;

/// Text -> vector service the matcher depends on.
///
/// Every vector a provider returns for one model has the same length. A
/// provider never returns a partial batch: `embed_batch` yields exactly one
/// non-empty vector per input, index-aligned, or fails.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let embeddings = self.embed_batch(&[text.to_string()]).await?;
        embeddings
            .into_iter()
            .next()
            .filter(|e| !e.is_empty())
            .ok_or_else(|| MatchError::Provider("No embedding generated".to_string()))
    }

    /// Expected vector length, `0` when unknown.
    fn dimensions(&self) -> usize;

    fn model(&self) -> &str;
}

/// Check a provider batch: one non-empty vector per input, all of the
/// expected length (when `dimensions` is non-zero) and of equal length.
pub fn validate_batch(expected: usize, embeddings: &[Vec<f32>], dimensions: usize) -> Result<()> {
    if embeddings.len() != expected {
        return Err(MatchError::Provider(format!(
            "Expected {expected} embeddings, provider returned {}",
            embeddings.len()
        )));
    }

    let mut seen_len = None;
    for (i, embedding) in embeddings.iter().enumerate() {
        if embedding.is_empty() {
            return Err(MatchError::Provider(format!("Empty embedding at index {i}")));
        }
        if dimensions > 0 && embedding.len() != dimensions {
            return Err(MatchError::Provider(format!(
                "Embedding at index {i} has {} dimensions, expected {dimensions}",
                embedding.len()
            )));
        }
        match seen_len {
            None => seen_len = Some(embedding.len()),
            Some(len) if len != embedding.len() => {
                return Err(MatchError::Provider(format!(
                    "Inconsistent embedding lengths in batch: {len} vs {}",
                    embedding.len()
                )));
            }
            Some(_) => {}
        }
    }
    Ok(())
}

/// Build the configured provider: `local/...` (or an unprefixed model name)
/// runs on-device, any other known prefix goes to an OpenAI-compatible API.
/// Without a configured dimension, both backends learn it from the model.
pub async fn create_provider(config: &EmbeddingsConfig) -> Result<Arc<dyn EmbeddingProvider>> {
    let (provider, model_name) = parse_provider_model(&config.model);

    let inner: Arc<dyn EmbeddingProvider> = if provider.eq_ignore_ascii_case("local") {
        Arc::new(LocalEmbeddingProvider::new(config, model_name)?)
    } else {
        let client = EmbeddingApiClient::new(ApiConfig::from_embeddings_config(config))?;
        Arc::new(client.with_detected_dimensions().await)
    };

    if config.cache_size > 0 {
        tracing::info!(capacity = config.cache_size, "Embedding cache enabled");
        Ok(Arc::new(CachedEmbeddingProvider::new(inner, config.cache_size)))
    } else {
        Ok(inner)
    }
}
