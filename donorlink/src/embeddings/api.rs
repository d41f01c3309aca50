use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::{parse_provider_model, EmbeddingsConfig};
use crate::error::{MatchError, Result};

use super::provider::{validate_batch, EmbeddingProvider};

/// Provider-specific default base URLs
pub fn default_base_url(provider: &str) -> &'static str {
    match provider.to_lowercase().as_str() {
        "openai" => "https://api.openai.com/v1",
        "openrouter" => "https://openrouter.ai/api/v1",
        "ollama" => "http://localhost:11434/v1",
        "lmstudio" => "http://localhost:1234/v1",
        _ => "https://api.openai.com/v1", // default fallback
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub dimensions: usize,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

impl ApiConfig {
    pub fn from_embeddings_config(config: &EmbeddingsConfig) -> Self {
        let (provider, model) = parse_provider_model(&config.model);
        Self {
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| default_base_url(provider).to_string()),
            api_key: config.api_key.clone(),
            model: model.to_string(),
            dimensions: config.dimensions,
            timeout_secs: config.timeout_secs,
            max_retries: config.max_retries,
        }
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    #[serde(default)]
    index: Option<usize>,
    embedding: Vec<f32>,
}

/// Client for OpenAI-compatible `/embeddings` endpoints.
///
/// Transport errors, 429 and 5xx responses are retried with exponential
/// backoff up to `max_retries`; authentication failures are returned at once.
#[derive(Clone)]
pub struct EmbeddingApiClient {
    client: Client,
    config: ApiConfig,
}

impl EmbeddingApiClient {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| MatchError::Provider(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    pub async fn embed_texts(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = EmbeddingRequest {
            model: &self.config.model,
            input: texts.to_vec(),
        };

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(ref api_key) = self.config.api_key {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {api_key}"))
                    .map_err(|e| MatchError::Provider(format!("Invalid API key header: {e}")))?,
            );
        }

        let url = format!("{}/embeddings", self.config.base_url.trim_end_matches('/'));

        let mut last_error = None;
        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let delay = Duration::from_millis(100 * 2_u64.pow(attempt - 1));
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&url)
                .headers(headers.clone())
                .json(&request)
                .send()
                .await;

            match response {
                Ok(resp) => {
                    let status = resp.status();

                    if status.is_success() {
                        let body: EmbeddingResponse = resp.json().await.map_err(|e| {
                            MatchError::Provider(format!("Failed to parse response: {e}"))
                        })?;
                        let embeddings = Self::into_ordered(body.data)?;
                        validate_batch(texts.len(), &embeddings, self.config.dimensions)?;
                        return Ok(embeddings);
                    }

                    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        let retry_after = resp
                            .headers()
                            .get("retry-after")
                            .and_then(|v| v.to_str().ok())
                            .and_then(|s| s.parse().ok());
                        last_error = Some(MatchError::ProviderRateLimit { retry_after });
                        continue;
                    }

                    if status == reqwest::StatusCode::UNAUTHORIZED
                        || status == reqwest::StatusCode::FORBIDDEN
                    {
                        let body = resp.text().await.unwrap_or_default();
                        return Err(MatchError::ProviderAuth(body));
                    }

                    if status.is_server_error() {
                        let body = resp.text().await.unwrap_or_default();
                        last_error = Some(MatchError::Provider(format!(
                            "Server error {status}: {body}"
                        )));
                        continue;
                    }

                    let body = resp.text().await.unwrap_or_default();
                    return Err(MatchError::Provider(format!("API error {status}: {body}")));
                }
                Err(e) => {
                    tracing::debug!(attempt, error = %e, "Embedding request failed");
                    last_error = Some(MatchError::Provider(format!("Request failed: {e}")));
                    continue;
                }
            }
        }

        Err(last_error.unwrap_or_else(|| MatchError::Provider("Unknown error".to_string())))
    }

    /// Providers may return slots out of order; `index` restores alignment.
    /// When indices are present they must be exactly `0..n`.
    fn into_ordered(mut data: Vec<EmbeddingData>) -> Result<Vec<Vec<f32>>> {
        if data.iter().any(|d| d.index.is_some()) {
            data.sort_by_key(|d| d.index);
            if let Some((slot, d)) = data
                .iter()
                .enumerate()
                .find(|(slot, d)| d.index != Some(*slot))
            {
                return Err(MatchError::Provider(format!(
                    "Embedding response slot {slot} carries index {:?}",
                    d.index
                )));
            }
        }
        Ok(data.into_iter().map(|d| d.embedding).collect())
    }

    pub async fn detect_dimensions(&self) -> Result<usize> {
        let embeddings = self.embed_texts(&["dimension check"]).await?;
        embeddings
            .first()
            .map(|e| e.len())
            .ok_or_else(|| MatchError::Provider("No embedding returned".to_string()))
    }

    /// Pin the expected vector length by asking the endpoint once, unless one
    /// is configured. If the endpoint can't be reached the length stays
    /// unchecked and mixed lengths surface later as a dimension mismatch.
    pub async fn with_detected_dimensions(mut self) -> Self {
        if self.config.dimensions > 0 {
            return self;
        }
        match self.detect_dimensions().await {
            Ok(dimensions) => {
                tracing::info!(model = %self.config.model, dimensions, "Detected embedding dimensions");
                self.config.dimensions = dimensions;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Could not detect embedding dimensions; vector length is unchecked");
            }
        }
        self
    }
}

#[async_trait]
impl EmbeddingProvider for EmbeddingApiClient {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        self.embed_texts(&refs).await
    }

    fn dimensions(&self) -> usize {
        self.config.dimensions
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}
