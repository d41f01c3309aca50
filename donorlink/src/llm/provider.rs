use std::sync::Arc;

use crate::config::{parse_llm_provider_model, LlmConfig};
use crate::error::{MatchError, Result};
use crate::llm::api::LlmApiClient;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LlmBackend {
    OpenAI,
    OpenRouter,
    Ollama,
    LmStudio,
    OpenAICompatible { base_url: String },
    Unavailable { reason: String },
}

#[derive(Debug, Clone, Default)]
pub struct CompletionOptions {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

/// Optional text generation backend. Construction never fails; a missing
/// or unusable configuration yields an unavailable provider instead.
#[derive(Clone)]
pub struct LlmProvider {
    backend: LlmBackend,
    client: Option<Arc<LlmApiClient>>,
}

impl LlmProvider {
    pub fn new(config: Option<&LlmConfig>) -> Self {
        let Some(config) = config else {
            return Self::unavailable("No LLM configuration provided");
        };

        let (provider, _model) = parse_llm_provider_model(&config.model);

        let backend = match provider.to_lowercase().as_str() {
            "openai" => LlmBackend::OpenAI,
            "openrouter" => LlmBackend::OpenRouter,
            "ollama" => LlmBackend::Ollama,
            "lmstudio" => LlmBackend::LmStudio,
            _ => match &config.base_url {
                Some(base_url) => LlmBackend::OpenAICompatible {
                    base_url: base_url.clone(),
                },
                None => {
                    return Self::unavailable(&format!(
                        "Unknown provider in model: {}",
                        config.model
                    ))
                }
            },
        };

        match LlmApiClient::new(config) {
            Ok(client) => Self {
                backend,
                client: Some(Arc::new(client)),
            },
            Err(e) => {
                tracing::warn!(error = %e, "LLM client could not be created, summaries disabled");
                Self::unavailable(&e.to_string())
            }
        }
    }

    pub fn unavailable(reason: &str) -> Self {
        Self {
            backend: LlmBackend::Unavailable {
                reason: reason.to_string(),
            },
            client: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.client.is_some()
    }

    pub fn backend(&self) -> &LlmBackend {
        &self.backend
    }

    pub fn model(&self) -> Option<&str> {
        self.client.as_deref().map(LlmApiClient::model)
    }

    pub async fn complete(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        options: Option<&CompletionOptions>,
    ) -> Result<String> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| MatchError::LlmUnavailable(self.unavailable_reason()))?;

        client.complete(prompt, system_prompt, options).await
    }

    fn unavailable_reason(&self) -> String {
        match &self.backend {
            LlmBackend::Unavailable { reason } => reason.clone(),
            _ => "LLM client not initialised".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(model: &str, base_url: Option<&str>, api_key: Option<&str>) -> LlmConfig {
        LlmConfig {
            model: model.to_string(),
            api_key: api_key.map(str::to_string),
            base_url: base_url.map(str::to_string),
            timeout_secs: 5,
            max_retries: 0,
        }
    }

    #[test]
    fn missing_config_is_unavailable() {
        let provider = LlmProvider::new(None);
        assert!(!provider.is_available());
    }

    #[test]
    fn ollama_needs_no_key() {
        let provider = LlmProvider::new(Some(&config("ollama/llama3", None, None)));
        assert!(provider.is_available());
        assert_eq!(provider.backend(), &LlmBackend::Ollama);
        assert_eq!(provider.model(), Some("llama3"));
    }

    #[test]
    fn openai_without_key_is_unavailable() {
        let provider = LlmProvider::new(Some(&config("openai/gpt-4o-mini", None, None)));
        assert!(!provider.is_available());
    }

    #[test]
    fn unknown_provider_with_base_url_is_compatible() {
        let provider = LlmProvider::new(Some(&config(
            "mistral-small",
            Some("http://localhost:8080/v1"),
            None,
        )));
        assert!(provider.is_available());
        assert!(matches!(
            provider.backend(),
            LlmBackend::OpenAICompatible { .. }
        ));
    }

    #[tokio::test]
    async fn complete_on_unavailable_provider_errors() {
        let provider = LlmProvider::unavailable("off");
        let err = provider.complete("hi", None, None).await.unwrap_err();
        assert!(matches!(err, MatchError::LlmUnavailable(reason) if reason == "off"));
    }
}
