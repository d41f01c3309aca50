//! Chat-completion client behind match summaries.

use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequest,
        CreateChatCompletionRequestArgs, CreateChatCompletionResponse,
    },
    Client,
};

use crate::config::{parse_llm_provider_model, LlmConfig};
use crate::error::{MatchError, Result};
use crate::llm::provider::CompletionOptions;

/// Provider prefix -> OpenAI-compatible endpoint used when `LLM_BASE_URL` is unset.
const ENDPOINTS: &[(&str, &str)] = &[
    ("openai", "https://api.openai.com/v1"),
    ("openrouter", "https://openrouter.ai/api/v1"),
    ("ollama", "http://localhost:11434/v1"),
    ("lmstudio", "http://localhost:1234/v1"),
];

/// Self-hosted runtimes accept requests without a key.
const KEYLESS: &[&str] = &["ollama", "lmstudio", "local"];

fn endpoint_for(provider: &str) -> &'static str {
    ENDPOINTS
        .iter()
        .find(|(name, _)| *name == provider)
        .map_or(ENDPOINTS[0].1, |(_, url)| *url)
}

#[derive(Clone)]
pub struct LlmApiClient {
    client: Client<OpenAIConfig>,
    model: String,
    max_retries: u32,
}

impl LlmApiClient {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let (prefix, bare_model) = parse_llm_provider_model(&config.model);
        let provider = prefix.to_lowercase();

        if config.api_key.is_none() && !KEYLESS.contains(&provider.as_str()) {
            return Err(MatchError::LlmUnavailable(format!(
                "LLM_API_KEY is required for {provider}"
            )));
        }

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| endpoint_for(&provider).to_string());
        let timeout = Duration::from_secs(config.timeout_secs);

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MatchError::Llm(format!("Failed to build LLM HTTP client: {e}")))?;

        let client = Client::with_config(
            OpenAIConfig::new()
                .with_api_base(base_url)
                .with_api_key(config.api_key.clone().unwrap_or_default()),
        )
        .with_http_client(http)
        // async-openai backs off on 429/5xx by itself; cap it at our deadline
        .with_backoff(backoff::ExponentialBackoff {
            max_elapsed_time: Some(timeout),
            ..Default::default()
        });

        // an unprefixed name is sent as written
        let model = if provider == "local" {
            config.model.clone()
        } else {
            bare_model.to_string()
        };

        Ok(Self {
            client,
            model,
            max_retries: config.max_retries,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Single-turn completion; returns the trimmed text of the first choice.
    /// Only transport failures are retried here.
    pub async fn complete(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        options: Option<&CompletionOptions>,
    ) -> Result<String> {
        if prompt.trim().is_empty() {
            return Err(MatchError::InvalidRequest("Prompt cannot be empty".to_string()));
        }

        let request = self.chat_request(prompt, system_prompt, options)?;

        let mut attempt = 0;
        loop {
            match self.client.chat().create(request.clone()).await {
                Ok(response) => return first_choice_text(response),
                Err(error) => {
                    let transient = is_transport_failure(&error);
                    let error = to_match_error(error);
                    if !transient || attempt >= self.max_retries {
                        return Err(error);
                    }
                    attempt += 1;
                    tracing::debug!(attempt, error = %error, "Retrying LLM completion");
                    tokio::time::sleep(Duration::from_millis(100 << (attempt - 1))).await;
                }
            }
        }
    }

    fn chat_request(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        options: Option<&CompletionOptions>,
    ) -> Result<CreateChatCompletionRequest> {
        let invalid = |e: OpenAIError| MatchError::InvalidRequest(format!("Invalid chat request: {e}"));

        let mut messages: Vec<ChatCompletionRequestMessage> = Vec::with_capacity(2);
        if let Some(system) = system_prompt.map(str::trim).filter(|s| !s.is_empty()) {
            messages.push(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system)
                    .build()
                    .map_err(invalid)?
                    .into(),
            );
        }
        messages.push(
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(invalid)?
                .into(),
        );

        let mut builder = CreateChatCompletionRequestArgs::default();
        builder.model(self.model.as_str()).messages(messages);
        if let Some(temperature) = options.and_then(|o| o.temperature) {
            builder.temperature(temperature);
        }
        if let Some(max_tokens) = options.and_then(|o| o.max_tokens) {
            builder.max_tokens(max_tokens);
        }
        builder.build().map_err(invalid)
    }
}

fn first_choice_text(response: CreateChatCompletionResponse) -> Result<String> {
    let text = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .unwrap_or_default();

    match text.trim() {
        "" => Err(MatchError::Llm("LLM returned an empty completion".to_string())),
        trimmed => Ok(trimmed.to_string()),
    }
}

/// Connection-level failures and bare 5xx statuses. Errors the provider
/// explained in a response body are final.
fn is_transport_failure(error: &OpenAIError) -> bool {
    match error {
        OpenAIError::Reqwest(e) => e.status().map_or(true, |status| status.is_server_error()),
        _ => false,
    }
}

fn to_match_error(error: OpenAIError) -> MatchError {
    let rate_limited = match &error {
        OpenAIError::Reqwest(e) => e.status() == Some(reqwest::StatusCode::TOO_MANY_REQUESTS),
        OpenAIError::ApiError(api) => [api.r#type.as_deref(), api.code.as_deref()]
            .into_iter()
            .flatten()
            .any(|tag| tag.contains("rate_limit") || tag == "insufficient_quota"),
        _ => false,
    };

    if rate_limited {
        return MatchError::LlmRateLimit { retry_after: None };
    }

    match error {
        OpenAIError::InvalidArgument(message) => MatchError::InvalidRequest(message),
        other => MatchError::Llm(format!("LLM request failed: {other}")),
    }
}
