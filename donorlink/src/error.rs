use thiserror::Error;

#[derive(Error, Debug)]
pub enum MatchError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Embedding provider error: {0}")]
    Provider(String),

    #[error("Embedding provider authentication error: {0}")]
    ProviderAuth(String),

    #[error("Embedding provider rate limit exceeded, retry after {retry_after:?} seconds")]
    ProviderRateLimit { retry_after: Option<u64> },

    #[error("Vector dimension mismatch: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },

    #[error("Invalid vector input: {0}")]
    InvalidInput(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("LLM unavailable: {0}")]
    LlmUnavailable(String),

    #[error("LLM rate limit exceeded, retry after {retry_after:?} seconds")]
    LlmRateLimit { retry_after: Option<u64> },

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl MatchError {
    /// True for failures of the external embedding service. Callers may retry
    /// the whole operation; the matching core never does.
    pub fn is_provider_failure(&self) -> bool {
        matches!(
            self,
            MatchError::Provider(_)
                | MatchError::ProviderAuth(_)
                | MatchError::ProviderRateLimit { .. }
                | MatchError::Http(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, MatchError>;
