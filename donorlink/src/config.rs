use serde::Deserialize;
use std::env;

use crate::matching::ScoringWeights;
use crate::models::{DEFAULT_MIN_SIMILARITY, DEFAULT_TOP_N};

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

fn parse_env_opt<T: std::str::FromStr>(var: &str) -> Option<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Ignoring.", val, var, e);
                None
            }
        },
        Err(_) => None,
    }
}

/// Read the four blend weights, falling back to the defaults as a whole when
/// the configured set is not a valid convex combination.
fn parse_weights() -> ScoringWeights {
    let defaults = ScoringWeights::default();
    let weights = ScoringWeights {
        ai_similarity: parse_env_or("MATCH_WEIGHT_AI", defaults.ai_similarity),
        blood_type: parse_env_or("MATCH_WEIGHT_BLOOD", defaults.blood_type),
        location: parse_env_or("MATCH_WEIGHT_LOCATION", defaults.location),
        age: parse_env_or("MATCH_WEIGHT_AGE", defaults.age),
    };

    match weights.validate() {
        Ok(()) => weights,
        Err(e) => {
            tracing::warn!("Ignoring configured match weights: {}. Using defaults.", e);
            defaults
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub embeddings: EmbeddingsConfig,
    pub llm: Option<LlmConfig>,
    pub matching: MatchingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingsConfig {
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    /// Expected vector length. `0` takes the length the model produces.
    pub dimensions: usize,
    pub batch_size: usize,
    pub timeout_secs: u64,
    pub max_retries: u32,
    /// Capacity of the query embedding cache; `0` disables it.
    pub cache_size: usize,
}

/// LLM configuration for match summaries
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingConfig {
    pub default_top_n: usize,
    pub default_min_similarity: f64,
    pub weights: ScoringWeights,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            default_top_n: DEFAULT_TOP_N,
            default_min_similarity: DEFAULT_MIN_SIMILARITY,
            weights: ScoringWeights::default(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: env::var("DONORLINK_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or("DONORLINK_PORT", 3000),
            },
            embeddings: EmbeddingsConfig {
                model: env::var("EMBEDDING_MODEL")
                    .unwrap_or_else(|_| "openai/text-embedding-3-small".to_string()),
                api_key: env::var("EMBEDDING_API_KEY").ok(),
                base_url: env::var("EMBEDDING_BASE_URL").ok(),
                dimensions: parse_env_or("EMBEDDING_DIMENSIONS", 0),
                batch_size: parse_env_or("EMBEDDING_BATCH_SIZE", 64),
                timeout_secs: parse_env_or("EMBEDDING_TIMEOUT", 30),
                max_retries: parse_env_or("EMBEDDING_MAX_RETRIES", 2),
                cache_size: parse_env_or("EMBEDDING_CACHE_SIZE", 0),
            },
            llm: env::var("LLM_MODEL").ok().map(|model| LlmConfig {
                model,
                api_key: env::var("LLM_API_KEY").ok(),
                base_url: env::var("LLM_BASE_URL").ok(),
                timeout_secs: parse_env_or("LLM_TIMEOUT", 30),
                max_retries: parse_env_or("LLM_MAX_RETRIES", 3),
            }),
            matching: MatchingConfig {
                default_top_n: parse_env_opt("MATCH_DEFAULT_TOP_N")
                    .filter(|n: &usize| *n > 0)
                    .unwrap_or(DEFAULT_TOP_N),
                default_min_similarity: parse_env_opt("MATCH_DEFAULT_MIN_SIMILARITY")
                    .filter(|v: &f64| v.is_finite())
                    .unwrap_or(DEFAULT_MIN_SIMILARITY),
                weights: parse_weights(),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}

/// Known embedding providers that use OpenAI-compatible APIs
const KNOWN_PROVIDERS: &[&str] = &["openai", "openrouter", "ollama", "lmstudio", "local"];

/// Known LLM providers that use OpenAI-compatible APIs
pub const KNOWN_LLM_PROVIDERS: &[&str] = &["openai", "openrouter", "ollama", "lmstudio"];

/// Parse a model name into (provider, model) tuple.
pub fn parse_provider_model(model: &str) -> (&str, &str) {
    if let Some((prefix, rest)) = model.split_once('/') {
        let prefix_lower = prefix.to_lowercase();
        if KNOWN_PROVIDERS.contains(&prefix_lower.as_str()) {
            return (prefix, rest);
        }
    }
    // Default to local provider
    ("local", model)
}

/// Parse an LLM model name into (provider, model) tuple.
pub fn parse_llm_provider_model(model: &str) -> (&str, &str) {
    if let Some((prefix, rest)) = model.split_once('/') {
        let prefix_lower = prefix.to_lowercase();
        if KNOWN_LLM_PROVIDERS.contains(&prefix_lower.as_str()) {
            return (prefix, rest);
        }
    }
    ("local", model)
}
