#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};

use async_trait::async_trait;

use donorlink::api::AppState;
use donorlink::config::{Config, EmbeddingsConfig, LlmConfig, MatchingConfig, ServerConfig};
use donorlink::db::InMemoryProfileStore;
use donorlink::embeddings::EmbeddingProvider;
use donorlink::error::Result;
use donorlink::llm::LlmProvider;
use donorlink::services::seed::seed_from_file;
use donorlink::services::MatchingService;

/// Vocabulary of the deterministic embedder; the last dimension is a constant bias.
const ORGAN_TERMS: &[&str] = &["kidney", "liver", "heart", "lung", "pancreas"];

static LOGGER: Once = Once::new();

/// Install a test-writer subscriber once per test binary.
pub fn init_test_logger() {
    LOGGER.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "donorlink=debug".into()),
            )
            .with_test_writer()
            .try_init();
    });
}

/// Get the path to a fixture file
pub fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Counts organ mentions, so profiles about the same organ embed identically.
#[derive(Default)]
pub struct OrganEmbedder {
    calls: AtomicUsize,
}

impl OrganEmbedder {
    pub fn vector(text: &str) -> Vec<f32> {
        let lower = text.to_lowercase();
        let mut vector: Vec<f32> = ORGAN_TERMS
            .iter()
            .map(|term| lower.matches(term).count() as f32)
            .collect();
        vector.push(1.0);
        vector
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for OrganEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts.iter().map(|t| Self::vector(t)).collect())
    }

    fn dimensions(&self) -> usize {
        ORGAN_TERMS.len() + 1
    }

    fn model(&self) -> &str {
        "organ-keywords"
    }
}

pub fn test_config(llm: Option<LlmConfig>) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        embeddings: EmbeddingsConfig {
            model: "organ-keywords".to_string(),
            api_key: None,
            base_url: None,
            dimensions: ORGAN_TERMS.len() + 1,
            batch_size: 16,
            timeout_secs: 5,
            max_retries: 0,
            cache_size: 0,
        },
        llm,
        matching: MatchingConfig::default(),
    }
}

/// LLM settings pointing at a local mock server.
pub fn mock_llm_config(base_url: String) -> LlmConfig {
    LlmConfig {
        model: "ollama/llama3".to_string(),
        api_key: None,
        base_url: Some(base_url),
        timeout_secs: 5,
        max_retries: 0,
    }
}

pub fn test_state(llm: Option<LlmConfig>) -> (AppState, Arc<OrganEmbedder>) {
    init_test_logger();

    let config = test_config(llm);
    let embedder = Arc::new(OrganEmbedder::default());
    let llm = LlmProvider::new(config.llm.as_ref());
    let state = AppState::new(
        config,
        Arc::new(InMemoryProfileStore::new()),
        embedder.clone(),
        llm,
    );
    (state, embedder)
}

/// Matching service preloaded with `tests/fixtures/profiles.json`.
pub async fn seeded_service() -> MatchingService {
    let (state, _) = test_state(None);
    seed_from_file(&state.matching, &fixture_path("profiles.json"))
        .await
        .expect("fixture seed should load");
    state.matching
}
