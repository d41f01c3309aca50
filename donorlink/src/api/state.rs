use std::sync::Arc;

use crate::config::Config;
use crate::db::ProfileStore;
use crate::embeddings::EmbeddingProvider;
use crate::llm::LlmProvider;
use crate::services::MatchingService;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn ProfileStore>,
    pub embeddings: Arc<dyn EmbeddingProvider>,
    pub llm: LlmProvider,
    pub matching: MatchingService,
}

impl AppState {
    pub fn new(
        config: Config,
        store: Arc<dyn ProfileStore>,
        embeddings: Arc<dyn EmbeddingProvider>,
        llm: LlmProvider,
    ) -> Self {
        let config = Arc::new(config);
        let matching = MatchingService::new(
            store.clone(),
            embeddings.clone(),
            llm.clone(),
            config.matching.clone(),
        );

        Self {
            config,
            store,
            embeddings,
            llm,
            matching,
        }
    }
}
