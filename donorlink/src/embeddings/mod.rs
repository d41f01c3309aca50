mod api;
mod cache;
mod local;
mod provider;


pub use api::{ApiConfig, EmbeddingApiClient};
pub use cache::CachedEmbeddingProvider;
pub use local::LocalEmbeddingProvider;
pub use provider::{create_provider, validate_batch, EmbeddingProvider};
