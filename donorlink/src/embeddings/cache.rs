use async_trait::async_trait;
use lru::LruCache;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

use crate::error::Result;

use super::provider::EmbeddingProvider;

/// LRU cache in front of another provider for single-text lookups.
///
/// Match queries re-embed the same profile text over and over; batches used
/// for storing profiles pass straight through.
#[derive(Clone)]
pub struct CachedEmbeddingProvider {
    inner: Arc<dyn EmbeddingProvider>,
    cache: Arc<Mutex<LruCache<String, Vec<f32>>>>,
}

impl CachedEmbeddingProvider {
    pub fn new(inner: Arc<dyn EmbeddingProvider>, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner,
            cache: Arc::new(Mutex::new(LruCache::new(capacity))),
        }
    }

    fn generate_key(&self, text: &str) -> String {
        let mut hasher = DefaultHasher::new();
        self.inner.model().hash(&mut hasher);
        text.as_bytes().hash(&mut hasher);
        format!("{:x}", hasher.finish())
    }

    fn get(&self, key: &str) -> Option<Vec<f32>> {
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        cache.get(key).cloned()
    }

    fn put(&self, key: String, value: Vec<f32>) {
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        cache.put(key, value);
    }
}

#[async_trait]
impl EmbeddingProvider for CachedEmbeddingProvider {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.inner.embed_batch(texts).await
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let key = self.generate_key(text);
        if let Some(hit) = self.get(&key) {
            tracing::trace!("Embedding cache hit");
            return Ok(hit);
        }

        let embedding = self.inner.embed(text).await?;
        self.put(key, embedding.clone());
        Ok(embedding)
    }

    fn dimensions(&self) -> usize {
        self.inner.dimensions()
    }

    fn model(&self) -> &str {
        self.inner.model()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MatchError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingProvider {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl EmbeddingProvider for CountingProvider {
        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(MatchError::Provider("down".to_string()));
            }
            Ok(texts.iter().map(|t| vec![t.len() as f32, 1.0]).collect())
        }

        fn dimensions(&self) -> usize {
            2
        }

        fn model(&self) -> &str {
            "counting"
        }
    }

    #[tokio::test]
    async fn repeated_text_hits_cache() {
        let inner = Arc::new(CountingProvider::default());
        let cached = CachedEmbeddingProvider::new(inner.clone(), 4);

        let first = cached.embed("kidney donor").await.unwrap();
        let second = cached.embed("kidney donor").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn eviction_is_least_recently_used() {
        let inner = Arc::new(CountingProvider::default());
        let cached = CachedEmbeddingProvider::new(inner.clone(), 2);

        cached.embed("a").await.unwrap();
        cached.embed("bb").await.unwrap();
        cached.embed("a").await.unwrap();
        cached.embed("ccc").await.unwrap();
        assert_eq!(inner.calls.load(Ordering::SeqCst), 3);

        // "bb" was evicted, "a" was not
        cached.embed("a").await.unwrap();
        assert_eq!(inner.calls.load(Ordering::SeqCst), 3);
        cached.embed("bb").await.unwrap();
        assert_eq!(inner.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let inner = Arc::new(CountingProvider {
            fail: true,
            ..Default::default()
        });
        let cached = CachedEmbeddingProvider::new(inner.clone(), 4);

        assert!(cached.embed("x").await.is_err());
        assert!(cached.embed("x").await.is_err());
        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn batches_bypass_cache() {
        let inner = Arc::new(CountingProvider::default());
        let cached = CachedEmbeddingProvider::new(inner.clone(), 4);
        let texts = vec!["a".to_string(), "b".to_string()];

        cached.embed_batch(&texts).await.unwrap();
        cached.embed_batch(&texts).await.unwrap();
        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
        assert_eq!(cached.model(), "counting");
        assert_eq!(cached.dimensions(), 2);
    }
}
