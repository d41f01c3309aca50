//! In-process profile store backed by `HashMap`s under a `tokio::sync::RwLock`.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::db::traits::ProfileStore;
use crate::error::{MatchError, Result};
use crate::models::{EmbeddingRecord, Profile};

#[derive(Debug, Default)]
struct Inner {
    /// Profile ids in first-insertion order; overwrites keep their slot.
    order: Vec<String>,
    profiles: HashMap<String, Profile>,
    embeddings: HashMap<String, EmbeddingRecord>,
}

impl Inner {
    fn insert(&mut self, profile: Profile, embedding: Vec<f32>) {
        let id = profile.id.clone();
        if !self.profiles.contains_key(&id) && !self.embeddings.contains_key(&id) {
            self.order.push(id.clone());
        }
        self.embeddings
            .insert(id.clone(), EmbeddingRecord::new(id.clone(), embedding));
        self.profiles.insert(id, profile);
    }
}

#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    inner: RwLock<Inner>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn check_entry(profile: &Profile, embedding: &[f32]) -> Result<()> {
    if embedding.is_empty() {
        return Err(MatchError::InvalidInput(format!(
            "refusing to store profile {} without an embedding",
            profile.id
        )));
    }
    Ok(())
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn put(&self, profile: Profile, embedding: Vec<f32>) -> Result<()> {
        check_entry(&profile, &embedding)?;
        self.inner.write().await.insert(profile, embedding);
        Ok(())
    }

    async fn put_many(&self, entries: Vec<(Profile, Vec<f32>)>) -> Result<()> {
        for (profile, embedding) in &entries {
            check_entry(profile, embedding)?;
        }
        let mut inner = self.inner.write().await;
        for (profile, embedding) in entries {
            inner.insert(profile, embedding);
        }
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Profile>> {
        Ok(self.inner.read().await.profiles.get(id).cloned())
    }

    async fn get_embedding(&self, id: &str) -> Result<Option<Vec<f32>>> {
        Ok(self
            .inner
            .read()
            .await
            .embeddings
            .get(id)
            .map(|record| record.embedding.clone()))
    }

    async fn all(&self) -> Result<Vec<Profile>> {
        let inner = self.inner.read().await;
        Ok(inner
            .order
            .iter()
            .filter_map(|id| inner.profiles.get(id).cloned())
            .collect())
    }

    async fn embeddings(&self) -> Result<Vec<EmbeddingRecord>> {
        let inner = self.inner.read().await;
        Ok(inner
            .order
            .iter()
            .filter_map(|id| inner.embeddings.get(id).cloned())
            .collect())
    }

    async fn remove(&self, id: &str) -> Result<bool> {
        let mut inner = self.inner.write().await;
        let had_profile = inner.profiles.remove(id).is_some();
        let had_embedding = inner.embeddings.remove(id).is_some();
        inner.order.retain(|existing| existing != id);
        Ok(had_profile || had_embedding)
    }

    async fn clear(&self) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.order.clear();
        inner.profiles.clear();
        inner.embeddings.clear();
        Ok(())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.inner.read().await.profiles.len())
    }
}
