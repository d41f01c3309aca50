use async_trait::async_trait;

use crate::error::Result;
use crate::models::{EmbeddingRecord, Profile};

/// Keyed storage for profiles and their embeddings, kept 1:1 by profile id.
///
/// Implementations must iterate in a stable order (insertion order for the
/// in-memory backend) so that ranking ties resolve deterministically.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Store or overwrite a profile together with its embedding (last write wins).
    async fn put(&self, profile: Profile, embedding: Vec<f32>) -> Result<()>;

    /// Store several profiles atomically: either every entry lands or none does.
    async fn put_many(&self, entries: Vec<(Profile, Vec<f32>)>) -> Result<()>;

    async fn get(&self, id: &str) -> Result<Option<Profile>>;

    async fn get_embedding(&self, id: &str) -> Result<Option<Vec<f32>>>;

    /// Snapshot of every stored profile.
    async fn all(&self) -> Result<Vec<Profile>>;

    /// Snapshot of every stored embedding record.
    async fn embeddings(&self) -> Result<Vec<EmbeddingRecord>>;

    /// Remove one profile and its embedding. Returns whether anything was removed.
    async fn remove(&self, id: &str) -> Result<bool>;

    async fn clear(&self) -> Result<()>;

    async fn count(&self) -> Result<usize>;
}
