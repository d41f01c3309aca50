use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use crate::config::MatchingConfig;
use crate::db::ProfileStore;
use crate::embeddings::EmbeddingProvider;
use crate::error::{MatchError, Result};
use crate::llm::prompts::{match_summary_prompt, MATCH_SUMMARY_SYSTEM_PROMPT};
use crate::llm::{CompletionOptions, LlmProvider};
use crate::matching::{
    cosine_similarity, extract_key_info, extract_organ_type, generate_match_reason,
    hybrid_score, infer_searcher_role, rank_candidates, RolePair, ScoredCandidate,
};
use crate::models::{MatchRequest, MatchResult, Profile, Role};

/// Ranked matches together with the text the query was interpreted from.
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    pub query_text: String,
    pub matches: Vec<MatchResult>,
}

/// Everything derived from a [`MatchRequest`] before candidates are scanned.
struct ResolvedQuery {
    embedding: Vec<f32>,
    text: String,
    searcher: Option<Role>,
    /// Stand-in profile scored against candidates: stored fields overlaid
    /// with hints pulled from the query text.
    profile: Profile,
    exclude_id: Option<String>,
}

#[derive(Clone)]
pub struct MatchingService {
    store: Arc<dyn ProfileStore>,
    embeddings: Arc<dyn EmbeddingProvider>,
    llm: LlmProvider,
    config: MatchingConfig,
}

impl MatchingService {
    pub fn new(
        store: Arc<dyn ProfileStore>,
        embeddings: Arc<dyn EmbeddingProvider>,
        llm: LlmProvider,
        config: MatchingConfig,
    ) -> Self {
        Self {
            store,
            embeddings,
            llm,
            config,
        }
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Embed and store one profile, replacing any profile with the same id.
    pub async fn store_profile(&self, profile: Profile) -> Result<Profile> {
        profile.validate()?;

        let embedding = self.embeddings.embed(&profile.embedding_text()).await?;
        self.store.put(profile.clone(), embedding).await?;

        tracing::debug!(profile_id = %profile.id, role = %profile.role, "Stored profile");
        Ok(profile)
    }

    /// Embed all profiles in a single provider call and store them together.
    /// Nothing is stored unless every profile received an embedding.
    pub async fn store_profiles(&self, profiles: Vec<Profile>) -> Result<Vec<Profile>> {
        if profiles.is_empty() {
            return Ok(Vec::new());
        }
        for profile in &profiles {
            profile.validate()?;
        }

        let texts: Vec<String> = profiles.iter().map(Profile::embedding_text).collect();
        let embeddings = self.embeddings.embed_batch(&texts).await?;

        if embeddings.len() != profiles.len() || embeddings.iter().any(Vec::is_empty) {
            return Err(MatchError::Provider(format!(
                "Embedding batch incomplete: {} profiles, {} usable embeddings",
                profiles.len(),
                embeddings.iter().filter(|e| !e.is_empty()).count()
            )));
        }

        let entries: Vec<(Profile, Vec<f32>)> =
            profiles.iter().cloned().zip(embeddings).collect();
        self.store.put_many(entries).await?;

        tracing::info!(count = profiles.len(), "Stored profile batch");
        Ok(profiles)
    }

    pub async fn get_profile(&self, id: &str) -> Result<Profile> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| MatchError::NotFound(format!("Profile {id} not found")))
    }

    pub async fn get_all_profiles(&self) -> Result<Vec<Profile>> {
        self.store.all().await
    }

    pub async fn remove_profile(&self, id: &str) -> Result<()> {
        if !self.store.remove(id).await? {
            return Err(MatchError::NotFound(format!("Profile {id} not found")));
        }
        tracing::debug!(profile_id = %id, "Removed profile");
        Ok(())
    }

    pub async fn clear_all(&self) -> Result<()> {
        self.store.clear().await?;
        tracing::info!("Cleared all profiles");
        Ok(())
    }

    pub async fn count(&self) -> Result<usize> {
        self.store.count().await
    }

    pub async fn find_top_matches(&self, request: &MatchRequest) -> Result<Vec<MatchResult>> {
        Ok(self.run_match(request).await?.matches)
    }

    pub async fn run_match(&self, request: &MatchRequest) -> Result<MatchOutcome> {
        let start = Instant::now();

        let top_n = request.top_n.unwrap_or(self.config.default_top_n);
        if top_n == 0 {
            return Err(MatchError::InvalidRequest("topN must be at least 1".to_string()));
        }
        let min_similarity = request
            .min_similarity
            .unwrap_or(self.config.default_min_similarity);
        if !min_similarity.is_finite() {
            return Err(MatchError::InvalidRequest(
                "minSimilarity must be a finite number".to_string(),
            ));
        }

        let query = self.resolve_query(request).await?;
        let query_organ = query.profile.organ_type.clone();

        let profiles: HashMap<String, Profile> = self
            .store
            .all()
            .await?
            .into_iter()
            .map(|p| (p.id.clone(), p))
            .collect();
        let records = self.store.embeddings().await?;

        let mut scored = Vec::new();
        for record in records {
            if query.exclude_id.as_deref() == Some(record.profile_id.as_str()) {
                continue;
            }

            let Some(candidate) = profiles.get(&record.profile_id) else {
                tracing::warn!(
                    profile_id = %record.profile_id,
                    "Embedding has no stored profile, skipping candidate"
                );
                continue;
            };

            if let Some(searcher) = query.searcher {
                if candidate.role != searcher.opposite() {
                    continue;
                }
            }

            if let Some(wanted) = query_organ.as_deref() {
                let offered = candidate
                    .organ_type
                    .clone()
                    .filter(|o| !o.trim().is_empty())
                    .or_else(|| extract_organ_type(&candidate.medical_text()));
                if offered.is_some_and(|o| !o.trim().eq_ignore_ascii_case(wanted.trim())) {
                    continue;
                }
            }

            let ai_similarity = cosine_similarity(&query.embedding, &record.embedding)?;
            let pair = RolePair::orient(query.searcher, &query.profile, candidate);
            let hybrid = hybrid_score(&self.config.weights, ai_similarity, pair);

            scored.push(ScoredCandidate {
                profile: candidate.clone(),
                hybrid,
                reason: generate_match_reason(candidate, &query.text),
            });
        }

        let considered = scored.len();
        let matches = rank_candidates(scored, min_similarity, top_n);

        tracing::debug!(
            candidates = considered,
            returned = matches.len(),
            searcher = ?query.searcher,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Match query complete"
        );

        Ok(MatchOutcome {
            query_text: query.text,
            matches,
        })
    }

    async fn resolve_query(&self, request: &MatchRequest) -> Result<ResolvedQuery> {
        let (embedding, text, stored) = match (request.text(), request.id()) {
            (Some(text), id) => {
                let embedding = self.embeddings.embed(text).await?;
                let stored = match id {
                    Some(id) => self.store.get(id).await?,
                    None => None,
                };
                (embedding, text.to_string(), stored)
            }
            (None, Some(id)) => {
                let profile = self
                    .store
                    .get(id)
                    .await?
                    .ok_or_else(|| MatchError::NotFound(format!("Profile {id} not found")))?;
                let embedding = self.store.get_embedding(id).await?.ok_or_else(|| {
                    MatchError::NotFound(format!("No embedding stored for profile {id}"))
                })?;
                (embedding, profile.embedding_text(), Some(profile))
            }
            (None, None) => {
                return Err(MatchError::InvalidRequest(
                    "Either profileId or profileText is required".to_string(),
                ))
            }
        };

        let searcher = request
            .searcher_type
            .or_else(|| stored.as_ref().map(|p| p.role))
            .or_else(|| infer_searcher_role(&text));

        let hints = extract_key_info(&text);
        let mut profile = stored
            .clone()
            .unwrap_or_else(|| Profile::new("", "query", searcher.unwrap_or(Role::Patient)));
        profile.blood_type = hints.blood_type.or(profile.blood_type);
        profile.organ_type = hints
            .organ_type
            .or(profile.organ_type)
            .filter(|o| !o.trim().is_empty());
        profile.age = hints.age.or(profile.age);

        Ok(ResolvedQuery {
            embedding,
            text,
            searcher,
            profile,
            exclude_id: request.id().map(str::to_string),
        })
    }

    /// Ask the LLM to explain a ranked list. Best-effort: any failure is
    /// logged and yields `None`.
    pub async fn summarize_matches(&self, query_text: &str, matches: &[MatchResult]) -> Option<String> {
        if !self.llm.is_available() {
            tracing::debug!("Match summary requested but no LLM is configured");
            return None;
        }

        let prompt = match_summary_prompt(query_text, matches);
        let options = CompletionOptions {
            temperature: Some(0.2),
            max_tokens: Some(300),
        };

        match self
            .llm
            .complete(&prompt, Some(MATCH_SUMMARY_SYSTEM_PROMPT), Some(&options))
            .await
        {
            Ok(summary) => Some(summary),
            Err(e) => {
                tracing::warn!(error = %e, "Match summary generation failed");
                None
            }
        }
    }
}
