//! Match request/response DTOs for the v1 API.

use serde::{Deserialize, Serialize};

use crate::models::{MatchRequest, MatchResult, Role};

/// Request body for `POST /v1/matches`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FindMatchesRequest {
    /// Match against a stored profile.
    pub profile_id: Option<String>,
    /// Free-text query. Takes precedence over `profileId` for the embedding.
    pub profile_text: Option<String>,
    /// Maximum results (default 5).
    pub top_n: Option<usize>,
    /// Inclusive hybrid score floor (default 0.5).
    pub min_similarity: Option<f64>,
    /// Who is searching. Inferred from the query when omitted.
    pub searcher_type: Option<Role>,
    /// Ask the configured LLM for a short explanation of the results.
    #[serde(default)]
    pub summarize: bool,
}

impl From<FindMatchesRequest> for MatchRequest {
    fn from(req: FindMatchesRequest) -> Self {
        Self {
            profile_id: req.profile_id,
            profile_text: req.profile_text,
            top_n: req.top_n,
            min_similarity: req.min_similarity,
            searcher_type: req.searcher_type,
        }
    }
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FindMatchesResponse {
    pub matches: Vec<MatchResult>,
}
