use serde::{Deserialize, Serialize};

use super::{Profile, Role};

pub const DEFAULT_TOP_N: usize = 5;
pub const DEFAULT_MIN_SIMILARITY: f64 = 0.5;

/// A match query. Either `profile_id` or `profile_text` must be present; when
/// both are, the text drives the query embedding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRequest {
    pub profile_id: Option<String>,
    pub profile_text: Option<String>,
    pub top_n: Option<usize>,
    pub min_similarity: Option<f64>,
    pub searcher_type: Option<Role>,
}

impl MatchRequest {
    pub fn by_profile(id: impl Into<String>) -> Self {
        Self {
            profile_id: Some(id.into()),
            ..Default::default()
        }
    }

    pub fn by_text(text: impl Into<String>) -> Self {
        Self {
            profile_text: Some(text.into()),
            ..Default::default()
        }
    }

    /// Supplied query text, ignoring blank strings.
    pub fn text(&self) -> Option<&str> {
        self.profile_text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    pub fn id(&self) -> Option<&str> {
        self.profile_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

/// The four component scores blended into a hybrid score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub ai_similarity: f64,
    pub blood_type_score: f64,
    pub location_score: f64,
    pub age_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub profile_id: String,
    pub profile: Profile,
    /// Same value as `hybrid_score`; kept for clients of the older field name.
    pub similarity: f64,
    pub hybrid_score: f64,
    pub rank: usize,
    pub reason: String,
    pub score_breakdown: ScoreBreakdown,
}

/// Structured hints pulled out of free text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyInfo {
    pub blood_type: Option<String>,
    pub organ_type: Option<String>,
    pub age: Option<u32>,
}
