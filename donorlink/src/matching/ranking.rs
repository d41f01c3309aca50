use std::cmp::Ordering;

use crate::models::{MatchResult, Profile};

use super::compatibility::HybridScore;

/// A candidate that survived the hard filters, before ranking.
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub profile: Profile,
    pub hybrid: HybridScore,
    pub reason: String,
}

/// Drop candidates under `min_similarity` (inclusive floor), order the rest
/// by descending hybrid score and keep the first `top_n`.
///
/// The sort is stable: equal scores keep the order they were scored in.
pub fn rank_candidates(
    candidates: Vec<ScoredCandidate>,
    min_similarity: f64,
    top_n: usize,
) -> Vec<MatchResult> {
    let mut kept: Vec<ScoredCandidate> = candidates
        .into_iter()
        .filter(|c| c.hybrid.score >= min_similarity)
        .collect();

    kept.sort_by(|a, b| {
        b.hybrid
            .score
            .partial_cmp(&a.hybrid.score)
            .unwrap_or(Ordering::Equal)
    });

    kept.into_iter()
        .take(top_n)
        .enumerate()
        .map(|(i, c)| MatchResult {
            profile_id: c.profile.id.clone(),
            similarity: c.hybrid.score,
            hybrid_score: c.hybrid.score,
            rank: i + 1,
            reason: c.reason,
            score_breakdown: c.hybrid.breakdown,
            profile: c.profile,
        })
        .collect()
}
