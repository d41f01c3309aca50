//! Pure scoring building blocks of the matcher: similarity, compatibility
//! rules, text hints, reasons and ranking. Nothing here performs I/O.

mod compatibility;
mod hints;
mod ranking;
mod reason;
mod similarity;

pub use compatibility::{
    age_score, blood_type_score, hybrid_score, location_score, HybridScore, RolePair,
    ScoringWeights,
};
pub use hints::{
    extract_age, extract_blood_type, extract_key_info, extract_organ_type, infer_searcher_role,
};
pub use ranking::{rank_candidates, ScoredCandidate};
pub use reason::generate_match_reason;
pub use similarity::cosine_similarity;
