use crate::models::Profile;

use super::hints::extract_key_info;

const MAX_REASONS: usize = 4;
const SEPARATOR: &str = " • ";
const FALLBACK_REASON: &str = "Medical profile matches criteria";

const NON_SMOKER_CUES: &[&str] = &["non-smoker", "nonsmoker", "non smoker", "don't smoke", "do not smoke"];
const HEALTHY_CUES: &[&str] = &["healthy", "active lifestyle", "exercise", "athletic"];
const TRAVEL_CUES: &[&str] = &["willing to travel", "can travel", "able to travel", "relocate"];

fn mentions(text: &str, cues: &[&str]) -> bool {
    cues.iter().any(|cue| text.contains(cue))
}

/// Human-readable explanation for why `candidate` surfaced for `query_text`.
///
/// Hints are pulled independently from the candidate's own text and from the
/// query; at most four notes are kept, in a fixed order.
pub fn generate_match_reason(candidate: &Profile, query_text: &str) -> String {
    let candidate_text = candidate.medical_text();
    let candidate_lower = candidate_text.to_lowercase();
    let candidate_info = extract_key_info(&candidate_text);
    let query_info = extract_key_info(query_text);

    let mut reasons = Vec::new();

    if let (Some(theirs), Some(ours)) = (&candidate_info.organ_type, &query_info.organ_type) {
        if theirs.eq_ignore_ascii_case(ours) {
            reasons.push(format!("{theirs} match"));
        }
    }

    if let (Some(theirs), Some(ours)) = (&candidate_info.blood_type, &query_info.blood_type) {
        if theirs == ours {
            reasons.push(format!("Blood type {theirs} match"));
        }
    }

    if let (Some(theirs), Some(ours)) = (candidate_info.age, query_info.age) {
        if theirs.abs_diff(ours) <= 20 {
            reasons.push(format!("Age compatible ({theirs} years)"));
        }
    }

    if mentions(&candidate_lower, NON_SMOKER_CUES) {
        reasons.push("Non-smoker".to_string());
    }

    if mentions(&candidate_lower, HEALTHY_CUES) {
        reasons.push("Healthy lifestyle".to_string());
    }

    if mentions(&candidate_lower, TRAVEL_CUES) {
        reasons.push("Willing to travel".to_string());
    }

    if reasons.is_empty() {
        return FALLBACK_REASON.to_string();
    }

    reasons.truncate(MAX_REASONS);
    reasons.join(SEPARATOR)
}
