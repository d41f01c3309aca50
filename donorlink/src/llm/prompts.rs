//! Prompt templates for match summaries.
//!
//! Templates use plain `format!()` interpolation.

use crate::models::MatchResult;

pub const MATCH_SUMMARY_SYSTEM_PROMPT: &str = "You are an assistant for a transplant \
coordination team. You explain ranked donor/patient matches in plain language. \
You never invent medical facts that are not in the data you are given.";

/// Generate a prompt asking for a short explanation of a ranked match list
///
/// # Example
/// ```
/// use donorlink::llm::prompts::match_summary_prompt;
///
/// let prompt = match_summary_prompt("Need kidney, blood type O+", &[]);
/// assert!(prompt.contains("Need kidney"));
/// assert!(prompt.contains("No candidates"));
/// ```
pub fn match_summary_prompt(query: &str, matches: &[MatchResult]) -> String {
    let candidates = if matches.is_empty() {
        "No candidates passed the score threshold.".to_string()
    } else {
        matches
            .iter()
            .map(|m| {
                let profile = &m.profile;
                format!(
                    "{rank}. {name} ({role}) score={score:.2} ai={ai:.2} blood={blood:.2} location={loc:.2} age={age:.2}\n   blood type: {bt}, organ: {organ}, age: {years}, location: {place}\n   highlights: {reason}",
                    rank = m.rank,
                    name = profile.name,
                    role = profile.role,
                    score = m.hybrid_score,
                    ai = m.score_breakdown.ai_similarity,
                    blood = m.score_breakdown.blood_type_score,
                    loc = m.score_breakdown.location_score,
                    age = m.score_breakdown.age_score,
                    bt = profile.blood_type.as_deref().unwrap_or("unknown"),
                    organ = profile.organ_type.as_deref().unwrap_or("unknown"),
                    years = profile
                        .age
                        .map(|a| a.to_string())
                        .unwrap_or_else(|| "unknown".to_string()),
                    place = location_line(m),
                    reason = m.reason,
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        r#"A coordinator searched for matches with this request:
{query}

Ranked candidates (score is a weighted blend of text similarity, blood type, location and age compatibility):
{candidates}

In at most 4 sentences, explain which candidates look most promising and why.
Mention any important caveats such as unknown blood type or distant location.
Respond with plain text only."#
    )
}

fn location_line(m: &MatchResult) -> String {
    let parts: Vec<&str> = [&m.profile.city, &m.profile.state, &m.profile.country]
        .into_iter()
        .filter_map(|p| p.as_deref())
        .filter(|p| !p.trim().is_empty())
        .collect();
    if parts.is_empty() {
        "unknown".to_string()
    } else {
        parts.join(", ")
    }
}
