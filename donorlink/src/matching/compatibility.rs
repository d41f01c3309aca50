//! Rule-based compatibility scores and the hybrid blend.
//!
//! Every component score lies in `[0, 1]`. A missing input yields the neutral
//! `0.5` rather than a penalty, so sparse profiles are neither favoured nor
//! buried.

use serde::{Deserialize, Serialize};

use crate::models::{Profile, Role, ScoreBreakdown};

const NEUTRAL: f64 = 0.5;

/// Donor blood type -> recipient blood types it can supply.
const BLOOD_COMPATIBILITY: &[(&str, &[&str])] = &[
    ("O-", &["O-", "O+", "A-", "A+", "B-", "B+", "AB-", "AB+"]),
    ("O+", &["O+", "A+", "B+", "AB+"]),
    ("A-", &["A-", "A+", "AB-", "AB+"]),
    ("A+", &["A+", "AB+"]),
    ("B-", &["B-", "B+", "AB-", "AB+"]),
    ("B+", &["B+", "AB+"]),
    ("AB-", &["AB-", "AB+"]),
    ("AB+", &["AB+"]),
];

/// Blend weights. Each weight is in `[0, 1]` and together they sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub ai_similarity: f64,
    pub blood_type: f64,
    pub location: f64,
    pub age: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            ai_similarity: 0.2,
            blood_type: 0.5,
            location: 0.1,
            age: 0.2,
        }
    }
}

impl ScoringWeights {
    pub fn validate(&self) -> Result<(), String> {
        let weights = [self.ai_similarity, self.blood_type, self.location, self.age];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0 || *w > 1.0) {
            return Err(format!("weights must each lie in [0, 1]: {self:?}"));
        }
        let sum: f64 = weights.iter().sum();
        if (sum - 1.0).abs() > 1e-6 {
            return Err(format!("weights must sum to 1.0, got {sum}"));
        }
        Ok(())
    }
}

/// The two profiles of a candidate pairing, oriented by transplant role.
#[derive(Debug, Clone, Copy)]
pub struct RolePair<'a> {
    pub donor: &'a Profile,
    pub patient: &'a Profile,
}

impl<'a> RolePair<'a> {
    /// Decide which side gives and which receives.
    ///
    /// A known searcher role fixes the query's side. Without one the
    /// candidate's own role decides, and the query takes the other side.
    pub fn orient(searcher: Option<Role>, query: &'a Profile, candidate: &'a Profile) -> Self {
        let query_role = searcher.unwrap_or_else(|| candidate.role.opposite());
        match query_role {
            Role::Patient => Self {
                donor: candidate,
                patient: query,
            },
            Role::Donor => Self {
                donor: query,
                patient: candidate,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HybridScore {
    pub score: f64,
    pub breakdown: ScoreBreakdown,
}

fn normalize(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_uppercase)
}

fn same_text(a: Option<&str>, b: Option<&str>) -> bool {
    match (a.map(str::trim), b.map(str::trim)) {
        (Some(a), Some(b)) if !a.is_empty() && !b.is_empty() => a.eq_ignore_ascii_case(b),
        _ => false,
    }
}

/// Score how well `donor` blood can supply `recipient`. Not symmetric.
pub fn blood_type_score(donor: Option<&str>, recipient: Option<&str>) -> f64 {
    let (Some(donor), Some(recipient)) = (normalize(donor), normalize(recipient)) else {
        return NEUTRAL;
    };

    if donor == recipient {
        return 1.0;
    }

    // universal donor / universal recipient
    if donor == "O-" || recipient == "AB+" {
        return 0.99;
    }

    let compatible = BLOOD_COMPATIBILITY
        .iter()
        .find(|(d, _)| *d == donor)
        .is_some_and(|(_, recipients)| recipients.contains(&recipient.as_str()));

    if compatible {
        0.8
    } else {
        0.2
    }
}

pub fn location_score(a: &Profile, b: &Profile) -> f64 {
    let known = |p: &Profile| p.country.as_deref().is_some_and(|c| !c.trim().is_empty());
    if !known(a) || !known(b) {
        return NEUTRAL;
    }

    if same_text(a.city.as_deref(), b.city.as_deref()) {
        1.0
    } else if same_text(a.state.as_deref(), b.state.as_deref()) {
        0.8
    } else if same_text(a.country.as_deref(), b.country.as_deref()) {
        0.4
    } else {
        0.1
    }
}

/// Age proximity. An age of `0` is indistinguishable from a missing age here;
/// that is long-standing observable behaviour and intentionally kept.
pub fn age_score(a: Option<u32>, b: Option<u32>) -> f64 {
    let (Some(a), Some(b)) = (a.filter(|&v| v != 0), b.filter(|&v| v != 0)) else {
        return NEUTRAL;
    };

    match a.abs_diff(b) {
        0..=5 => 1.0,
        6..=10 => 0.9,
        11..=20 => 0.7,
        21..=30 => 0.5,
        _ => 0.3,
    }
}

/// Blend the semantic similarity with the three rule scores.
///
/// Negative cosine similarity is floored at zero so the blend stays in `[0, 1]`.
pub fn hybrid_score(weights: &ScoringWeights, ai_similarity: f64, pair: RolePair<'_>) -> HybridScore {
    let breakdown = ScoreBreakdown {
        ai_similarity: ai_similarity.clamp(0.0, 1.0),
        blood_type_score: blood_type_score(
            pair.donor.blood_type.as_deref(),
            pair.patient.blood_type.as_deref(),
        ),
        location_score: location_score(pair.donor, pair.patient),
        age_score: age_score(pair.donor.age, pair.patient.age),
    };

    let score = weights.ai_similarity * breakdown.ai_similarity
        + weights.blood_type * breakdown.blood_type_score
        + weights.location * breakdown.location_score
        + weights.age * breakdown.age_score;

    HybridScore { score, breakdown }
}
