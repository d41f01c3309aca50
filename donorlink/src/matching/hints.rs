//! Best-effort extraction of structured hints from free text.

use std::sync::OnceLock;

use regex::Regex;

use crate::models::{KeyInfo, Role};

/// Organ vocabulary in precedence order: the first hit wins, so a text
/// mentioning both a kidney and a liver reads as a kidney case.
const ORGANS: &[(&str, &str)] = &[
    ("kidney", "Kidney"),
    ("pancreas", "Pancreas"),
    ("liver", "Liver"),
    ("heart", "Heart"),
    ("lung", "Lung"),
    ("intestine", "Intestine"),
    ("marrow", "Bone Marrow"),
];

const PATIENT_CUES: &[&str] = &["need", "seeking", "looking for", "require", "patient"];
const DONOR_CUES: &[&str] = &["donate", "donor", "willing to give"];

fn blood_type_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\bblood\s+type\s*:?\s*(ab|a|b|o)([+-]|\b)")
            .expect("blood type pattern is valid")
    })
}

fn age_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bage\s*:?\s*(\d{1,3})\b").expect("age pattern is valid"))
}

pub fn extract_blood_type(text: &str) -> Option<String> {
    let caps = blood_type_regex().captures(text)?;
    let group = caps.get(1)?.as_str().to_uppercase();
    // an unsuffixed "blood type A" is read as A+
    let sign = match caps.get(2).map(|m| m.as_str()) {
        Some("-") => "-",
        _ => "+",
    };
    Some(format!("{group}{sign}"))
}

pub fn extract_organ_type(text: &str) -> Option<String> {
    let lower = text.to_lowercase();
    ORGANS
        .iter()
        .find(|(needle, _)| lower.contains(needle))
        .map(|(_, name)| (*name).to_string())
}

pub fn extract_age(text: &str) -> Option<u32> {
    age_regex()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

pub fn extract_key_info(text: &str) -> KeyInfo {
    KeyInfo {
        blood_type: extract_blood_type(text),
        organ_type: extract_organ_type(text),
        age: extract_age(text),
    }
}

/// Guess who is searching from keyword cues. Patient cues are checked first;
/// text with neither yields `None`.
pub fn infer_searcher_role(text: &str) -> Option<Role> {
    let lower = text.to_lowercase();
    if PATIENT_CUES.iter().any(|cue| lower.contains(cue)) {
        Some(Role::Patient)
    } else if DONOR_CUES.iter().any(|cue| lower.contains(cue)) {
        Some(Role::Donor)
    } else {
        None
    }
}
