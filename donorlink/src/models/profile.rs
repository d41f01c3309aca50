use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which side of a transplant a profile (or a searcher) stands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Patient,
    Donor,
}

impl Role {
    /// The role a searcher of this role is looking for.
    pub fn opposite(self) -> Self {
        match self {
            Role::Patient => Role::Donor,
            Role::Donor => Role::Patient,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Patient => write!(f, "patient"),
            Self::Donor => write!(f, "donor"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "patient" => Ok(Self::Patient),
            "donor" => Ok(Self::Donor),
            _ => Err(format!("Unknown profile type: {s}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub role: Role,
    pub description: String,
    #[serde(default)]
    pub medical_info: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organ_type: Option<String>,
}

impl Profile {
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role,
            description: String::new(),
            medical_info: String::new(),
            preferences: None,
            blood_type: None,
            age: None,
            country: None,
            state: None,
            city: None,
            organ_type: None,
        }
    }

    /// Rejects profiles missing the identity fields every stored profile needs.
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::MatchError;

        if self.id.trim().is_empty() {
            return Err(MatchError::InvalidRequest("Profile id cannot be empty".into()));
        }
        if self.name.trim().is_empty() {
            return Err(MatchError::InvalidRequest("Profile name cannot be empty".into()));
        }
        if self.description.trim().is_empty() {
            return Err(MatchError::InvalidRequest(
                "Profile description cannot be empty".into(),
            ));
        }
        Ok(())
    }

    /// Text sent to the embedding provider and used for hint extraction when
    /// the profile itself is the query.
    pub fn embedding_text(&self) -> String {
        let mut parts = vec![format!("{} ({})", self.name, self.role)];
        parts.push(self.description.trim().to_string());
        if !self.medical_info.trim().is_empty() {
            parts.push(format!("Medical information: {}", self.medical_info.trim()));
        }
        if let Some(preferences) = self.preferences.as_deref().filter(|p| !p.trim().is_empty()) {
            parts.push(format!("Preferences: {}", preferences.trim()));
        }
        parts.join(". ")
    }

    /// Free text describing the candidate's own medical situation.
    pub fn medical_text(&self) -> String {
        format!("{} {}", self.medical_info, self.description)
    }
}

/// Embedding held alongside a stored profile, 1:1 by `profile_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddingRecord {
    pub profile_id: String,
    pub embedding: Vec<f32>,
    pub timestamp: DateTime<Utc>,
}

impl EmbeddingRecord {
    pub fn new(profile_id: impl Into<String>, embedding: Vec<f32>) -> Self {
        Self {
            profile_id: profile_id.into(),
            embedding,
            timestamp: Utc::now(),
        }
    }
}
