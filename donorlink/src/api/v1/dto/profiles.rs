//! Profile request/response DTOs for the v1 API.

use serde::{Deserialize, Serialize};

use crate::models::{Profile, Role};

// ---------------------------------------------------------------------------
// Request DTOs
// ---------------------------------------------------------------------------

/// Request body for `POST /v1/profiles`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProfileRequest {
    /// Profile id. Generated when omitted.
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub role: Role,
    pub description: String,
    #[serde(default)]
    pub medical_info: String,
    pub preferences: Option<String>,
    /// ABO/Rh blood type such as `O-` or `AB+`.
    pub blood_type: Option<String>,
    pub age: Option<u32>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub organ_type: Option<String>,
}

impl CreateProfileRequest {
    pub fn into_profile(self) -> Profile {
        let id = self
            .id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| nanoid::nanoid!());

        Profile {
            id,
            name: self.name,
            role: self.role,
            description: self.description,
            medical_info: self.medical_info,
            preferences: self.preferences,
            blood_type: self.blood_type,
            age: self.age,
            country: self.country,
            state: self.state,
            city: self.city,
            organ_type: self.organ_type,
        }
    }
}

/// Request body for `POST /v1/profiles:batch`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchCreateProfilesRequest {
    pub profiles: Vec<CreateProfileRequest>,
}

// ---------------------------------------------------------------------------
// Response DTOs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileListResponse {
    pub profiles: Vec<Profile>,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchCreateProfilesResponse {
    pub stored: usize,
    pub profile_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteProfilesResponse {
    pub deleted: bool,
}
