//! v1 Profile handlers.

use axum::extract::{Path, State};

use crate::api::extractors::AppJson;
use crate::api::v1::dto::{
    BatchCreateProfilesRequest, BatchCreateProfilesResponse, CreateProfileRequest,
    DeleteProfilesResponse, ProfileListResponse,
};
use crate::api::v1::response::{ApiError, ApiResponse, ResponseMeta};
use crate::api::AppState;
use crate::models::Profile;

/// `GET /api/v1/profiles`
#[utoipa::path(
    get,
    path = "/api/v1/profiles",
    tag = "profiles",
    operation_id = "profiles.list",
    responses(
        (status = 200, description = "All stored profiles in insertion order", body = ProfileListResponse),
    )
)]
pub async fn list_profiles(State(state): State<AppState>) -> ApiResponse<ProfileListResponse> {
    match state.matching.get_all_profiles().await {
        Ok(profiles) => {
            let meta = ResponseMeta {
                total: Some(profiles.len() as u64),
                ..Default::default()
            };
            ApiResponse::success_with_meta(ProfileListResponse { profiles }, meta)
        }
        Err(e) => e.into(),
    }
}

/// `POST /api/v1/profiles`
#[utoipa::path(
    post,
    path = "/api/v1/profiles",
    tag = "profiles",
    operation_id = "profiles.create",
    request_body = CreateProfileRequest,
    responses(
        (status = 201, description = "Profile embedded and stored", body = Profile),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 502, description = "Embedding provider failure", body = ApiError),
    )
)]
pub async fn create_profile(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateProfileRequest>,
) -> ApiResponse<Profile> {
    match state.matching.store_profile(req.into_profile()).await {
        Ok(profile) => ApiResponse::created(profile),
        Err(e) => e.into(),
    }
}

/// `POST /api/v1/profiles:batch`
#[utoipa::path(
    post,
    path = "/api/v1/profiles:batch",
    tag = "profiles",
    operation_id = "profiles.batchCreate",
    request_body = BatchCreateProfilesRequest,
    responses(
        (status = 201, description = "Every profile stored", body = BatchCreateProfilesResponse),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 502, description = "Embedding provider failure, nothing stored", body = ApiError),
    )
)]
pub async fn batch_create_profiles(
    State(state): State<AppState>,
    AppJson(req): AppJson<BatchCreateProfilesRequest>,
) -> ApiResponse<BatchCreateProfilesResponse> {
    let profiles: Vec<Profile> = req
        .profiles
        .into_iter()
        .map(CreateProfileRequest::into_profile)
        .collect();

    match state.matching.store_profiles(profiles).await {
        Ok(stored) => ApiResponse::created(BatchCreateProfilesResponse {
            stored: stored.len(),
            profile_ids: stored.into_iter().map(|p| p.id).collect(),
        }),
        Err(e) => e.into(),
    }
}

/// `DELETE /api/v1/profiles`
#[utoipa::path(
    delete,
    path = "/api/v1/profiles",
    tag = "profiles",
    operation_id = "profiles.clear",
    responses(
        (status = 200, description = "All profiles and embeddings removed", body = DeleteProfilesResponse),
    )
)]
pub async fn clear_profiles(State(state): State<AppState>) -> ApiResponse<DeleteProfilesResponse> {
    match state.matching.clear_all().await {
        Ok(()) => ApiResponse::success(DeleteProfilesResponse { deleted: true }),
        Err(e) => e.into(),
    }
}

/// `GET /api/v1/profiles/{profileId}`
#[utoipa::path(
    get,
    path = "/api/v1/profiles/{profileId}",
    tag = "profiles",
    operation_id = "profiles.get",
    params(("profileId" = String, Path, description = "Profile ID")),
    responses(
        (status = 200, description = "Profile found", body = Profile),
        (status = 404, description = "Profile not found", body = ApiError),
    )
)]
pub async fn get_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResponse<Profile> {
    match state.matching.get_profile(&id).await {
        Ok(profile) => ApiResponse::success(profile),
        Err(e) => e.into(),
    }
}

/// `DELETE /api/v1/profiles/{profileId}`
#[utoipa::path(
    delete,
    path = "/api/v1/profiles/{profileId}",
    tag = "profiles",
    operation_id = "profiles.delete",
    params(("profileId" = String, Path, description = "Profile ID")),
    responses(
        (status = 200, description = "Profile removed", body = DeleteProfilesResponse),
        (status = 404, description = "Profile not found", body = ApiError),
    )
)]
pub async fn delete_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResponse<DeleteProfilesResponse> {
    match state.matching.remove_profile(&id).await {
        Ok(()) => ApiResponse::success(DeleteProfilesResponse { deleted: true }),
        Err(e) => e.into(),
    }
}
