use axum::Json;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

use super::dto;
use super::handlers;
use super::response;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Donorlink API",
        version = "1.0.0",
        description = "Hybrid semantic and rule-based matching of patients with organ donors.",
    ),
    paths(
        handlers::health::health_check,
        handlers::profiles::list_profiles,
        handlers::profiles::create_profile,
        handlers::profiles::batch_create_profiles,
        handlers::profiles::clear_profiles,
        handlers::profiles::get_profile,
        handlers::profiles::delete_profile,
        handlers::matches::find_matches,
    ),
    components(schemas(
        // Response envelope
        response::ErrorCode,
        response::ApiError,
        response::ResponseMeta,
        // Domain
        models::Role,
        models::Profile,
        models::ScoreBreakdown,
        models::MatchResult,
        // Profiles
        dto::profiles::CreateProfileRequest,
        dto::profiles::BatchCreateProfilesRequest,
        dto::profiles::ProfileListResponse,
        dto::profiles::BatchCreateProfilesResponse,
        dto::profiles::DeleteProfilesResponse,
        // Matches
        dto::matches::FindMatchesRequest,
        dto::matches::FindMatchesResponse,
        // Health (handler-local types)
        handlers::health::HealthData,
        handlers::health::StoreStatus,
        handlers::health::EmbeddingsStatus,
        handlers::health::LlmStatus,
    )),
    tags(
        (name = "health", description = "Health check"),
        (name = "profiles", description = "Profile storage and retrieval"),
        (name = "matches", description = "Ranked patient/donor matching"),
    ),
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn redoc_router<S: Clone + Send + Sync + 'static>() -> axum::Router<S> {
    Redoc::with_url("/docs", ApiDoc::openapi()).into()
}
