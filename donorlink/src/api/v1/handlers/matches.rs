//! v1 Match handler.

use axum::extract::State;

use crate::api::extractors::AppJson;
use crate::api::v1::dto::{FindMatchesRequest, FindMatchesResponse};
use crate::api::v1::response::{ApiError, ApiResponse, ResponseMeta};
use crate::api::AppState;
use crate::models::MatchRequest;

/// `POST /api/v1/matches`
#[utoipa::path(
    post,
    path = "/api/v1/matches",
    tag = "matches",
    operation_id = "matches.find",
    request_body = FindMatchesRequest,
    responses(
        (status = 200, description = "Ranked matches", body = FindMatchesResponse),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 404, description = "Query profile not found", body = ApiError),
        (status = 502, description = "Embedding provider failure", body = ApiError),
    )
)]
pub async fn find_matches(
    State(state): State<AppState>,
    AppJson(req): AppJson<FindMatchesRequest>,
) -> ApiResponse<FindMatchesResponse> {
    let summarize = req.summarize;
    let request = MatchRequest::from(req);

    let outcome = match state.matching.run_match(&request).await {
        Ok(outcome) => outcome,
        Err(e) => return e.into(),
    };

    let summary = if summarize {
        state
            .matching
            .summarize_matches(&outcome.query_text, &outcome.matches)
            .await
    } else {
        None
    };

    let meta = ResponseMeta {
        total: Some(outcome.matches.len() as u64),
        summary,
    };

    ApiResponse::success_with_meta(
        FindMatchesResponse {
            matches: outcome.matches,
        },
        meta,
    )
}
