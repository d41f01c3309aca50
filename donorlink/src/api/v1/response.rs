//! v1 response envelope.
//!
//! Every endpoint answers `{ "data": ..., "meta": ..., "error": ... }`, with
//! absent fields omitted. `data` and `error` never appear together.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::MatchError;

/// Snake_case error code carried in the `error` object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Malformed body or failed validation. HTTP 400.
    InvalidRequest,
    /// Unknown profile id. HTTP 404.
    NotFound,
    /// The embedding service failed or refused the call. HTTP 502.
    ProviderError,
    /// Anything else. Details stay in the server log. HTTP 500.
    InternalError,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            Self::InvalidRequest => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::ProviderError => StatusCode::BAD_GATEWAY,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn classify(err: &MatchError) -> Self {
        match err {
            MatchError::InvalidRequest(_) | MatchError::Json(_) => Self::InvalidRequest,
            MatchError::NotFound(_) => Self::NotFound,
            e if e.is_provider_failure() => Self::ProviderError,
            _ => Self::InternalError,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ApiError {
    pub code: ErrorCode,
    /// Safe to show to end users.
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    /// LLM explanation of a match list, when requested and produced.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
    #[serde(skip)]
    status: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    fn with_status(status: StatusCode, data: T, meta: Option<ResponseMeta>) -> Self {
        Self {
            data: Some(data),
            meta,
            error: None,
            status,
        }
    }

    pub fn success(data: T) -> Self {
        Self::with_status(StatusCode::OK, data, None)
    }

    pub fn success_with_meta(data: T, meta: ResponseMeta) -> Self {
        Self::with_status(StatusCode::OK, data, Some(meta))
    }

    pub fn created(data: T) -> Self {
        Self::with_status(StatusCode::CREATED, data, None)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

impl IntoResponse for MatchError {
    fn into_response(self) -> Response {
        ApiResponse::<()>::from(self).into_response()
    }
}

/// Message shown to the caller for `err` under `code`.
fn public_message(code: ErrorCode, err: &MatchError) -> String {
    match (code, err) {
        (_, MatchError::InvalidRequest(msg) | MatchError::NotFound(msg)) => msg.clone(),
        (_, MatchError::Json(e)) => format!("Invalid JSON: {e}"),
        (ErrorCode::ProviderError, MatchError::ProviderRateLimit { retry_after: Some(secs) }) => {
            format!("Rate limit exceeded, retry after {secs} seconds")
        }
        (ErrorCode::ProviderError, MatchError::ProviderRateLimit { retry_after: None }) => {
            "Rate limit exceeded".to_string()
        }
        (ErrorCode::ProviderError, _) => "The embedding provider is unavailable".to_string(),
        _ => "An internal error occurred".to_string(),
    }
}

impl<T: Serialize> From<MatchError> for ApiResponse<T> {
    fn from(err: MatchError) -> Self {
        let code = ErrorCode::classify(&err);
        match code {
            ErrorCode::ProviderError => tracing::warn!(error = %err, "Embedding provider failure"),
            ErrorCode::InternalError => tracing::error!(error = %err, "Internal error"),
            _ => {}
        }

        Self {
            data: None,
            meta: None,
            error: Some(ApiError {
                message: public_message(code, &err),
                code,
            }),
            status: code.status(),
        }
    }
}
