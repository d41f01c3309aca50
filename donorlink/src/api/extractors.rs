use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;

use crate::error::MatchError;

/// `axum::Json` whose rejections render as the v1 error envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(MatchError))]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for MatchError {
    fn from(rejection: JsonRejection) -> Self {
        map_json_rejection(rejection)
    }
}

fn map_json_rejection(rejection: JsonRejection) -> MatchError {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            let message = err.body_text();
            if let Some(field) = extract_missing_field(&message) {
                MatchError::InvalidRequest(format!("Missing required field: {field}"))
            } else {
                MatchError::InvalidRequest(format!("Invalid JSON: {message}"))
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            MatchError::InvalidRequest(format!("JSON syntax error: {}", err.body_text()))
        }
        JsonRejection::MissingJsonContentType(_) => MatchError::InvalidRequest(
            "Missing `Content-Type: application/json` header".to_string(),
        ),
        JsonRejection::BytesRejection(_) => {
            MatchError::Internal("Failed to read request body".to_string())
        }
        _ => MatchError::InvalidRequest(rejection.body_text()),
    }
}

fn extract_missing_field(message: &str) -> Option<&str> {
    let prefix = "missing field `";
    let start = message.find(prefix)? + prefix.len();
    let remaining = message.get(start..)?;
    let end = remaining.find('`')?;
    remaining.get(..end)
}
