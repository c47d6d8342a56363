//! Shared API error type and handler helpers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// API error type mapping to HTTP status codes.
///
/// Every endpoint surfaces its failures through this type. The body is
/// always `{"msg": <text>}`, the envelope existing clients parse.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({
            "msg": message
        }));

        (status, body).into_response()
    }
}

/// Wraps an unexpected failure as a 500, logging the cause. The error
/// text goes into the response body; clients of the 500 path read it.
pub(crate) fn internal<E: std::fmt::Display>(context: &'static str, err: E) -> ApiError {
    tracing::error!(error = %err, context, "request failed");
    ApiError::Internal(err.to_string())
}

/// Extracts a required text field, treating a missing, null, or empty
/// value as absent — the legacy falsy-field presence check.
pub(crate) fn required_field(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
