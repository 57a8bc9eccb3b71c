//! HTTP error responses.
//!
//! Every failure is rendered as `{"detail": "<message>"}`.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl ApiError {
    pub fn unprocessable(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: detail.into(),
        }
    }
}

impl From<subpulse_core::Error> for ApiError {
    fn from(e: subpulse_core::Error) -> Self {
        error!("Request failed: {}", e);
        Self::internal(e.to_string())
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(e: tokio::task::JoinError) -> Self {
        error!("Analysis task failed: {}", e);
        Self::internal(format!("Analysis task failed: {}", e))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::unprocessable(rejection.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

/// Check an optional `limit` query value against an inclusive range.
pub fn bounded_limit(value: Option<i64>, default: usize, min: usize, max: usize) -> ApiResult<usize> {
    let Some(value) = value else {
        return Ok(default);
    };
    if value < min as i64 || value > max as i64 {
        return Err(ApiError::unprocessable(format!(
            "limit must be between {} and {}, got {}",
            min, max, value
        )));
    }
    Ok(value as usize)
}

/// Check a path parameter that is interpolated into a Reddit URL.
pub fn path_segment(what: &str, value: String) -> ApiResult<String> {
    if subpulse_source::is_safe_segment(&value) {
        Ok(value)
    } else {
        Err(ApiError::unprocessable(format!(
            "{} must contain only letters, digits and underscores",
            what
        )))
    }
}
