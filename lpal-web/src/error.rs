//! Error types for lpal-web
//!
//! JSON error bodies follow the API contract: `{"error": msg}` for bad
//! requests and upstream failures, `{"success": false, "error": msg}` for
//! unknown vocabulary lists.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::tutor::TutorError;

/// Message for requests lacking a required field
pub const MISSING_PARAMETERS: &str = "Missing required parameters";

/// Client-facing message for any tutor backend failure; details are logged only
pub const UPSTREAM_UNAVAILABLE: &str = "AI tutor service unavailable";

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// AI tutor backend failed (502)
    #[error("AI tutor service failed: {0}")]
    Upstream(#[from] TutorError),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// lpal-common error
    #[error("Common error: {0}")]
    Common(#[from] lpal_common::Error),
}

impl ApiError {
    pub fn missing_parameters() -> Self {
        ApiError::BadRequest(MISSING_PARAMETERS.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
            }
            ApiError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "success": false, "error": msg })),
            )
                .into_response(),
            ApiError::Upstream(err) => {
                error!(error = %err, "AI tutor request failed");
                (
                    StatusCode::BAD_GATEWAY,
                    Json(json!({ "error": UPSTREAM_UNAVAILABLE })),
                )
                    .into_response()
            }
            ApiError::Internal(msg) => {
                error!(error = %msg, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": msg }))).into_response()
            }
            ApiError::Common(err) => match err {
                lpal_common::Error::InvalidInput(msg) => ApiError::BadRequest(msg).into_response(),
                lpal_common::Error::NotFound(msg) => ApiError::NotFound(msg).into_response(),
                other => ApiError::Internal(other.to_string()).into_response(),
            },
        }
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
