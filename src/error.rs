//! Error types for the resolver service
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Api Error Enum ==
/// Unified error type for the resolver and its HTTP surface.
///
/// `Clone` so a single in-flight upstream result can be handed to every
/// coalesced caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Upstream credential missing; never retried
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Identity, region or match does not exist upstream
    #[error("Not found: {0}")]
    NotFound(String),

    /// Non-2xx (other than 404) status, transport failure, decode failure or timeout
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// Returns true for the `NotFound` variant.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        let reason = if err.is_timeout() {
            "request timed out"
        } else if err.is_connect() {
            "connection refused or unreachable"
        } else if err.is_decode() {
            "response decode error"
        } else if err.is_body() {
            "response body error"
        } else {
            "request failed"
        };
        ApiError::Upstream(reason.to_string())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Configuration(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the resolver service.
pub type Result<T> = std::result::Result<T, ApiError>;
