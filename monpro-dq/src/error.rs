//! API error types for monpro-dq
//!
//! The only errors visible to callers are input rejection and
//! throttling, both returned synchronously before background work
//! begins. Everything else terminates in a server-side log line.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use monpro_common::diagnostic::DiagnosticResponse;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400); carries the generic public message only
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// 7-day cooldown rejection (429) with the user-facing countdown
    #[error("Cooldown active: {days_remaining} day(s) remaining")]
    Cooldown { days_remaining: i64 },

    /// Per-IP flood rejection (429), without the cooldown marker
    #[error("Too many requests")]
    TooManyRequests,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                DiagnosticResponse::rejected(message),
            ),
            ApiError::Cooldown { days_remaining } => (
                StatusCode::TOO_MANY_REQUESTS,
                DiagnosticResponse::throttled(days_remaining),
            ),
            ApiError::TooManyRequests => (
                StatusCode::TOO_MANY_REQUESTS,
                DiagnosticResponse::rejected("Too many requests"),
            ),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
