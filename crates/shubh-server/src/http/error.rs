//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use shubh_engine::ShubhError;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Malformed query parameter
    BadRequest(String),
    /// The engine could not evaluate the instant
    Engine(ShubhError),
}

impl AppError {
    fn status_and_body(&self) -> (StatusCode, ApiError) {
        match self {
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg))
            }
            AppError::Engine(err) => {
                let code = match err {
                    ShubhError::NoAuspiciousSlotFound(_) => "NO_AUSPICIOUS_SLOT",
                    ShubhError::SunTimeComputationFailed(_) => "SUN_TIME_FAILED",
                    ShubhError::ClockInconsistency(_) => "CLOCK_INCONSISTENCY",
                    _ => "INTERNAL_ERROR",
                };
                (StatusCode::INTERNAL_SERVER_ERROR, ApiError::new(code, err.to_string()))
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = self.status_and_body();
        if status.is_server_error() {
            tracing::error!(code = %error.code, "{}", error.message);
        }
        (status, Json(error)).into_response()
    }
}

impl From<ShubhError> for AppError {
    fn from(err: ShubhError) -> Self {
        AppError::Engine(err)
    }
}
