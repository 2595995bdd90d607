//! Standardized API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub registry_healthy: bool,
    pub renderer_healthy: bool,
    pub active_bins: u64,
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
        }
    }
}

/// API error with a coded JSON body.
///
/// Used by the capture and clear endpoints; the history page renders its
/// failures as HTML instead.
pub struct ApiError {
    pub status: StatusCode,
    pub response: ErrorResponse,
}

impl ApiError {
    pub fn with_code(status: StatusCode, code: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            status,
            response: ErrorResponse::new(msg, code),
        }
    }

    pub fn invalid_bin_id(msg: impl Into<String>) -> Self {
        Self::with_code(StatusCode::BAD_REQUEST, "BIN_001", msg)
    }

    pub fn capture(msg: impl Into<String>) -> Self {
        Self::with_code(StatusCode::BAD_REQUEST, "REQ_001", msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_code(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL", msg)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<bin_core::Error> for ApiError {
    fn from(err: bin_core::Error) -> Self {
        let status = StatusCode::from_u16(err.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        match &err {
            bin_core::Error::Store { code, message, .. } => {
                ApiError::with_code(status, *code, message)
            }
            // Validation messages go out verbatim, without the Display prefix.
            bin_core::Error::InvalidBinId(message) => {
                ApiError::with_code(status, "BIN_001", message)
            }
            bin_core::Error::Capture(message) => ApiError::with_code(status, "REQ_001", message),
            _ => ApiError::with_code(status, "INTERNAL", err.to_string()),
        }
    }
}
