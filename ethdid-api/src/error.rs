//! API error handling.
//!
//! Only request-shape problems become an `ApiError`; lookup and publish
//! outcomes are always rendered through their own DTOs.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use ethdid_core::error::EthDidError;

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    /// Bad request error.
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, detail)
    }

    /// Internal server error.
    pub fn internal(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, detail)
    }

    /// Returns the HTTP status.
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

/// Error response body.
#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            detail: self.detail,
        };

        (self.status, Json(body)).into_response()
    }
}

impl From<EthDidError> for ApiError {
    fn from(err: EthDidError) -> Self {
        match &err {
            EthDidError::InvalidDomain(_) => ApiError::bad_request("Domain must end with .eth"),
            _ if err.is_validation_error() => ApiError::bad_request(err.to_string()),
            _ => {
                tracing::error!(error = %err, "Internal error");
                ApiError::internal("An internal error occurred")
            }
        }
    }
}
