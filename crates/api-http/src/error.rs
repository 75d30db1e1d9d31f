//! HTTP Error Mapping
//!
//! Client errors become 400, everything else 500. The body is always
//! `{"error": "<message>"}`.

use crate::types::ErrorResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use queuedesk_core::error::AppError;
use tracing::{error, warn};

/// An `AppError` tagged with the operation that produced it
#[derive(Debug)]
pub struct ApiError {
    operation: &'static str,
    error: AppError,
}

impl ApiError {
    pub fn new(operation: &'static str, error: AppError) -> Self {
        Self { operation, error }
    }

    pub fn status(&self) -> StatusCode {
        if self.error.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            error!(operation = self.operation, error = %self.error, "Request failed");
        } else {
            warn!(operation = self.operation, error = %self.error, "Request rejected");
        }

        let body = ErrorResponse {
            error: self.error.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
