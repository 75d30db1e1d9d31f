//! Request Handlers

use crate::error::ApiError;
use crate::types::{EnqueueRequest, ErrorResponse, MessageResponse};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, HeaderName, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use queuedesk_core::application::QueueService;
use queuedesk_core::error::AppError;
use std::sync::Arc;
use tracing::debug;

/// POST /person
pub async fn add_person(
    State(service): State<Arc<QueueService>>,
    payload: Result<Json<EnqueueRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let Json(req) = payload
        .map_err(|rejection| ApiError::new("add_person", AppError::Validation(rejection.body_text())))?;

    service
        .enqueue(req)
        .await
        .map_err(|e| ApiError::new("add_person", e))?;

    Ok((StatusCode::CREATED, Json(MessageResponse::person_added())))
}

/// GET /list
pub async fn get_queue_list(
    State(service): State<Arc<QueueService>>,
) -> Result<([(HeaderName, HeaderValue); 2], Vec<u8>), ApiError> {
    let report = service
        .export_report()
        .await
        .map_err(|e| ApiError::new("get_queue_list", e))?;

    let disposition = HeaderValue::from_str(&format!(
        "attachment; filename=\"{}\"",
        report.file_name.replace('"', "")
    ))
    .map_err(|e| {
        ApiError::new(
            "get_queue_list",
            AppError::Internal(format!("Invalid download file name: {}", e)),
        )
    })?;

    debug!(entries = report.entries, bytes = report.document.len(), "Sending queue document");

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(report.content_type)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        report.document,
    ))
}

/// Fallback for unknown routes
pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "not found".to_string(),
        }),
    )
}
