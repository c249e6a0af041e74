use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::reconcile::{ReconcileError, SaveInProgress, SyncError};
use crate::store::StoreError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Backend error: {0}")]
    Backend(StoreError),

    #[error(transparent)]
    Sync(#[from] SyncError),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(msg) => AppError::NotFound(msg),
            other => AppError::Backend(other),
        }
    }
}

impl From<ReconcileError> for AppError {
    fn from(e: ReconcileError) -> Self {
        AppError::Conflict(format!("{e}; reload the job and try again"))
    }
}

impl From<SaveInProgress> for AppError {
    fn from(e: SaveInProgress) -> Self {
        AppError::Conflict(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required".to_string(),
            ),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::Backend(e) => {
                tracing::error!("Backend error: {e}");
                (StatusCode::BAD_GATEWAY, "BACKEND_ERROR", e.to_string())
            }
            // Upstream messages pass through verbatim so the user can act on them.
            AppError::Sync(e @ SyncError::ParentUpdateFailed(_)) => {
                (StatusCode::BAD_GATEWAY, "PARENT_UPDATE_FAILED", e.to_string())
            }
            AppError::Sync(e @ SyncError::ChildOperationFailed { .. }) => (
                StatusCode::BAD_GATEWAY,
                "CHILD_OPERATION_FAILED",
                e.to_string(),
            ),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
