//! Axum route handlers for the Jobs API.
//!
//! Every handler requires `Authorization: Bearer <token>`; the token is
//! forwarded unchanged to the recruiting backend.

use axum::{
    extract::{Path, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::jobs::service::{self, EditSession, JobEdit, SaveOutcome};
use crate::models::job::JobId;
use crate::reconcile::{Plan, SaveState};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SaveStatusResponse {
    pub job_id: JobId,
    pub state: SaveState,
}

/// GET /api/v1/jobs/:id/edit
pub async fn handle_load_edit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(job_id): Path<String>,
) -> Result<Json<EditSession>, AppError> {
    let store = state.store.connect(bearer_token(&headers)?);
    let session = service::load_edit_session(store.as_ref(), &JobId(job_id)).await?;
    Ok(Json(session))
}

/// POST /api/v1/jobs/:id/plan
///
/// Dry run: the create/update/delete partition a save would execute.
pub async fn handle_preview_plan(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(job_id): Path<String>,
    Json(edit): Json<JobEdit>,
) -> Result<Json<Plan>, AppError> {
    let store = state.store.connect(bearer_token(&headers)?);
    let plan = service::preview_plan(store.as_ref(), &JobId(job_id), edit).await?;
    Ok(Json(plan))
}

/// PUT /api/v1/jobs/:id
pub async fn handle_save(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(job_id): Path<String>,
    Json(edit): Json<JobEdit>,
) -> Result<Json<SaveOutcome>, AppError> {
    let store = state.store.connect(bearer_token(&headers)?);
    let outcome =
        service::save_job_edit(store.as_ref(), &state.saves, &JobId(job_id), edit).await?;
    Ok(Json(outcome))
}

/// GET /api/v1/jobs/:id/save-status
pub async fn handle_save_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(job_id): Path<String>,
) -> Result<Json<SaveStatusResponse>, AppError> {
    bearer_token(&headers)?;
    let job_id = JobId(job_id);
    Ok(Json(SaveStatusResponse {
        state: state.saves.state(&job_id),
        job_id,
    }))
}

/// POST /api/v1/jobs
pub async fn handle_create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(edit): Json<JobEdit>,
) -> Result<(StatusCode, Json<SaveOutcome>), AppError> {
    let store = state.store.connect(bearer_token(&headers)?);
    let outcome = service::create_job(store.as_ref(), edit).await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AppError::Unauthorized)
}
