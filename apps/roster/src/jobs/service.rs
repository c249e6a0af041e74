//! Job editing flows — load, preview, save and create.
//!
//! Save flow: validate → begin attempt → fetch prior interviewers →
//! reconcile → update job → fan out interviewer requests → record outcome.
//!
//! The prior snapshot is fetched at save time, so a retry after a partial
//! failure diffs against what actually landed on the backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::interviewer::{Interviewer, InterviewerDraft};
use crate::models::job::{JobFields, JobId};
use crate::reconcile::{
    execute, execute_children, reconcile, DesiredSequence, ExecutionReport, Plan, PriorSnapshot,
    SaveState, SaveTracker,
};
use crate::store::RemoteStore;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// The edited job as submitted by the UI.
#[derive(Debug, Clone, Deserialize)]
pub struct JobEdit {
    pub job: JobFields,
    #[serde(default)]
    pub interviewers: Vec<InterviewerDraft>,
}

#[derive(Debug, Serialize)]
pub struct EditSession {
    pub job_id: JobId,
    pub job: JobFields,
    pub last_updated: Option<DateTime<Utc>>,
    /// What the backend holds now.
    pub prior: Vec<Interviewer>,
    /// Starting point for the editable list.
    pub interviewers: DesiredSequence,
}

#[derive(Debug, Serialize)]
pub struct SaveOutcome {
    pub attempt_id: Uuid,
    pub job_id: JobId,
    pub state: SaveState,
    pub report: ExecutionReport,
}

// ────────────────────────────────────────────────────────────────────────────
// Flows
// ────────────────────────────────────────────────────────────────────────────

pub async fn load_edit_session(
    store: &dyn RemoteStore,
    job_id: &JobId,
) -> Result<EditSession, AppError> {
    let record = store.fetch_job(job_id).await?;
    let job = record.fields();
    let last_updated = record
        .updated_at
        .or(record.created_at)
        .and_then(|ts| ts.to_datetime());
    let prior = PriorSnapshot::new(record.interviewers)?;
    let interviewers = DesiredSequence::seeded_from(&prior);
    Ok(EditSession {
        job_id: record.id,
        job,
        last_updated,
        prior: prior.into_inner(),
        interviewers,
    })
}

/// Returns the plan a save of `edit` would execute right now, without executing it.
pub async fn preview_plan(
    store: &dyn RemoteStore,
    job_id: &JobId,
    edit: JobEdit,
) -> Result<Plan, AppError> {
    validate(&edit.job, &edit.interviewers)?;
    let prior = fetch_prior(store, job_id).await?;
    Ok(reconcile(&prior, &DesiredSequence::from(edit.interviewers))?)
}

pub async fn save_job_edit(
    store: &dyn RemoteStore,
    tracker: &SaveTracker,
    job_id: &JobId,
    edit: JobEdit,
) -> Result<SaveOutcome, AppError> {
    validate(&edit.job, &edit.interviewers)?;

    let guard = tracker.begin(job_id)?;
    let attempt_id = Uuid::new_v4();
    let span = info_span!("save_job", job_id = %job_id, attempt_id = %attempt_id);

    let result = async move {
        let prior = fetch_prior(store, job_id).await?;
        let desired = DesiredSequence::from(edit.interviewers);
        let plan = reconcile(&prior, &desired)?;
        if plan.is_empty() {
            info!("No interviewers before or after the edit, updating job only");
        } else {
            info!(
                "Plan for {} rows: {} create, {} update, {} delete",
                desired.len(),
                plan.to_create.len(),
                plan.to_update.len(),
                plan.to_delete.len()
            );
        }
        Ok::<_, AppError>(execute(store, job_id, &edit.job, plan).await?)
    }
    .instrument(span)
    .await;

    match result {
        Ok(report) => {
            guard.succeed();
            Ok(SaveOutcome {
                attempt_id,
                job_id: job_id.clone(),
                state: SaveState::Succeeded,
                report,
            })
        }
        Err(e) => {
            guard.fail();
            Err(e)
        }
    }
}

/// Creates the job, then its interviewers. A child failure leaves the job in place.
pub async fn create_job(store: &dyn RemoteStore, edit: JobEdit) -> Result<SaveOutcome, AppError> {
    validate(&edit.job, &edit.interviewers)?;
    // New rows only: any identity here is unknown to an empty snapshot.
    let plan = reconcile(
        &PriorSnapshot::empty(),
        &DesiredSequence::from(edit.interviewers),
    )?;

    let job_id = store.create_job(&edit.job).await?;
    let attempt_id = Uuid::new_v4();
    info!(%attempt_id, "Created job {job_id}, adding {} interviewers", plan.to_create.len());

    let report = execute_children(store, &job_id, plan).await?;
    Ok(SaveOutcome {
        attempt_id,
        job_id,
        state: SaveState::Succeeded,
        report,
    })
}

async fn fetch_prior(store: &dyn RemoteStore, job_id: &JobId) -> Result<PriorSnapshot, AppError> {
    let record = store.fetch_job(job_id).await?;
    Ok(PriorSnapshot::new(record.interviewers)?)
}

fn validate(job: &JobFields, interviewers: &[InterviewerDraft]) -> Result<(), AppError> {
    if job.title.trim().is_empty() {
        return Err(AppError::Validation("title cannot be empty".to_string()));
    }
    for (position, interviewer) in interviewers.iter().enumerate() {
        if interviewer.name.trim().is_empty() {
            return Err(AppError::Validation(format!(
                "interviewer #{} has no name",
                position + 1
            )));
        }
        if interviewer.department.trim().is_empty() {
            return Err(AppError::Validation(format!(
                "interviewer #{} has no department",
                position + 1
            )));
        }
    }
    Ok(())
}
