//! Plan execution — applies a reconciliation plan to the remote store.
//!
//! Ordering: the job (parent) update is awaited first; only then are the
//! interviewer requests issued, all of them at once. Deletes, updates and
//! creates are not ordered relative to each other.
//!
//! Failure: the first failure (in delete, update, create dispatch order) is
//! returned once every request has settled. Nothing is rolled back and nothing
//! is retried; the backend may be left partially updated.

use std::fmt;

use futures::future::join_all;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::models::interviewer::InterviewerId;
use crate::models::job::{JobFields, JobId};
use crate::reconcile::plan::Plan;
use crate::store::{RemoteStore, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChildOperation {
    Create,
    Update,
    Delete,
}

impl fmt::Display for ChildOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ChildOperation::Create => "add",
            ChildOperation::Update => "update",
            ChildOperation::Delete => "delete",
        })
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SyncError {
    /// The job itself was rejected. No interviewer request was issued.
    #[error("Failed to update job: {0}")]
    ParentUpdateFailed(#[source] StoreError),

    /// The job was saved but at least one interviewer request failed.
    #[error("Failed to {operation} interviewer: {source} ({failed} of {attempted} interviewer requests failed)")]
    ChildOperationFailed {
        operation: ChildOperation,
        failed: usize,
        attempted: usize,
        #[source]
        source: StoreError,
    },
}

/// What a successful execution did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExecutionReport {
    /// Identities echoed back by the backend; rows without an echo are counted in `created_count`.
    pub created: Vec<InterviewerId>,
    pub created_count: usize,
    pub updated: Vec<InterviewerId>,
    pub deleted: Vec<InterviewerId>,
}

/// Updates the job, then applies `plan` to its interviewers.
pub async fn execute(
    store: &dyn RemoteStore,
    job_id: &JobId,
    job: &JobFields,
    plan: Plan,
) -> Result<ExecutionReport, SyncError> {
    if let Err(e) = store.update_job(job_id, job).await {
        error!("Job {job_id} update rejected, no interviewer changes sent: {e}");
        return Err(SyncError::ParentUpdateFailed(e));
    }
    execute_children(store, job_id, plan).await
}

/// Applies `plan` to the interviewers of an already-saved job.
pub async fn execute_children(
    store: &dyn RemoteStore,
    job_id: &JobId,
    plan: Plan,
) -> Result<ExecutionReport, SyncError> {
    let attempted = plan.len();
    let Plan {
        to_create,
        to_update,
        to_delete,
    } = plan;

    let deletes = join_all(to_delete.iter().map(|id| store.delete_interviewer(id)));
    let updates = join_all(
        to_update
            .iter()
            .map(|u| store.update_interviewer(&u.id, &u.fields)),
    );
    let creates = join_all(
        to_create
            .iter()
            .map(|fields| store.create_interviewer(job_id, fields)),
    );
    let (deleted, updated, created) = futures::join!(deletes, updates, creates);

    let mut report = ExecutionReport::default();
    let mut first_failure: Option<(ChildOperation, StoreError)> = None;
    let mut failed = 0;
    let mut note_failure = |operation: ChildOperation, subject: String, e: StoreError| {
        warn!(
            transport = e.is_transport(),
            "Could not {operation} interviewer {subject} of job {job_id}: {e}"
        );
        failed += 1;
        if first_failure.is_none() {
            first_failure = Some((operation, e));
        }
    };

    for (id, result) in to_delete.into_iter().zip(deleted) {
        match result {
            Ok(()) => report.deleted.push(id),
            Err(e) => note_failure(ChildOperation::Delete, id.to_string(), e),
        }
    }
    for (update, result) in to_update.into_iter().zip(updated) {
        match result {
            Ok(()) => report.updated.push(update.id),
            Err(e) => note_failure(ChildOperation::Update, update.id.to_string(), e),
        }
    }
    for (fields, result) in to_create.iter().zip(created) {
        match result {
            Ok(id) => {
                report.created_count += 1;
                report.created.extend(id);
            }
            Err(e) => note_failure(ChildOperation::Create, format!("'{}'", fields.name), e),
        }
    }

    if let Some((operation, source)) = first_failure {
        return Err(SyncError::ChildOperationFailed {
            operation,
            failed,
            attempted,
            source,
        });
    }

    info!(
        "Job {job_id} interviewers synced: {} created, {} updated, {} deleted",
        report.created_count,
        report.updated.len(),
        report.deleted.len()
    );
    Ok(report)
}
