//! Remote store — the recruiting backend as seen by the reconciler.
//!
//! `RemoteStore` is the seam: `HttpStore` talks to the real REST backend,
//! tests use the in-memory `MockStore`. Handlers never hold a store directly;
//! they ask the `StoreConnector` in `AppState` for one scoped to the caller's
//! bearer token.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::interviewer::{InterviewerFields, InterviewerId};
use crate::models::job::{JobFields, JobId, JobRecord};

pub mod http;
#[cfg(test)]
pub mod mock;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Non-2xx response. `message` is the response body verbatim.
    #[error("status {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("not found: {0}")]
    NotFound(String),

    /// Network-level failure. Retry semantics are the same as `Rejected`.
    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed response: {0}")]
    Decode(String),
}

impl StoreError {
    pub fn is_transport(&self) -> bool {
        matches!(self, StoreError::Transport(_))
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(e: reqwest::Error) -> Self {
        StoreError::Transport(e.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Decode(e.to_string())
    }
}

/// Every call is an independent request; no call retries.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn fetch_job(&self, job_id: &JobId) -> Result<JobRecord, StoreError>;

    async fn create_job(&self, job: &JobFields) -> Result<JobId, StoreError>;

    /// Parent update. Committed before any interviewer request of the same save.
    async fn update_job(&self, job_id: &JobId, job: &JobFields) -> Result<(), StoreError>;

    /// Returns the new identity when the backend echoes one.
    async fn create_interviewer(
        &self,
        job_id: &JobId,
        fields: &InterviewerFields,
    ) -> Result<Option<InterviewerId>, StoreError>;

    async fn update_interviewer(
        &self,
        id: &InterviewerId,
        fields: &InterviewerFields,
    ) -> Result<(), StoreError>;

    async fn delete_interviewer(&self, id: &InterviewerId) -> Result<(), StoreError>;
}

/// Builds a `RemoteStore` that authenticates as the caller.
pub trait StoreConnector: Send + Sync {
    fn connect(&self, bearer_token: &str) -> Arc<dyn RemoteStore>;
}
