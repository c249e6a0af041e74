//! In-memory `RemoteStore` that records every call, for tests.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Barrier;

use crate::models::interviewer::{InterviewerFields, InterviewerId};
use crate::models::job::{JobFields, JobId, JobRecord};
use crate::store::{RemoteStore, StoreConnector, StoreError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    FetchJob(JobId),
    CreateJob(JobFields),
    UpdateJob(JobId),
    CreateInterviewer(JobId, InterviewerFields),
    UpdateInterviewer(InterviewerId, InterviewerFields),
    DeleteInterviewer(InterviewerId),
}

impl Call {
    pub fn is_child(&self) -> bool {
        matches!(
            self,
            Call::CreateInterviewer(..) | Call::UpdateInterviewer(..) | Call::DeleteInterviewer(_)
        )
    }
}

#[derive(Default)]
pub struct MockStore {
    pub job: Option<JobRecord>,
    pub fail_update_job: bool,
    pub fail_interviewers: HashSet<InterviewerId>,
    /// Creates whose name is listed here are rejected.
    pub fail_creates: HashSet<String>,
    /// When set, every child call waits here before completing.
    pub child_barrier: Option<Arc<Barrier>>,
    pub(crate) calls: Mutex<Vec<Call>>,
    pub(crate) next_id: Mutex<u32>,
}

impl MockStore {
    pub fn with_job(job: JobRecord) -> Self {
        Self {
            job: Some(job),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn child_calls(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_child).collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    async fn child_gate(&self) {
        if let Some(barrier) = &self.child_barrier {
            barrier.wait().await;
        }
    }

    fn rejected(message: &str) -> StoreError {
        StoreError::Rejected {
            status: 500,
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl RemoteStore for MockStore {
    async fn fetch_job(&self, job_id: &JobId) -> Result<JobRecord, StoreError> {
        self.record(Call::FetchJob(job_id.clone()));
        self.job
            .clone()
            .filter(|job| &job.id == job_id)
            .ok_or_else(|| StoreError::NotFound(format!("Job {job_id} not found")))
    }

    async fn create_job(&self, job: &JobFields) -> Result<JobId, StoreError> {
        self.record(Call::CreateJob(job.clone()));
        Ok(JobId::from("job-new"))
    }

    async fn update_job(&self, job_id: &JobId, _job: &JobFields) -> Result<(), StoreError> {
        self.record(Call::UpdateJob(job_id.clone()));
        if self.fail_update_job {
            return Err(Self::rejected("job update refused"));
        }
        Ok(())
    }

    async fn create_interviewer(
        &self,
        job_id: &JobId,
        fields: &InterviewerFields,
    ) -> Result<Option<InterviewerId>, StoreError> {
        self.record(Call::CreateInterviewer(job_id.clone(), fields.clone()));
        self.child_gate().await;
        if self.fail_creates.contains(&fields.name) {
            return Err(Self::rejected(&format!("cannot add {}", fields.name)));
        }
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        Ok(Some(InterviewerId(format!("new-{next}"))))
    }

    async fn update_interviewer(
        &self,
        id: &InterviewerId,
        fields: &InterviewerFields,
    ) -> Result<(), StoreError> {
        self.record(Call::UpdateInterviewer(id.clone(), fields.clone()));
        self.child_gate().await;
        if self.fail_interviewers.contains(id) {
            return Err(Self::rejected(&format!("cannot update {id}")));
        }
        Ok(())
    }

    async fn delete_interviewer(&self, id: &InterviewerId) -> Result<(), StoreError> {
        self.record(Call::DeleteInterviewer(id.clone()));
        self.child_gate().await;
        if self.fail_interviewers.contains(id) {
            return Err(Self::rejected(&format!("cannot delete {id}")));
        }
        Ok(())
    }
}

/// Hands out the same `MockStore` regardless of token and remembers the tokens seen.
pub struct MockConnector {
    pub store: Arc<MockStore>,
    pub tokens: Mutex<Vec<String>>,
}

impl MockConnector {
    pub fn new(store: MockStore) -> Self {
        Self {
            store: Arc::new(store),
            tokens: Mutex::new(Vec::new()),
        }
    }
}

impl StoreConnector for MockConnector {
    fn connect(&self, bearer_token: &str) -> Arc<dyn RemoteStore> {
        self.tokens.lock().unwrap().push(bearer_token.to_string());
        self.store.clone()
    }
}
