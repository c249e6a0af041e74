/// HTTP implementation of `RemoteStore` against the recruiting REST backend.
///
/// Endpoints (relative to `BACKEND_URL`):
///   jobs          GET/PUT /jobs/:id, POST /jobs
///   interviewers  POST /interviewers, PUT/DELETE /interviewers/:id
///
/// No retries: a failed request is terminal for the save attempt that issued it.
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::interviewer::{InterviewerFields, InterviewerId};
use crate::models::job::{JobFields, JobId, JobRecord};
use crate::store::{RemoteStore, StoreConnector, StoreError};

/// `POST /jobs` takes the team as a nested block, unlike `PUT /jobs/:id`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateJobBody<'a> {
    title: &'a str,
    location: &'a str,
    team_description: &'a str,
    job_description: &'a str,
    responsibilities: &'a [String],
    recruitment_team: TeamBody<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TeamBody<'a> {
    team_name: &'a str,
    manager: &'a str,
}

impl<'a> From<&'a JobFields> for CreateJobBody<'a> {
    fn from(job: &'a JobFields) -> Self {
        Self {
            title: &job.title,
            location: &job.location,
            team_description: &job.team_description,
            job_description: &job.job_description,
            responsibilities: &job.responsibilities,
            recruitment_team: TeamBody {
                team_name: &job.recruitment_team_name,
                manager: &job.recruitment_manager,
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateInterviewerBody<'a> {
    job_id: &'a JobId,
    name: &'a str,
    department: &'a str,
}

#[derive(Debug, Serialize)]
struct UpdateInterviewerBody<'a> {
    name: &'a str,
    department: &'a str,
}

#[derive(Debug, Deserialize)]
struct Created {
    id: String,
}

/// Shared connection pool plus backend location. Cheap to clone.
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: String, timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url,
        })
    }
}

impl StoreConnector for BackendClient {
    fn connect(&self, bearer_token: &str) -> Arc<dyn RemoteStore> {
        Arc::new(HttpStore {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: bearer_token.to_string(),
        })
    }
}

/// A `RemoteStore` bound to one caller's bearer token.
pub struct HttpStore {
    client: Client,
    base_url: String,
    token: String,
}

impl HttpStore {
    fn jobs_url(&self) -> String {
        format!("{}/jobs", self.base_url)
    }

    fn job_url(&self, job_id: &JobId) -> String {
        format!("{}/jobs/{}", self.base_url, job_id)
    }

    fn interviewers_url(&self) -> String {
        format!("{}/interviewers", self.base_url)
    }

    fn interviewer_url(&self, id: &InterviewerId) -> String {
        format!("{}/interviewers/{}", self.base_url, id)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, StoreError> {
        let response = request.bearer_auth(&self.token).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(rejection(status, body))
    }
}

fn rejection(status: StatusCode, body: String) -> StoreError {
    if status == StatusCode::NOT_FOUND {
        StoreError::NotFound(body)
    } else {
        StoreError::Rejected {
            status: status.as_u16(),
            message: body,
        }
    }
}

/// Reads `{"id": ..}` from a create response. Any other 2xx body yields `None`.
fn created_id(body: &str) -> Option<String> {
    serde_json::from_str::<Created>(body).ok().map(|c| c.id)
}

#[async_trait]
impl RemoteStore for HttpStore {
    async fn fetch_job(&self, job_id: &JobId) -> Result<JobRecord, StoreError> {
        let response = self.send(self.client.get(self.job_url(job_id))).await?;
        let body = response.text().await?;
        let record: JobRecord = serde_json::from_str(&body)?;
        debug!(
            "Fetched job {job_id} with {} interviewers",
            record.interviewers.len()
        );
        Ok(record)
    }

    async fn create_job(&self, job: &JobFields) -> Result<JobId, StoreError> {
        let body = CreateJobBody::from(job);
        let response = self
            .send(self.client.post(self.jobs_url()).json(&body))
            .await?;
        let body = response.text().await?;
        created_id(&body)
            .map(JobId)
            .ok_or_else(|| StoreError::Decode(format!("create job response has no id: {body}")))
    }

    async fn update_job(&self, job_id: &JobId, job: &JobFields) -> Result<(), StoreError> {
        self.send(self.client.put(self.job_url(job_id)).json(job))
            .await?;
        Ok(())
    }

    async fn create_interviewer(
        &self,
        job_id: &JobId,
        fields: &InterviewerFields,
    ) -> Result<Option<InterviewerId>, StoreError> {
        let body = CreateInterviewerBody {
            job_id,
            name: &fields.name,
            department: &fields.department,
        };
        let response = self
            .send(self.client.post(self.interviewers_url()).json(&body))
            .await?;
        let body = response.text().await.unwrap_or_default();
        Ok(created_id(&body).map(InterviewerId))
    }

    async fn update_interviewer(
        &self,
        id: &InterviewerId,
        fields: &InterviewerFields,
    ) -> Result<(), StoreError> {
        let body = UpdateInterviewerBody {
            name: &fields.name,
            department: &fields.department,
        };
        self.send(self.client.put(self.interviewer_url(id)).json(&body))
            .await?;
        Ok(())
    }

    async fn delete_interviewer(&self, id: &InterviewerId) -> Result<(), StoreError> {
        self.send(self.client.delete(self.interviewer_url(id)))
            .await?;
        Ok(())
    }
}
