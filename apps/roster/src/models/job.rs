#![allow(dead_code)]

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::interviewer::{Interviewer, Timestamp};

/// Server-assigned job identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JobId {
    fn from(id: &str) -> Self {
        JobId(id.to_string())
    }
}

/// The editable fields of a job posting, in the backend's wire shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobFields {
    pub title: String,
    pub location: String,
    pub team_description: String,
    pub job_description: String,
    pub responsibilities: Vec<String>,
    pub recruitment_team_name: String,
    pub recruitment_manager: String,
}

/// Legacy nested team block found on older job records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecruitmentTeam {
    #[serde(default)]
    pub team_name: String,
    #[serde(default)]
    pub manager: String,
}

/// A job as returned by `GET /jobs/:id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub id: JobId,
    pub title: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub team_description: String,
    #[serde(default)]
    pub job_description: String,
    #[serde(default)]
    pub responsibilities: Vec<String>,
    #[serde(default)]
    pub recruitment_team_name: Option<String>,
    #[serde(default)]
    pub recruitment_manager: Option<String>,
    #[serde(default)]
    pub recruitment_team: Option<RecruitmentTeam>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
    #[serde(default)]
    pub interviewers: Vec<Interviewer>,
    #[serde(default)]
    pub candidates: Vec<Value>,
}

impl JobRecord {
    /// Flat team fields win over the nested legacy block; blanks count as missing.
    pub fn fields(&self) -> JobFields {
        let nested = self.recruitment_team.clone().unwrap_or_default();
        JobFields {
            title: self.title.clone(),
            location: self.location.clone(),
            team_description: self.team_description.clone(),
            job_description: self.job_description.clone(),
            responsibilities: self.responsibilities.clone(),
            recruitment_team_name: non_blank(self.recruitment_team_name.as_deref())
                .unwrap_or(nested.team_name),
            recruitment_manager: non_blank(self.recruitment_manager.as_deref())
                .unwrap_or(nested.manager),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}
