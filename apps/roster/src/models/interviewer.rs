#![allow(dead_code)]

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::job::JobId;

/// Server-assigned interviewer identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InterviewerId(pub String);

impl fmt::Display for InterviewerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for InterviewerId {
    fn from(id: &str) -> Self {
        InterviewerId(id.to_string())
    }
}

/// Backend timestamp in its wire form: `{"_seconds": .., "_nanoseconds": ..}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamp {
    #[serde(rename = "_seconds")]
    pub seconds: i64,
    #[serde(rename = "_nanoseconds")]
    pub nanoseconds: u32,
}

impl Timestamp {
    /// `None` when the value is outside chrono's representable range.
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.seconds, self.nanoseconds)
    }
}

/// An interviewer as stored on the backend. Always carries an identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interviewer {
    pub id: InterviewerId,
    #[serde(default)]
    pub job_id: Option<JobId>,
    pub name: String,
    pub department: String,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
}

/// The user-editable part of an interviewer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewerFields {
    pub name: String,
    pub department: String,
}

/// One row of the interviewer list being edited.
/// `id` is present only for interviewers that already exist on the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewerDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<InterviewerId>,
    pub name: String,
    pub department: String,
}

impl InterviewerDraft {
    pub fn new(name: impl Into<String>, department: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            department: department.into(),
        }
    }

    pub fn existing(
        id: impl Into<InterviewerId>,
        name: impl Into<String>,
        department: impl Into<String>,
    ) -> Self {
        Self {
            id: Some(id.into()),
            name: name.into(),
            department: department.into(),
        }
    }

    pub fn fields(&self) -> InterviewerFields {
        InterviewerFields {
            name: self.name.clone(),
            department: self.department.clone(),
        }
    }
}

impl From<&Interviewer> for InterviewerDraft {
    fn from(interviewer: &Interviewer) -> Self {
        Self {
            id: Some(interviewer.id.clone()),
            name: interviewer.name.clone(),
            department: interviewer.department.clone(),
        }
    }
}
