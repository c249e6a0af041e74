//! Reconciliation — diffs an edited interviewer list against the server's last
//! known list and partitions it into create / update / delete operations.
//!
//! Matching is by identity only. Position in the list carries no meaning for
//! the plan, and matched interviewers are always resubmitted in full.

use std::collections::HashSet;

use serde::Serialize;
use thiserror::Error;

use crate::models::interviewer::{Interviewer, InterviewerDraft, InterviewerFields, InterviewerId};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReconcileError {
    #[error("interviewer {0} is not part of this job")]
    UnknownIdentity(InterviewerId),

    #[error("interviewer {0} appears more than once")]
    DuplicateIdentity(InterviewerId),
}

// ────────────────────────────────────────────────────────────────────────────
// Inputs
// ────────────────────────────────────────────────────────────────────────────

/// Interviewers as last fetched from the backend. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriorSnapshot(Vec<Interviewer>);

impl PriorSnapshot {
    pub fn new(interviewers: Vec<Interviewer>) -> Result<Self, ReconcileError> {
        let mut seen = HashSet::new();
        for interviewer in &interviewers {
            if !seen.insert(&interviewer.id) {
                return Err(ReconcileError::DuplicateIdentity(interviewer.id.clone()));
            }
        }
        Ok(Self(interviewers))
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Interviewer> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Vec<Interviewer> {
        self.0
    }
}

/// The interviewer list as the user wants it, in presentation order.
///
/// Mutations never assign or change an identity: new rows are identity-less
/// until the backend creates them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DesiredSequence(Vec<InterviewerDraft>);

impl DesiredSequence {
    /// Seeds an edit session: same order, same identities as the snapshot.
    pub fn seeded_from(prior: &PriorSnapshot) -> Self {
        Self(prior.iter().map(InterviewerDraft::from).collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = &InterviewerDraft> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

// Row edits made by the UI between load and save.
/// The list edits the UI applies client-side before submitting the whole
/// list. The service itself only receives finished lists, so these are kept
/// as the reference model for what a submitted list may contain.
#[allow(dead_code)]
impl DesiredSequence {
    /// Appends a blank row, as the "add interviewer" button does.
    pub fn add_blank(&mut self) {
        self.0.push(InterviewerDraft::default());
    }

    /// Appends a new interviewer. Any identity on `fields` is not carried over.
    pub fn add(&mut self, fields: InterviewerFields) {
        self.0.push(InterviewerDraft {
            id: None,
            name: fields.name,
            department: fields.department,
        });
    }

    /// Removes the row at `index`, returning it. Out-of-range is a no-op.
    pub fn remove(&mut self, index: usize) -> Option<InterviewerDraft> {
        (index < self.0.len()).then(|| self.0.remove(index))
    }

    /// Replaces the fields at `index`, keeping its identity.
    /// Returns `false` when `index` is out of range.
    pub fn edit(&mut self, index: usize, fields: InterviewerFields) -> bool {
        match self.0.get_mut(index) {
            Some(draft) => {
                draft.name = fields.name;
                draft.department = fields.department;
                true
            }
            None => false,
        }
    }
}

impl From<Vec<InterviewerDraft>> for DesiredSequence {
    fn from(drafts: Vec<InterviewerDraft>) -> Self {
        Self(drafts)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Plan
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedUpdate {
    pub id: InterviewerId,
    #[serde(flatten)]
    pub fields: InterviewerFields,
}

/// The operations that turn the prior list into the desired one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Plan {
    pub to_create: Vec<InterviewerFields>,
    pub to_update: Vec<PlannedUpdate>,
    pub to_delete: Vec<InterviewerId>,
}

impl Plan {
    pub fn len(&self) -> usize {
        self.to_create.len() + self.to_update.len() + self.to_delete.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Partitions `desired` against `prior`.
///
/// - `to_delete`: identities in `prior` missing from `desired` (prior order)
/// - `to_update`: identities in both, with the desired fields (desired order)
/// - `to_create`: identity-less rows of `desired` (desired order)
///
/// An identity in `desired` that `prior` does not know, or that appears twice,
/// is an error: the edit was made against a different version of the job.
pub fn reconcile(prior: &PriorSnapshot, desired: &DesiredSequence) -> Result<Plan, ReconcileError> {
    let known: HashSet<&InterviewerId> = prior.iter().map(|i| &i.id).collect();
    let mut kept: HashSet<&InterviewerId> = HashSet::with_capacity(known.len());
    let mut plan = Plan::default();

    for draft in desired.iter() {
        match &draft.id {
            None => plan.to_create.push(draft.fields()),
            Some(id) => {
                if !known.contains(id) {
                    return Err(ReconcileError::UnknownIdentity(id.clone()));
                }
                if !kept.insert(id) {
                    return Err(ReconcileError::DuplicateIdentity(id.clone()));
                }
                plan.to_update.push(PlannedUpdate {
                    id: id.clone(),
                    fields: draft.fields(),
                });
            }
        }
    }

    plan.to_delete = prior
        .iter()
        .filter(|i| !kept.contains(&i.id))
        .map(|i| i.id.clone())
        .collect();

    Ok(plan)
}
