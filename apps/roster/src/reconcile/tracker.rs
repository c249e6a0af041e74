//! Per-job save state: `Idle → Saving → {Succeeded, Failed}`.
//!
//! At most one save per job is in flight. A second save while one is running
//! is rejected rather than queued.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::models::job::JobId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveState {
    Idle,
    Saving,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("a save for job {0} is already in progress")]
pub struct SaveInProgress(pub JobId);

/// Holds the last state of every job saved since startup: one entry per job,
/// overwritten by each attempt, so the map is bounded by the number of jobs.
/// Entries are kept after a terminal state so `save-status` can report it.
#[derive(Debug, Default, Clone)]
pub struct SaveTracker {
    states: Arc<Mutex<HashMap<JobId, SaveState>>>,
}

impl SaveTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, job_id: &JobId) -> SaveState {
        self.lock()
            .get(job_id)
            .copied()
            .unwrap_or(SaveState::Idle)
    }

    /// Enters `Saving`. The returned guard records the outcome.
    pub fn begin(&self, job_id: &JobId) -> Result<SaveGuard, SaveInProgress> {
        let mut states = self.lock();
        if states.get(job_id) == Some(&SaveState::Saving) {
            return Err(SaveInProgress(job_id.clone()));
        }
        states.insert(job_id.clone(), SaveState::Saving);
        debug!("Save started for job {job_id}");
        Ok(SaveGuard {
            tracker: self.clone(),
            job_id: job_id.clone(),
            finished: false,
        })
    }

    fn finish(&self, job_id: &JobId, state: SaveState) {
        self.lock().insert(job_id.clone(), state);
        debug!("Save for job {job_id} finished: {state:?}");
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<JobId, SaveState>> {
        // A poisoned map still holds valid states.
        self.states.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Marks one save attempt. Dropping it unfinished records `Failed`.
pub struct SaveGuard {
    tracker: SaveTracker,
    job_id: JobId,
    finished: bool,
}

impl SaveGuard {
    pub fn succeed(mut self) {
        self.finished = true;
        self.tracker.finish(&self.job_id, SaveState::Succeeded);
    }

    pub fn fail(mut self) {
        self.finished = true;
        self.tracker.finish(&self.job_id, SaveState::Failed);
    }
}

impl Drop for SaveGuard {
    fn drop(&mut self) {
        if !self.finished {
            self.tracker.finish(&self.job_id, SaveState::Failed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_job_is_idle() {
        let tracker = SaveTracker::new();
        assert_eq!(tracker.state(&JobId::from("j")), SaveState::Idle);
    }

    #[test]
    fn test_second_begin_rejected_while_saving() {
        let tracker = SaveTracker::new();
        let job = JobId::from("j");
        let guard = tracker.begin(&job).unwrap();
        assert_eq!(tracker.state(&job), SaveState::Saving);
        assert_eq!(tracker.begin(&job).err(), Some(SaveInProgress(job.clone())));
        guard.succeed();
        assert_eq!(tracker.state(&job), SaveState::Succeeded);
    }

    #[test]
    fn test_other_jobs_not_blocked() {
        let tracker = SaveTracker::new();
        let _a = tracker.begin(&JobId::from("a")).unwrap();
        assert!(tracker.begin(&JobId::from("b")).is_ok());
    }

    #[test]
    fn test_retry_after_failure() {
        let tracker = SaveTracker::new();
        let job = JobId::from("j");
        tracker.begin(&job).unwrap().fail();
        assert_eq!(tracker.state(&job), SaveState::Failed);
        let retry = tracker.begin(&job).unwrap();
        assert_eq!(tracker.state(&job), SaveState::Saving);
        retry.succeed();
        assert_eq!(tracker.state(&job), SaveState::Succeeded);
    }

    #[test]
    fn test_abandoned_guard_records_failure() {
        let tracker = SaveTracker::new();
        let job = JobId::from("j");
        drop(tracker.begin(&job).unwrap());
        assert_eq!(tracker.state(&job), SaveState::Failed);
    }

    #[test]
    fn test_one_entry_per_job_across_attempts() {
        let tracker = SaveTracker::new();
        let job = JobId::from("j");
        for _ in 0..3 {
            tracker.begin(&job).unwrap().fail();
        }
        tracker.begin(&job).unwrap().succeed();
        tracker.begin(&JobId::from("k")).unwrap().succeed();
        assert_eq!(tracker.lock().len(), 2);
        assert_eq!(tracker.state(&job), SaveState::Succeeded);
    }
}
