use std::collections::HashMap;
use std::sync::Mutex;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::domain::MappedFormOutput;
use super::lifecycle::{
    InvalidTransition, Submission, SubmissionEvent, SubmissionId, SubmissionState,
};

/// Stored unit: the lifecycle state plus the mapped intake it was built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub submission: Submission,
    pub intake: MappedFormOutput,
}

impl SubmissionRecord {
    pub fn status_view(&self) -> SubmissionStatusView {
        SubmissionStatusView {
            submission_id: self.submission.id().clone(),
            business_name: self.submission.business_name().to_string(),
            state: self.submission.state().label(),
            recommended_underwriter: self
                .submission
                .recommended()
                .map(|candidate| candidate.underwriter.name.clone()),
            scheduled_contact: self.submission.scheduled_contact(),
            contact_reason: self
                .submission
                .contact_window()
                .map(|window| window.reason.clone()),
            pending_tasks: self.submission.pending_tasks(),
            transitions: self.submission.history().len().saturating_sub(1),
        }
    }
}

/// Sanitized representation of a submission's exposed status.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionStatusView {
    pub submission_id: SubmissionId,
    pub business_name: String,
    pub state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommended_underwriter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_contact: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_reason: Option<String>,
    pub pending_tasks: u32,
    pub transitions: usize,
}

/// Error enumeration for storage failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("submission already exists")]
    Conflict,
    #[error("submission not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Failure applying an event to a stored submission.
#[derive(Debug, thiserror::Error)]
pub enum ApplyError {
    #[error(transparent)]
    Transition(#[from] InvalidTransition),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Storage abstraction so the service can be exercised in isolation and a
/// durable store can be substituted later.
///
/// `apply` performs the transition and its history append atomically while
/// holding the record: concurrent attempts on one submission serialize, and a
/// loser that observed the pre-transition state fails with
/// [`InvalidTransition`] instead of racing onto an inconsistent history.
pub trait SubmissionRepository: Send + Sync {
    fn insert(&self, record: SubmissionRecord) -> Result<SubmissionRecord, RepositoryError>;
    fn fetch(&self, id: &SubmissionId) -> Result<Option<SubmissionRecord>, RepositoryError>;
    fn apply(
        &self,
        id: &SubmissionId,
        event: SubmissionEvent,
        at: NaiveDateTime,
    ) -> Result<SubmissionRecord, ApplyError>;
    /// Scheduled submissions whose contact instant has arrived, soonest first.
    fn due(&self, now: NaiveDateTime) -> Result<Vec<SubmissionRecord>, RepositoryError>;
}

/// Mutex-guarded map store; the default backing for the service and tests.
#[derive(Debug, Default)]
pub struct InMemorySubmissionStore {
    records: Mutex<HashMap<SubmissionId, SubmissionRecord>>,
}

impl SubmissionRepository for InMemorySubmissionStore {
    fn insert(&self, record: SubmissionRecord) -> Result<SubmissionRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("submission store poisoned");
        if guard.contains_key(record.submission.id()) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.submission.id().clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &SubmissionId) -> Result<Option<SubmissionRecord>, RepositoryError> {
        let guard = self.records.lock().expect("submission store poisoned");
        Ok(guard.get(id).cloned())
    }

    fn apply(
        &self,
        id: &SubmissionId,
        event: SubmissionEvent,
        at: NaiveDateTime,
    ) -> Result<SubmissionRecord, ApplyError> {
        let mut guard = self.records.lock().expect("submission store poisoned");
        let record = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        record.submission.transition(event, at)?;
        Ok(record.clone())
    }

    fn due(&self, now: NaiveDateTime) -> Result<Vec<SubmissionRecord>, RepositoryError> {
        let guard = self.records.lock().expect("submission store poisoned");
        let mut due: Vec<SubmissionRecord> = guard
            .values()
            .filter(|record| {
                record.submission.state() == SubmissionState::Scheduled
                    && record
                        .submission
                        .scheduled_contact()
                        .is_some_and(|instant| instant <= now)
            })
            .cloned()
            .collect();

        due.sort_by(|a, b| {
            a.submission
                .scheduled_contact()
                .cmp(&b.submission.scheduled_contact())
                .then_with(|| a.submission.id().cmp(b.submission.id()))
        });

        Ok(due)
    }
}
