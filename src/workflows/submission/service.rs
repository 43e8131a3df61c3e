use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::info;

use super::directory::UnderwriterDirectory;
use super::domain::MappedFormOutput;
use super::lifecycle::{Submission, SubmissionEvent, SubmissionId};
use super::profile::build_risk_profile;
use super::repository::{
    ApplyError, RepositoryError, SubmissionRecord, SubmissionRepository,
};
use super::routing::{RoutingConfig, RoutingEngine, RoutingOutcome};
use super::scheduling::TemporalResolver;

pub const DEFAULT_TOP_N: usize = 3;

/// Service composing the directory, routing engine, temporal resolver, and
/// submission store behind the operations the orchestrator calls.
pub struct SubmissionService<R, D> {
    repository: Arc<R>,
    directory: Arc<D>,
    engine: RoutingEngine,
    resolver: TemporalResolver,
}

static SUBMISSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_submission_id() -> SubmissionId {
    let id = SUBMISSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SubmissionId(format!("sub-{id:06}"))
}

impl<R, D> SubmissionService<R, D>
where
    R: SubmissionRepository + 'static,
    D: UnderwriterDirectory + 'static,
{
    pub fn new(repository: Arc<R>, directory: Arc<D>, config: RoutingConfig) -> Self {
        Self::with_resolver(repository, directory, config, TemporalResolver::new())
    }

    pub fn with_resolver(
        repository: Arc<R>,
        directory: Arc<D>,
        config: RoutingConfig,
        resolver: TemporalResolver,
    ) -> Self {
        Self {
            repository,
            directory,
            engine: RoutingEngine::new(config),
            resolver,
        }
    }

    /// Register mapped form output as a new submission.
    ///
    /// Extraction and mapping happened upstream, so the fresh submission is
    /// advanced through those states immediately with the supplied timestamp.
    pub fn intake(
        &self,
        mapped: MappedFormOutput,
        received_at: NaiveDateTime,
    ) -> Result<SubmissionRecord, SubmissionServiceError> {
        let id = next_submission_id();
        let submission = Submission::new(
            id.clone(),
            mapped.business_name().to_string(),
            mapped.open_task_count,
            received_at,
        );

        self.repository.insert(SubmissionRecord {
            submission,
            intake: mapped,
        })?;
        self.repository
            .apply(&id, SubmissionEvent::ExtractionCompleted, received_at)?;
        let record = self
            .repository
            .apply(&id, SubmissionEvent::MappingCompleted, received_at)?;

        info!(
            submission_id = id.as_str(),
            business = record.submission.business_name(),
            "submission registered"
        );
        Ok(record)
    }

    /// Derive the risk profile, rank the directory, and record the outcome.
    pub fn route(
        &self,
        id: &SubmissionId,
        top_n: usize,
        at: NaiveDateTime,
    ) -> Result<SubmissionRecord, SubmissionServiceError> {
        let record = self.fetch(id)?;
        let profile = build_risk_profile(&record.intake);
        let underwriters = self.directory.list_underwriters();
        let ranked = self.engine.rank(&profile, &underwriters, top_n);

        if let Some(best) = ranked.first() {
            info!(
                submission_id = id.as_str(),
                underwriter = %best.underwriter.name,
                score = best.score,
                "routing recommendation ready"
            );
        } else {
            info!(submission_id = id.as_str(), "no candidates in directory");
        }

        let outcome = RoutingOutcome { profile, ranked };
        let record = self
            .repository
            .apply(id, SubmissionEvent::RecommendationReady { outcome }, at)?;
        Ok(record)
    }

    /// Record broker approval of the routed recommendation.
    pub fn approve(
        &self,
        id: &SubmissionId,
        at: NaiveDateTime,
    ) -> Result<SubmissionRecord, SubmissionServiceError> {
        Ok(self
            .repository
            .apply(id, SubmissionEvent::BrokerApproved, at)?)
    }

    /// Resolve the contact window from the client's notes and schedule.
    pub fn schedule(
        &self,
        id: &SubmissionId,
        now: NaiveDateTime,
    ) -> Result<SubmissionRecord, SubmissionServiceError> {
        let record = self.fetch(id)?;
        let window = self
            .resolver
            .resolve(now, &record.intake.social_context);

        info!(
            submission_id = id.as_str(),
            earliest_contact = %window.earliest_contact,
            reason = %window.reason,
            "contact window resolved"
        );

        let record = self
            .repository
            .apply(id, SubmissionEvent::ContactResolved { window }, now)?;
        Ok(record)
    }

    /// Record dispatch confirmation from the delivery layer.
    pub fn dispatch(
        &self,
        id: &SubmissionId,
        at: NaiveDateTime,
    ) -> Result<SubmissionRecord, SubmissionServiceError> {
        Ok(self
            .repository
            .apply(id, SubmissionEvent::DispatchConfirmed, at)?)
    }

    /// Record the underwriter's acknowledgment; the terminal transition.
    pub fn acknowledge(
        &self,
        id: &SubmissionId,
        at: NaiveDateTime,
    ) -> Result<SubmissionRecord, SubmissionServiceError> {
        Ok(self.repository.apply(id, SubmissionEvent::Acknowledged, at)?)
    }

    pub fn get(&self, id: &SubmissionId) -> Result<SubmissionRecord, SubmissionServiceError> {
        self.fetch(id)
    }

    /// Scheduled submissions whose contact instant has arrived.
    pub fn due(&self, now: NaiveDateTime) -> Result<Vec<SubmissionRecord>, SubmissionServiceError> {
        Ok(self.repository.due(now)?)
    }

    fn fetch(&self, id: &SubmissionId) -> Result<SubmissionRecord, SubmissionServiceError> {
        Ok(self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?)
    }
}

/// Error raised by the submission service.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionServiceError {
    #[error(transparent)]
    Transition(#[from] super::lifecycle::InvalidTransition),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<ApplyError> for SubmissionServiceError {
    fn from(value: ApplyError) -> Self {
        match value {
            ApplyError::Transition(err) => Self::Transition(err),
            ApplyError::Repository(err) => Self::Repository(err),
        }
    }
}
