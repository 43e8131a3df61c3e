//! Routing and scheduling workflow for commercial insurance submissions:
//! risk profiling, underwriter ranking, lifecycle tracking, and white-glove
//! contact scheduling, composed behind a service facade and HTTP router.

pub mod directory;
pub mod domain;
pub mod lifecycle;
pub mod profile;
pub mod repository;
pub mod router;
pub mod routing;
pub mod scheduling;
pub mod service;

#[cfg(test)]
mod tests;

pub use directory::{
    DirectoryImportError, SpecialtyStrength, StaticDirectory, UnderwriterDirectory, UnderwriterId,
    UnderwriterRecord,
};
pub use domain::{
    ApplicantSnapshot, ClassificationSnapshot, MappedFormOutput, OperationsSnapshot,
    PremisesSnapshot, Region, RevenueSnapshot, RiskProfile, SocialContextNotes,
};
pub use lifecycle::{
    InvalidTransition, StateRecord, Submission, SubmissionEvent, SubmissionId, SubmissionState,
};
pub use profile::build_risk_profile;
pub use repository::{
    ApplyError, InMemorySubmissionStore, RepositoryError, SubmissionRecord, SubmissionRepository,
    SubmissionStatusView,
};
pub use router::submission_router;
pub use routing::{
    RoutingConfig, RoutingEngine, RoutingOutcome, ScoreComponent, ScoredCandidate,
    ScoringCriterion,
};
pub use scheduling::{ContactWindow, ScheduleRule, TemporalResolver};
pub use service::{SubmissionService, SubmissionServiceError, DEFAULT_TOP_N};
