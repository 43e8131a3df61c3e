//! Submission lifecycle: a strictly linear state machine with an append-only
//! history. Every transition is driven by an explicit event from the
//! orchestrator; the core never auto-advances.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::routing::{RoutingOutcome, ScoredCandidate};
use super::scheduling::ContactWindow;

/// Identifier wrapper for submissions.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SubmissionId(pub String);

impl SubmissionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Pipeline states, in lifecycle order. No skipping, no cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionState {
    Received,
    Extracted,
    Mapped,
    Routed,
    ReadyToSend,
    Scheduled,
    Sent,
    Acknowledged,
}

impl SubmissionState {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Extracted => "extracted",
            Self::Mapped => "mapped",
            Self::Routed => "routed",
            Self::ReadyToSend => "ready_to_send",
            Self::Scheduled => "scheduled",
            Self::Sent => "sent",
            Self::Acknowledged => "acknowledged",
        }
    }

    /// The unique state a submission must be in before entering `self`.
    pub const fn predecessor(self) -> Option<Self> {
        match self {
            Self::Received => None,
            Self::Extracted => Some(Self::Received),
            Self::Mapped => Some(Self::Extracted),
            Self::Routed => Some(Self::Mapped),
            Self::ReadyToSend => Some(Self::Routed),
            Self::Scheduled => Some(Self::ReadyToSend),
            Self::Sent => Some(Self::Scheduled),
            Self::Acknowledged => Some(Self::Sent),
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Acknowledged)
    }
}

/// Driving events, one per transition. Events that carry data stamp it onto
/// the submission atomically with the state change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SubmissionEvent {
    ExtractionCompleted,
    MappingCompleted,
    RecommendationReady { outcome: RoutingOutcome },
    BrokerApproved,
    ContactResolved { window: ContactWindow },
    DispatchConfirmed,
    Acknowledged,
}

impl SubmissionEvent {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::ExtractionCompleted => "extraction_completed",
            Self::MappingCompleted => "mapping_completed",
            Self::RecommendationReady { .. } => "recommendation_ready",
            Self::BrokerApproved => "broker_approved",
            Self::ContactResolved { .. } => "contact_resolved",
            Self::DispatchConfirmed => "dispatch_confirmed",
            Self::Acknowledged => "acknowledged",
        }
    }

    /// The state this event advances a submission into.
    pub const fn target_state(&self) -> SubmissionState {
        match self {
            Self::ExtractionCompleted => SubmissionState::Extracted,
            Self::MappingCompleted => SubmissionState::Mapped,
            Self::RecommendationReady { .. } => SubmissionState::Routed,
            Self::BrokerApproved => SubmissionState::ReadyToSend,
            Self::ContactResolved { .. } => SubmissionState::Scheduled,
            Self::DispatchConfirmed => SubmissionState::Sent,
            Self::Acknowledged => SubmissionState::Acknowledged,
        }
    }
}

/// Attempted state change whose current state is not the unique valid
/// predecessor. Recoverable; the submission is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[error(
    "invalid transition: submission in state '{}' cannot move to '{}'",
    .from.label(),
    .attempted.label()
)]
pub struct InvalidTransition {
    pub from: SubmissionState,
    pub attempted: SubmissionState,
}

/// One history entry; written once, never rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateRecord {
    pub state: SubmissionState,
    pub entered_at: NaiveDateTime,
}

/// A single submission's lifecycle state, exclusively owned by its store.
///
/// History always holds one record per transition taken plus the initial
/// `Received` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    id: SubmissionId,
    business_name: String,
    state: SubmissionState,
    history: Vec<StateRecord>,
    routing: Option<RoutingOutcome>,
    contact_window: Option<ContactWindow>,
    scheduled_contact: Option<NaiveDateTime>,
    pending_tasks: u32,
}

impl Submission {
    pub fn new(
        id: SubmissionId,
        business_name: String,
        pending_tasks: u32,
        received_at: NaiveDateTime,
    ) -> Self {
        Self {
            id,
            business_name,
            state: SubmissionState::Received,
            history: vec![StateRecord {
                state: SubmissionState::Received,
                entered_at: received_at,
            }],
            routing: None,
            contact_window: None,
            scheduled_contact: None,
            pending_tasks,
        }
    }

    /// Apply a driving event, appending exactly one history record on success.
    ///
    /// Fails with [`InvalidTransition`] when the current state is not the
    /// event target's unique predecessor; state and history are unchanged on
    /// failure.
    pub fn transition(
        &mut self,
        event: SubmissionEvent,
        at: NaiveDateTime,
    ) -> Result<SubmissionState, InvalidTransition> {
        let attempted = event.target_state();
        if attempted.predecessor() != Some(self.state) {
            return Err(InvalidTransition {
                from: self.state,
                attempted,
            });
        }

        match event {
            SubmissionEvent::RecommendationReady { outcome } => {
                self.routing = Some(outcome);
            }
            SubmissionEvent::ContactResolved { window } => {
                self.scheduled_contact = Some(window.earliest_contact);
                self.contact_window = Some(window);
            }
            _ => {}
        }

        self.state = attempted;
        self.history.push(StateRecord {
            state: attempted,
            entered_at: at,
        });

        Ok(attempted)
    }

    pub fn id(&self) -> &SubmissionId {
        &self.id
    }

    pub fn business_name(&self) -> &str {
        &self.business_name
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    pub fn history(&self) -> &[StateRecord] {
        &self.history
    }

    pub fn routing(&self) -> Option<&RoutingOutcome> {
        self.routing.as_ref()
    }

    pub fn recommended(&self) -> Option<&ScoredCandidate> {
        self.routing.as_ref().and_then(RoutingOutcome::recommended)
    }

    pub fn contact_window(&self) -> Option<&ContactWindow> {
        self.contact_window.as_ref()
    }

    pub fn scheduled_contact(&self) -> Option<NaiveDateTime> {
        self.scheduled_contact
    }

    pub fn pending_tasks(&self) -> u32 {
        self.pending_tasks
    }
}
