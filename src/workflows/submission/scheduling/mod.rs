//! White-glove contact scheduling: resolves free-form availability notes into
//! the earliest instant a client may be contacted.
//!
//! Resolution is an ordered list of pattern rules; the first rule that
//! recognizes a cue wins, and unrecognized notes fall through to "as soon as
//! possible" rather than failing.

mod rules;

pub use rules::{standard_rules, ScheduleRule};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::domain::SocialContextNotes;

/// Resolved contact constraint with an auditable trace of what fired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactWindow {
    pub earliest_contact: NaiveDateTime,
    /// Names the rule that fired and the literal matched cue.
    pub reason: String,
}

/// Stateless resolver over an ordered rule list.
///
/// Deterministic given `now` and the notes; the resolver never reads a clock
/// itself.
pub struct TemporalResolver {
    rules: Vec<ScheduleRule>,
}

impl Default for TemporalResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl TemporalResolver {
    pub fn new() -> Self {
        Self::with_rules(standard_rules())
    }

    /// Build a resolver with a custom rule list, highest priority first.
    pub fn with_rules(rules: Vec<ScheduleRule>) -> Self {
        Self { rules }
    }

    pub fn resolve(&self, now: NaiveDateTime, notes: &SocialContextNotes) -> ContactWindow {
        let text = rules::normalize_notes(&notes.combined_text());

        for rule in &self.rules {
            if let Some(window) = (rule.apply)(now, &text) {
                return window;
            }
        }

        ContactWindow {
            earliest_contact: now,
            reason: "no recognized constraints; contact as soon as possible".to_string(),
        }
    }
}
