use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Geographic regions used for premises classification and underwriter coverage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Region {
    Southeast,
    Northeast,
    Midwest,
    Southwest,
    #[serde(rename = "PNW")]
    Pnw,
    West,
}

impl Region {
    pub const fn label(self) -> &'static str {
        match self {
            Region::Southeast => "Southeast",
            Region::Northeast => "Northeast",
            Region::Midwest => "Midwest",
            Region::Southwest => "Southwest",
            Region::Pnw => "PNW",
            Region::West => "West",
        }
    }
}

/// Mapped application-form output consumed from the upstream form mapper.
///
/// Every section is optional: the mapper never fabricates values for facts the
/// call did not surface, so absence is the normal case, not an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MappedFormOutput {
    #[serde(default)]
    pub applicant: Option<ApplicantSnapshot>,
    #[serde(default)]
    pub classification: Option<ClassificationSnapshot>,
    #[serde(default)]
    pub premises: Option<PremisesSnapshot>,
    #[serde(default)]
    pub operations: Option<OperationsSnapshot>,
    #[serde(default)]
    pub revenue: Option<RevenueSnapshot>,
    /// Outstanding follow-up items raised by the mapper for missing fields.
    #[serde(default)]
    pub open_task_count: u32,
    #[serde(default)]
    pub social_context: SocialContextNotes,
}

impl MappedFormOutput {
    /// Display name for the submitting business, preferring the trade name.
    pub fn business_name(&self) -> &str {
        self.applicant
            .as_ref()
            .and_then(|applicant| {
                applicant
                    .dba
                    .as_deref()
                    .or(applicant.legal_name.as_deref())
            })
            .unwrap_or("Unknown Business")
    }
}

/// Identity of the applicant business.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantSnapshot {
    #[serde(default)]
    pub legal_name: Option<String>,
    #[serde(default)]
    pub dba: Option<String>,
}

/// Industry classification captured on the application form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationSnapshot {
    #[serde(default)]
    pub industry_code: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Primary premises location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PremisesSnapshot {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

/// Operational exposures relevant to risk profiling.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationsSnapshot {
    #[serde(default)]
    pub hazards: Vec<String>,
    #[serde(default)]
    pub alcohol_sales_pct: Option<f64>,
    #[serde(default)]
    pub liquor_liability_required: bool,
    #[serde(default)]
    pub live_entertainment: bool,
}

/// Revenue figures for sizing the account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RevenueSnapshot {
    #[serde(default)]
    pub annual_gross_sales: Option<f64>,
}

/// Non-business constraints isolated from the call for white-glove scheduling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialContextNotes {
    #[serde(default)]
    pub availability_notes: Option<String>,
    #[serde(default)]
    pub preferred_contact_time: Option<String>,
    #[serde(default)]
    pub personal_constraints: Option<String>,
    #[serde(default)]
    pub contact_restrictions: Option<String>,
}

impl SocialContextNotes {
    /// All note fields joined for cue matching. Order is fixed so resolution
    /// stays deterministic for a given note set.
    pub fn combined_text(&self) -> String {
        [
            self.availability_notes.as_deref(),
            self.contact_restrictions.as_deref(),
            self.personal_constraints.as_deref(),
            self.preferred_contact_time.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ")
    }

    pub fn is_empty(&self) -> bool {
        self.availability_notes.is_none()
            && self.preferred_contact_time.is_none()
            && self.personal_constraints.is_none()
            && self.contact_restrictions.is_none()
    }
}

/// Normalized subset of submission facts relevant to underwriter matching.
///
/// Derived once per submission and never patched; if the mapped output
/// changes, derive a fresh profile instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskProfile {
    pub industry_code: Option<String>,
    pub region: Option<Region>,
    pub hazards: BTreeSet<String>,
    pub requires_liquor_liability: bool,
    pub business_type_tags: BTreeSet<String>,
}
