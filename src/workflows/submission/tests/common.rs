use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};

use crate::workflows::submission::directory::{
    SpecialtyStrength, StaticDirectory, UnderwriterId, UnderwriterRecord,
};
use crate::workflows::submission::domain::{
    ApplicantSnapshot, ClassificationSnapshot, MappedFormOutput, OperationsSnapshot,
    PremisesSnapshot, Region, RiskProfile, SocialContextNotes,
};
use crate::workflows::submission::repository::InMemorySubmissionStore;
use crate::workflows::submission::routing::{RoutingConfig, RoutingEngine};
use crate::workflows::submission::service::SubmissionService;

pub(super) fn dt(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .expect("valid date")
        .and_hms_opt(hour, minute, 0)
        .expect("valid time")
}

/// Monday, March 3rd 2025 at 10:00.
pub(super) fn monday_morning() -> NaiveDateTime {
    dt(2025, 3, 3, 10, 0)
}

pub(super) fn mapped_output() -> MappedFormOutput {
    MappedFormOutput {
        applicant: Some(ApplicantSnapshot {
            legal_name: Some("Teddy's Tavern LLC".to_string()),
            dba: Some("Teddy's Tavern".to_string()),
        }),
        classification: Some(ClassificationSnapshot {
            industry_code: Some("722410".to_string()),
            description: Some("Neighborhood bar with live piano".to_string()),
        }),
        premises: Some(PremisesSnapshot {
            city: Some("Savannah".to_string()),
            state: Some("GA".to_string()),
        }),
        operations: Some(OperationsSnapshot {
            hazards: vec!["cooking equipment".to_string()],
            alcohol_sales_pct: Some(60.0),
            liquor_liability_required: true,
            live_entertainment: true,
        }),
        revenue: None,
        open_task_count: 2,
        social_context: SocialContextNotes {
            availability_notes: Some("Unavailable until Tuesday 1:00 PM".to_string()),
            ..SocialContextNotes::default()
        },
    }
}

pub(super) fn bar_profile() -> RiskProfile {
    RiskProfile {
        industry_code: Some("722410".to_string()),
        region: Some(Region::Southeast),
        hazards: ["alcohol_service".to_string()].into_iter().collect(),
        requires_liquor_liability: true,
        business_type_tags: ["bar".to_string()].into_iter().collect(),
    }
}

pub(super) struct UnderwriterSpec {
    pub id: &'static str,
    pub region: Region,
    pub primary: &'static [&'static str],
    pub secondary: &'static [&'static str],
    pub appetite: &'static [&'static str],
    pub aversions: &'static [&'static str],
    pub turnaround: f64,
    pub acceptance: f64,
    pub open: u32,
}

impl Default for UnderwriterSpec {
    fn default() -> Self {
        Self {
            id: "uw-test",
            region: Region::Southeast,
            primary: &[],
            secondary: &[],
            appetite: &[],
            aversions: &[],
            turnaround: 3.0,
            acceptance: 0.8,
            open: 7,
        }
    }
}

pub(super) fn underwriter(spec: UnderwriterSpec) -> UnderwriterRecord {
    let mut specialties = BTreeMap::new();
    for code in spec.primary {
        specialties.insert((*code).to_string(), SpecialtyStrength::Primary);
    }
    for code in spec.secondary {
        specialties.insert((*code).to_string(), SpecialtyStrength::Secondary);
    }

    UnderwriterRecord {
        id: UnderwriterId(spec.id.to_string()),
        name: format!("Underwriter {}", spec.id),
        email: format!("{}@example.com", spec.id),
        phone: "(555) 555-0100".to_string(),
        region: spec.region,
        specialties,
        appetite: spec.appetite.iter().map(|tag| tag.to_string()).collect(),
        aversions: spec
            .aversions
            .iter()
            .map(|tag| tag.to_string())
            .collect::<BTreeSet<_>>(),
        avg_turnaround_days: spec.turnaround,
        acceptance_rate: spec.acceptance,
        open_submissions: spec.open,
        notes: None,
    }
}

pub(super) fn bar_specialist() -> UnderwriterRecord {
    underwriter(UnderwriterSpec {
        id: "uw-hospitality",
        primary: &["722410", "722511"],
        appetite: &["bar", "restaurant"],
        aversions: &["manufacturing"],
        turnaround: 2.0,
        acceptance: 0.87,
        open: 2,
        ..UnderwriterSpec::default()
    })
}

pub(super) fn construction_conservative() -> UnderwriterRecord {
    underwriter(UnderwriterSpec {
        id: "uw-construction",
        region: Region::Northeast,
        primary: &["236220"],
        appetite: &["construction", "contractor"],
        aversions: &["bar", "restaurant"],
        turnaround: 5.0,
        acceptance: 0.68,
        open: 2,
        ..UnderwriterSpec::default()
    })
}

pub(super) fn engine() -> RoutingEngine {
    RoutingEngine::new(RoutingConfig::default())
}

pub(super) type TestService = SubmissionService<InMemorySubmissionStore, StaticDirectory>;

pub(super) fn build_service() -> (TestService, Arc<InMemorySubmissionStore>) {
    let repository = Arc::new(InMemorySubmissionStore::default());
    let service = SubmissionService::new(
        repository.clone(),
        Arc::new(StaticDirectory::standard_panel()),
        RoutingConfig::default(),
    );
    (service, repository)
}
