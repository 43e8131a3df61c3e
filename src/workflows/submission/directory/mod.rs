//! Read-only underwriter directory: the records the routing engine scores and
//! the query contract it depends on. Storage mechanics live behind the
//! [`UnderwriterDirectory`] trait so a real store can replace the bundled
//! panel without touching scoring logic.

mod import;

pub use import::{load_panel_csv, read_panel_csv, DirectoryImportError};

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::domain::Region;

/// Identifier wrapper for underwriters; the final ranking tie-break key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnderwriterId(pub String);

impl UnderwriterId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// How strongly an underwriter specializes in an industry code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialtyStrength {
    Primary,
    Secondary,
}

/// A single underwriter as served by the directory.
///
/// Immutable within a routing decision; `open_submissions` is the workload
/// snapshot supplied by the caller per scoring run, never a live counter the
/// engine mutates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnderwriterRecord {
    pub id: UnderwriterId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub region: Region,
    /// Industry codes the underwriter specializes in, keyed by strength tier.
    pub specialties: BTreeMap<String, SpecialtyStrength>,
    /// Business-type tags the underwriter likes, lowercase.
    pub appetite: BTreeSet<String>,
    /// Business-type tags the underwriter avoids, lowercase.
    pub aversions: BTreeSet<String>,
    pub avg_turnaround_days: f64,
    pub acceptance_rate: f64,
    pub open_submissions: u32,
    #[serde(default)]
    pub notes: Option<String>,
}

impl UnderwriterRecord {
    pub fn specialty_strength(&self, industry_code: &str) -> Option<SpecialtyStrength> {
        self.specialties.get(industry_code).copied()
    }
}

/// Query contract the routing engine depends on.
pub trait UnderwriterDirectory: Send + Sync {
    fn list_underwriters(&self) -> Vec<UnderwriterRecord>;
}

/// In-memory directory backed by a fixed record set.
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    records: Vec<UnderwriterRecord>,
}

impl StaticDirectory {
    pub fn new(records: Vec<UnderwriterRecord>) -> Self {
        Self { records }
    }

    /// The bundled standard panel.
    pub fn standard_panel() -> Self {
        Self::new(standard_panel_records())
    }

    pub fn records(&self) -> &[UnderwriterRecord] {
        &self.records
    }

    pub fn by_region(&self, region: Region) -> Vec<&UnderwriterRecord> {
        self.records
            .iter()
            .filter(|record| record.region == region)
            .collect()
    }

    pub fn by_specialty(&self, industry_code: &str) -> Vec<&UnderwriterRecord> {
        self.records
            .iter()
            .filter(|record| record.specialties.contains_key(industry_code))
            .collect()
    }
}

impl UnderwriterDirectory for StaticDirectory {
    fn list_underwriters(&self) -> Vec<UnderwriterRecord> {
        self.records.clone()
    }
}

struct PanelSeed {
    id: &'static str,
    name: &'static str,
    email: &'static str,
    phone: &'static str,
    region: Region,
    appetite: &'static [&'static str],
    aversions: &'static [&'static str],
    primary_specialties: &'static [&'static str],
    secondary_specialties: &'static [&'static str],
    avg_turnaround_days: f64,
    acceptance_rate: f64,
    open_submissions: u32,
    notes: &'static str,
}

impl PanelSeed {
    fn into_record(self) -> UnderwriterRecord {
        let mut specialties = BTreeMap::new();
        for code in self.primary_specialties {
            specialties.insert((*code).to_string(), SpecialtyStrength::Primary);
        }
        for code in self.secondary_specialties {
            specialties.insert((*code).to_string(), SpecialtyStrength::Secondary);
        }

        UnderwriterRecord {
            id: UnderwriterId(self.id.to_string()),
            name: self.name.to_string(),
            email: self.email.to_string(),
            phone: self.phone.to_string(),
            region: self.region,
            specialties,
            appetite: self.appetite.iter().map(|tag| tag.to_string()).collect(),
            aversions: self.aversions.iter().map(|tag| tag.to_string()).collect(),
            avg_turnaround_days: self.avg_turnaround_days,
            acceptance_rate: self.acceptance_rate,
            open_submissions: self.open_submissions,
            notes: Some(self.notes.to_string()),
        }
    }
}

fn standard_panel_records() -> Vec<UnderwriterRecord> {
    let seeds = [
        PanelSeed {
            id: "uw-mitchell",
            name: "Sarah Mitchell",
            email: "sarah.mitchell@insureco.com",
            phone: "(404) 555-1234",
            region: Region::Southeast,
            appetite: &["bar", "restaurant", "nightclub", "tavern"],
            aversions: &["manufacturing", "mining"],
            primary_specialties: &["722410", "722511", "722513"],
            secondary_specialties: &[],
            avg_turnaround_days: 2.5,
            acceptance_rate: 0.82,
            open_submissions: 7,
            notes: "15 years in the hospitality sector. Prefers detailed loss runs.",
        },
        PanelSeed {
            id: "uw-chen",
            name: "Michael Chen",
            email: "m.chen@pacificuw.com",
            phone: "(206) 555-5678",
            region: Region::Pnw,
            appetite: &["technology", "software", "professional services"],
            aversions: &["bar", "nightclub", "cannabis"],
            primary_specialties: &["541511", "541512"],
            secondary_specialties: &["541519"],
            avg_turnaround_days: 1.5,
            acceptance_rate: 0.88,
            open_submissions: 3,
            notes: "Fast turnaround for tech accounts. Requires cyber liability details.",
        },
        PanelSeed {
            id: "uw-rodriguez",
            name: "Jennifer Rodriguez",
            email: "jrodriguez@sunbeltins.com",
            phone: "(305) 555-9012",
            region: Region::Southeast,
            appetite: &["restaurant", "hotel", "retail"],
            aversions: &["construction", "roofing"],
            primary_specialties: &["722511", "721110"],
            secondary_specialties: &["445110"],
            avg_turnaround_days: 3.0,
            acceptance_rate: 0.79,
            open_submissions: 13,
            notes: "Bilingual (English/Spanish). Strong Florida market relationships.",
        },
        PanelSeed {
            id: "uw-thompson",
            name: "David Thompson",
            email: "david.t@midwestmutual.com",
            phone: "(312) 555-3456",
            region: Region::Midwest,
            appetite: &["manufacturing", "warehousing", "distribution"],
            aversions: &["bar", "adult entertainment"],
            primary_specialties: &["332999", "493110", "484110"],
            secondary_specialties: &[],
            avg_turnaround_days: 4.0,
            acceptance_rate: 0.71,
            open_submissions: 8,
            notes: "Extensive product liability experience. Prefers face-to-face meetings.",
        },
        PanelSeed {
            id: "uw-foster",
            name: "Amanda Foster",
            email: "afoster@eastcoastuw.com",
            phone: "(212) 555-7890",
            region: Region::Northeast,
            appetite: &["retail", "professional services", "medical offices"],
            aversions: &["heavy construction", "hazardous materials"],
            primary_specialties: &["448140", "541110", "621111"],
            secondary_specialties: &[],
            avg_turnaround_days: 2.0,
            acceptance_rate: 0.85,
            open_submissions: 4,
            notes: "Quick responses. Specializes in small to mid-market accounts.",
        },
        PanelSeed {
            id: "uw-garcia",
            name: "Robert Garcia",
            email: "rgarcia@desertuw.com",
            phone: "(602) 555-2345",
            region: Region::Southwest,
            appetite: &["bar", "restaurant", "entertainment venue"],
            aversions: &["mining", "oil & gas"],
            primary_specialties: &["722410", "722511"],
            secondary_specialties: &["713940"],
            avg_turnaround_days: 3.5,
            acceptance_rate: 0.76,
            open_submissions: 9,
            notes: "Strong liquor liability experience. Knows Arizona/Nevada regulations.",
        },
        PanelSeed {
            id: "uw-park",
            name: "Lisa Park",
            email: "lpark@goldengate.com",
            phone: "(415) 555-6789",
            region: Region::West,
            appetite: &["technology", "saas", "fintech"],
            aversions: &["manufacturing", "agriculture"],
            primary_specialties: &["541511", "522320", "518210"],
            secondary_specialties: &[],
            avg_turnaround_days: 1.0,
            acceptance_rate: 0.92,
            open_submissions: 14,
            notes: "Fastest turnaround in the region. Premium pricing, high acceptance.",
        },
        PanelSeed {
            id: "uw-wilson",
            name: "James Wilson",
            email: "jwilson@atlanticins.com",
            phone: "(617) 555-0123",
            region: Region::Northeast,
            appetite: &["construction", "contractor", "real estate"],
            aversions: &["restaurant", "bar"],
            primary_specialties: &["236220", "238210", "531210"],
            secondary_specialties: &[],
            avg_turnaround_days: 5.0,
            acceptance_rate: 0.68,
            open_submissions: 2,
            notes: "Conservative underwriter. Thorough review but reliable approvals.",
        },
        PanelSeed {
            id: "uw-santos",
            name: "Maria Santos",
            email: "msantos@heartlanduw.com",
            phone: "(816) 555-4567",
            region: Region::Midwest,
            appetite: &["agriculture", "food processing", "retail"],
            aversions: &["nightclub", "cannabis"],
            primary_specialties: &["111998", "311999"],
            secondary_specialties: &["445110"],
            avg_turnaround_days: 4.5,
            acceptance_rate: 0.73,
            open_submissions: 6,
            notes: "Deep agricultural risk expertise. Familiar with crop programs.",
        },
        PanelSeed {
            id: "uw-obrien",
            name: "Kevin O'Brien",
            email: "kobrien@peachstateuw.com",
            phone: "(770) 555-8901",
            region: Region::Southeast,
            appetite: &["restaurant", "bar", "brewery", "winery"],
            aversions: &["heavy industry", "chemical processing"],
            primary_specialties: &["722410", "722511", "312120", "312130"],
            secondary_specialties: &[],
            avg_turnaround_days: 2.0,
            acceptance_rate: 0.87,
            open_submissions: 3,
            notes: "Hospitality specialist. Great for craft beverage accounts.",
        },
    ];

    seeds.into_iter().map(PanelSeed::into_record).collect()
}
