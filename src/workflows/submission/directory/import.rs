//! CSV hydration for the underwriter directory, matching the export shape of
//! the upstream panel spreadsheet.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::super::domain::Region;
use super::{SpecialtyStrength, StaticDirectory, UnderwriterId, UnderwriterRecord};

#[derive(Debug, thiserror::Error)]
pub enum DirectoryImportError {
    #[error("failed to read panel export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid panel CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid panel record '{id}': {detail}")]
    Record { id: String, detail: String },
}

#[derive(Debug, Deserialize)]
struct PanelRow {
    id: String,
    name: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    email: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    phone: Option<String>,
    region: String,
    #[serde(default)]
    appetite: String,
    #[serde(default)]
    aversions: String,
    #[serde(default)]
    specialties: String,
    #[serde(default)]
    secondary_specialties: String,
    avg_turnaround_days: f64,
    acceptance_rate: f64,
    open_submissions: u32,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    notes: Option<String>,
}

impl PanelRow {
    fn into_record(self) -> Result<UnderwriterRecord, DirectoryImportError> {
        let region = parse_region(&self.region).ok_or_else(|| DirectoryImportError::Record {
            id: self.id.clone(),
            detail: format!("unknown region '{}'", self.region),
        })?;

        if !(0.0..=1.0).contains(&self.acceptance_rate) {
            return Err(DirectoryImportError::Record {
                id: self.id.clone(),
                detail: format!("acceptance_rate {} outside 0.0..=1.0", self.acceptance_rate),
            });
        }

        if self.avg_turnaround_days <= 0.0 {
            return Err(DirectoryImportError::Record {
                id: self.id.clone(),
                detail: format!("avg_turnaround_days {} must be positive", self.avg_turnaround_days),
            });
        }

        let mut specialties = BTreeMap::new();
        for code in split_list(&self.specialties) {
            specialties.insert(code, SpecialtyStrength::Primary);
        }
        for code in split_list(&self.secondary_specialties) {
            specialties
                .entry(code)
                .or_insert(SpecialtyStrength::Secondary);
        }

        Ok(UnderwriterRecord {
            id: UnderwriterId(self.id),
            name: self.name,
            email: self.email.unwrap_or_default(),
            phone: self.phone.unwrap_or_default(),
            region,
            specialties,
            appetite: split_tags(&self.appetite),
            aversions: split_tags(&self.aversions),
            avg_turnaround_days: self.avg_turnaround_days,
            acceptance_rate: self.acceptance_rate,
            open_submissions: self.open_submissions,
            notes: self.notes,
        })
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_region(value: &str) -> Option<Region> {
    match value.trim().to_ascii_lowercase().as_str() {
        "southeast" => Some(Region::Southeast),
        "northeast" => Some(Region::Northeast),
        "midwest" => Some(Region::Midwest),
        "southwest" => Some(Region::Southwest),
        "pnw" => Some(Region::Pnw),
        "west" => Some(Region::West),
        _ => None,
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

fn split_tags(value: &str) -> BTreeSet<String> {
    value
        .split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_ascii_lowercase)
        .collect()
}

/// Read a panel export from any reader into a directory.
pub fn read_panel_csv<R: Read>(reader: R) -> Result<StaticDirectory, DirectoryImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for row in csv_reader.deserialize::<PanelRow>() {
        records.push(row?.into_record()?);
    }

    Ok(StaticDirectory::new(records))
}

/// Read a panel export from disk.
pub fn load_panel_csv<P: AsRef<Path>>(path: P) -> Result<StaticDirectory, DirectoryImportError> {
    let file = std::fs::File::open(path)?;
    read_panel_csv(file)
}
