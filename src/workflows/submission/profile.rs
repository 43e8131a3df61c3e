use super::domain::{MappedFormOutput, Region, RiskProfile};

/// Derive a risk profile from mapped form output.
///
/// Total over its input: absent or unrecognized fields leave the matching
/// profile fields empty and contribute nothing. Tags and hazards come from a
/// fixed mapping of known form fields, never from free interpretation.
pub fn build_risk_profile(mapped: &MappedFormOutput) -> RiskProfile {
    let mut profile = RiskProfile::default();

    if let Some(classification) = &mapped.classification {
        profile.industry_code = classification
            .industry_code
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(str::to_string);
    }

    profile.region = mapped
        .premises
        .as_ref()
        .and_then(|premises| premises.state.as_deref())
        .and_then(region_for_state);

    if let Some(code) = profile.industry_code.as_deref() {
        if let Some(tag) = business_type_for_industry(code) {
            profile.business_type_tags.insert(tag.to_string());
        }
    }

    if let Some(operations) = &mapped.operations {
        for hazard in &operations.hazards {
            let hazard = hazard.trim();
            if !hazard.is_empty() {
                profile.hazards.insert(hazard.to_ascii_lowercase());
            }
        }

        let serves_alcohol = operations.alcohol_sales_pct.is_some_and(|pct| pct > 0.0);
        if serves_alcohol || operations.liquor_liability_required {
            profile.requires_liquor_liability = true;
            profile.business_type_tags.insert("liquor".to_string());
            profile.hazards.insert("alcohol_service".to_string());
        }

        if operations.live_entertainment {
            profile.hazards.insert("live_entertainment".to_string());
        }
    }

    profile
}

/// Map a premises state (two-letter code or full name) onto a coverage region.
///
/// Unknown values map to nothing rather than failing.
pub fn region_for_state(state: &str) -> Option<Region> {
    let trimmed = state.trim();
    if trimmed.is_empty() {
        return None;
    }

    let code = if trimmed.len() == 2 {
        trimmed.to_ascii_uppercase()
    } else {
        abbreviation_for_state_name(trimmed)?.to_string()
    };

    match code.as_str() {
        "ME" | "NH" | "VT" | "MA" | "RI" | "CT" | "NY" | "NJ" | "PA" => Some(Region::Northeast),
        "DE" | "MD" | "VA" | "WV" | "NC" | "SC" | "GA" | "FL" | "KY" | "TN" | "AL" | "MS"
        | "AR" | "LA" => Some(Region::Southeast),
        "OH" | "MI" | "IN" | "IL" | "WI" | "MN" | "IA" | "MO" | "ND" | "SD" | "NE" | "KS" => {
            Some(Region::Midwest)
        }
        "TX" | "OK" | "NM" | "AZ" => Some(Region::Southwest),
        "WA" | "OR" => Some(Region::Pnw),
        "CO" | "WY" | "MT" | "ID" | "UT" | "NV" | "CA" | "AK" | "HI" => Some(Region::West),
        _ => None,
    }
}

fn abbreviation_for_state_name(name: &str) -> Option<&'static str> {
    let normalized = name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_uppercase();

    let code = match normalized.as_str() {
        "ALABAMA" => "AL",
        "ALASKA" => "AK",
        "ARIZONA" => "AZ",
        "ARKANSAS" => "AR",
        "CALIFORNIA" => "CA",
        "COLORADO" => "CO",
        "CONNECTICUT" => "CT",
        "DELAWARE" => "DE",
        "FLORIDA" => "FL",
        "GEORGIA" => "GA",
        "HAWAII" => "HI",
        "IDAHO" => "ID",
        "ILLINOIS" => "IL",
        "INDIANA" => "IN",
        "IOWA" => "IA",
        "KANSAS" => "KS",
        "KENTUCKY" => "KY",
        "LOUISIANA" => "LA",
        "MAINE" => "ME",
        "MARYLAND" => "MD",
        "MASSACHUSETTS" => "MA",
        "MICHIGAN" => "MI",
        "MINNESOTA" => "MN",
        "MISSISSIPPI" => "MS",
        "MISSOURI" => "MO",
        "MONTANA" => "MT",
        "NEBRASKA" => "NE",
        "NEVADA" => "NV",
        "NEW HAMPSHIRE" => "NH",
        "NEW JERSEY" => "NJ",
        "NEW MEXICO" => "NM",
        "NEW YORK" => "NY",
        "NORTH CAROLINA" => "NC",
        "NORTH DAKOTA" => "ND",
        "OHIO" => "OH",
        "OKLAHOMA" => "OK",
        "OREGON" => "OR",
        "PENNSYLVANIA" => "PA",
        "RHODE ISLAND" => "RI",
        "SOUTH CAROLINA" => "SC",
        "SOUTH DAKOTA" => "SD",
        "TENNESSEE" => "TN",
        "TEXAS" => "TX",
        "UTAH" => "UT",
        "VERMONT" => "VT",
        "VIRGINIA" => "VA",
        "WASHINGTON" => "WA",
        "WEST VIRGINIA" => "WV",
        "WISCONSIN" => "WI",
        "WYOMING" => "WY",
        _ => return None,
    };

    Some(code)
}

/// Classify a business type from an industry code, exact code first, then the
/// 4-digit industry group.
pub fn business_type_for_industry(code: &str) -> Option<&'static str> {
    let code = code.trim();

    let exact = match code {
        "722410" => Some("bar"),
        "722511" | "722513" | "722514" | "722515" => Some("restaurant"),
        "445110" | "445120" | "448110" | "448120" => Some("retail"),
        "721110" | "721120" => Some("hotel"),
        _ => None,
    };
    if exact.is_some() {
        return exact;
    }

    match code.get(..4) {
        Some("7224") => Some("bar"),
        Some("7225") => Some("restaurant"),
        Some("4451") | Some("4481") => Some("retail"),
        Some("7211") => Some("hotel"),
        _ => None,
    }
}
