use serde::{Deserialize, Serialize};

use super::super::directory::{SpecialtyStrength, UnderwriterRecord};
use super::super::domain::RiskProfile;
use super::config::RoutingConfig;

/// The scoring criteria, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringCriterion {
    RegionMatch,
    IndustrySpecialty,
    AppetiteMatch,
    AversionPenalty,
    TurnaroundSpeed,
    AcceptanceRate,
    WorkloadCapacity,
}

impl ScoringCriterion {
    pub const fn label(self) -> &'static str {
        match self {
            Self::RegionMatch => "region match",
            Self::IndustrySpecialty => "industry specialty",
            Self::AppetiteMatch => "appetite match",
            Self::AversionPenalty => "aversion penalty",
            Self::TurnaroundSpeed => "turnaround speed",
            Self::AcceptanceRate => "acceptance rate",
            Self::WorkloadCapacity => "workload capacity",
        }
    }
}

/// Discrete contribution to a candidate score, allowing transparent audits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub criterion: ScoringCriterion,
    pub points: f64,
    pub notes: String,
}

/// Evaluate every scoring term for one underwriter against a profile.
///
/// Terms are independent and order-stable; a term is recorded only when it
/// contributes a non-zero amount. Missing profile fields skip their terms.
pub(crate) fn score_terms(
    profile: &RiskProfile,
    underwriter: &UnderwriterRecord,
    config: &RoutingConfig,
) -> (Vec<ScoreComponent>, f64) {
    let mut components = Vec::new();
    let mut total = 0.0;

    let mut record = |criterion: ScoringCriterion, points: f64, notes: String| {
        if points != 0.0 {
            components.push(ScoreComponent {
                criterion,
                points,
                notes,
            });
            total += points;
        }
    };

    if let Some(region) = profile.region {
        if region == underwriter.region {
            record(
                ScoringCriterion::RegionMatch,
                config.region_match_points,
                format!("covers the {} region", region.label()),
            );
        }
    }

    if let Some(code) = profile.industry_code.as_deref() {
        match underwriter.specialty_strength(code) {
            Some(SpecialtyStrength::Primary) => record(
                ScoringCriterion::IndustrySpecialty,
                config.specialty_points,
                format!("specializes in industry {code}"),
            ),
            Some(SpecialtyStrength::Secondary) => record(
                ScoringCriterion::IndustrySpecialty,
                config.specialty_points * config.secondary_specialty_factor,
                format!("secondary specialty in industry {code}"),
            ),
            None => {}
        }
    }

    if let Some(tag) = first_intersection(profile, &underwriter.appetite) {
        record(
            ScoringCriterion::AppetiteMatch,
            config.appetite_points,
            format!("has appetite for {tag} business"),
        );
    }

    if let Some(tag) = first_intersection(profile, &underwriter.aversions) {
        record(
            ScoringCriterion::AversionPenalty,
            config.aversion_penalty,
            format!("avoids {tag} business"),
        );
    }

    let turnaround = turnaround_points(underwriter.avg_turnaround_days, config);
    record(
        ScoringCriterion::TurnaroundSpeed,
        turnaround,
        format!(
            "{:.1}-day average turnaround",
            underwriter.avg_turnaround_days
        ),
    );

    record(
        ScoringCriterion::AcceptanceRate,
        underwriter.acceptance_rate.clamp(0.0, 1.0) * config.acceptance_max_points,
        format!(
            "{:.0}% historical acceptance rate",
            underwriter.acceptance_rate * 100.0
        ),
    );

    let workload = workload_points(underwriter.open_submissions, config);
    record(
        ScoringCriterion::WorkloadCapacity,
        workload,
        if workload > 0.0 {
            format!(
                "capacity available ({} open submissions)",
                underwriter.open_submissions
            )
        } else {
            format!(
                "currently overloaded ({} open submissions)",
                underwriter.open_submissions
            )
        },
    );

    (components, total)
}

/// Tag comparison is case-insensitive; directory tags are stored lowercase.
fn first_intersection<'a>(
    profile: &'a RiskProfile,
    tags: &std::collections::BTreeSet<String>,
) -> Option<&'a str> {
    profile
        .business_type_tags
        .iter()
        .map(String::as_str)
        .find(|tag| tags.iter().any(|other| other.eq_ignore_ascii_case(tag)))
}

fn turnaround_points(avg_turnaround_days: f64, config: &RoutingConfig) -> f64 {
    let floor = config.turnaround_floor_days;
    let ceiling = config.turnaround_ceiling_days;

    if avg_turnaround_days <= floor {
        return config.turnaround_max_points;
    }
    if avg_turnaround_days >= ceiling || ceiling <= floor {
        return 0.0;
    }

    config.turnaround_max_points * (ceiling - avg_turnaround_days) / (ceiling - floor)
}

fn workload_points(open_submissions: u32, config: &RoutingConfig) -> f64 {
    let low = config.workload_low_watermark;
    let high = config.workload_high_watermark;

    if open_submissions < low && low > 0 {
        return config.workload_bonus_max * f64::from(low - open_submissions) / f64::from(low);
    }

    if open_submissions > high && high > 0 {
        let overload = f64::from(open_submissions - high) / f64::from(high);
        return config.workload_penalty_max * overload.min(1.0);
    }

    0.0
}
