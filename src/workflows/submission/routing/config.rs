use serde::{Deserialize, Serialize};

/// Weight configuration for the underwriter scoring terms.
///
/// Weights are fixed configuration, never learned from outcomes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingConfig {
    pub region_match_points: f64,
    pub specialty_points: f64,
    /// Fraction of the specialty points earned for a secondary-tier specialty.
    pub secondary_specialty_factor: f64,
    pub appetite_points: f64,
    /// Negative; applied independently of the appetite bonus.
    pub aversion_penalty: f64,
    pub turnaround_max_points: f64,
    /// Turnaround at or below the floor earns the full bonus.
    pub turnaround_floor_days: f64,
    /// Turnaround at or above the ceiling earns nothing.
    pub turnaround_ceiling_days: f64,
    pub acceptance_max_points: f64,
    pub workload_bonus_max: f64,
    /// Negative; full penalty at twice the high watermark.
    pub workload_penalty_max: f64,
    pub workload_low_watermark: u32,
    pub workload_high_watermark: u32,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            region_match_points: 25.0,
            specialty_points: 30.0,
            secondary_specialty_factor: 0.7,
            appetite_points: 20.0,
            aversion_penalty: -50.0,
            turnaround_max_points: 15.0,
            turnaround_floor_days: 1.0,
            turnaround_ceiling_days: 7.0,
            acceptance_max_points: 10.0,
            workload_bonus_max: 10.0,
            workload_penalty_max: -15.0,
            workload_low_watermark: 5,
            workload_high_watermark: 10,
        }
    }
}
