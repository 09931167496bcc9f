//! Peak-demand impact of a fleet scenario on the national grid.

use serde::Serialize;

use crate::assessment::scenario::{ChargerMix, PolicyScenario};
use crate::research::{coefficients, ResearchCoefficients};

/// Peak demand is halved for charger diversity.
const DIVERSITY_FACTOR: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DemandRisk {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UtilizationStatus {
    WithinLimits,
    ApproachingCapacity,
    Overload,
}

impl UtilizationStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::WithinLimits => "Grid within safe limits",
            Self::ApproachingCapacity => "Grid approaching capacity",
            Self::Overload => "Grid overload risk",
        }
    }
}

/// Values are rounded for display: MW to 2 decimals, utilization to 1.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridImpact {
    pub additional_demand_mw: f64,
    pub total_demand_mw: f64,
    pub capacity_utilization_pct: f64,
    pub utilization_status: UtilizationStatus,
    pub dg_capacity_needed_mw: f64,
    pub risk_level: DemandRisk,
    pub overloaded: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct GridImpactCalculator<'a> {
    coefficients: &'a ResearchCoefficients,
}

impl GridImpactCalculator<'static> {
    pub fn installed() -> Self {
        Self::new(coefficients())
    }
}

impl<'a> GridImpactCalculator<'a> {
    pub fn new(coefficients: &'a ResearchCoefficients) -> Self {
        Self { coefficients }
    }

    pub fn calculate(&self, scenario: &PolicyScenario) -> GridImpact {
        let grid = &self.coefficients.grid;
        let additional = f64::from(scenario.total_evs)
            * charger_power_kw(scenario.charger_mix)
            * (scenario.peak_charging_share / 100.0)
            / 1000.0
            / DIVERSITY_FACTOR;
        let total = grid.base_peak_demand_mw + additional;
        let utilization = (total / grid.capacity_mw * 100.0).min(100.0);

        GridImpact {
            additional_demand_mw: round_to(additional, 2),
            total_demand_mw: round_to(total, 2),
            capacity_utilization_pct: round_to(utilization, 1),
            utilization_status: utilization_status(utilization),
            dg_capacity_needed_mw: round_to(self.dg_needed(scenario.charger_mix, additional), 2),
            risk_level: demand_risk(additional),
            overloaded: total > grid.capacity_mw,
        }
    }

    /// DG sized from the study's requirement, scaled by added demand over its reference load.
    fn dg_needed(&self, mix: ChargerMix, additional_mw: f64) -> f64 {
        let dg = &self.coefficients.dg;
        let base = match mix {
            ChargerMix::TenKwFocus => dg.chargers_10kw_mw,
            ChargerMix::TwentyKwFocus => dg.chargers_20kw_mw,
            ChargerMix::Balanced | ChargerMix::FastChargeHeavy => {
                (dg.chargers_10kw_mw + dg.chargers_20kw_mw) / 2.0
            }
        };
        if dg.reference_demand_mw <= 0.0 {
            return 0.0;
        }
        base * additional_mw / dg.reference_demand_mw
    }
}

/// Average draw per charging EV for the charger mix.
fn charger_power_kw(mix: ChargerMix) -> f64 {
    match mix {
        ChargerMix::TenKwFocus => 7.0,
        ChargerMix::TwentyKwFocus => 12.0,
        ChargerMix::Balanced | ChargerMix::FastChargeHeavy => 10.0,
    }
}

fn demand_risk(additional_mw: f64) -> DemandRisk {
    if additional_mw > 50.0 {
        DemandRisk::High
    } else if additional_mw > 30.0 {
        DemandRisk::Medium
    } else {
        DemandRisk::Low
    }
}

pub fn utilization_status(utilization_pct: f64) -> UtilizationStatus {
    if utilization_pct > 90.0 {
        UtilizationStatus::Overload
    } else if utilization_pct > 70.0 {
        UtilizationStatus::ApproachingCapacity
    } else {
        UtilizationStatus::WithinLimits
    }
}

pub fn calculate_grid_impact(scenario: &PolicyScenario) -> GridImpact {
    GridImpactCalculator::installed().calculate(scenario)
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::baseline_scenario;

    fn impact(scenario: &PolicyScenario) -> GridImpact {
        GridImpactCalculator::new(&ResearchCoefficients::default()).calculate(scenario)
    }

    #[test]
    fn baseline_load_is_well_within_capacity() {
        let result = impact(&baseline_scenario());
        // 12 500 EVs x 10 kW x 50 % / 1000 / 2
        assert_eq!(result.additional_demand_mw, 31.25);
        assert_eq!(result.total_demand_mw, 131.25);
        assert_eq!(result.capacity_utilization_pct, 57.1);
        assert_eq!(result.utilization_status, UtilizationStatus::WithinLimits);
        assert_eq!(result.dg_capacity_needed_mw, 19.38);
        assert_eq!(result.risk_level, DemandRisk::Medium);
        assert!(!result.overloaded);
    }

    #[test]
    fn utilization_is_capped_and_overload_flagged() {
        let scenario = PolicyScenario {
            total_evs: 100_000,
            charger_mix: ChargerMix::TwentyKwFocus,
            peak_charging_share: 80.0,
            ..baseline_scenario()
        };
        let result = impact(&scenario);
        assert_eq!(result.additional_demand_mw, 480.0);
        assert_eq!(result.capacity_utilization_pct, 100.0);
        assert_eq!(result.utilization_status, UtilizationStatus::Overload);
        assert_eq!(result.risk_level, DemandRisk::High);
        assert!(result.overloaded);
        assert_eq!(result.dg_capacity_needed_mw, 470.4);
    }

    #[test]
    fn ten_kw_mix_draws_less() {
        let scenario = PolicyScenario {
            charger_mix: ChargerMix::TenKwFocus,
            ..baseline_scenario()
        };
        let result = impact(&scenario);
        assert_eq!(result.additional_demand_mw, 21.88);
        assert_eq!(result.risk_level, DemandRisk::Low);
    }

    #[test]
    fn zero_dg_reference_gives_no_dg_figure() {
        let mut coefficients = ResearchCoefficients::default();
        coefficients.dg.reference_demand_mw = 0.0;
        let result = GridImpactCalculator::new(&coefficients).calculate(&baseline_scenario());
        assert_eq!(result.dg_capacity_needed_mw, 0.0);
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"dg_capacity_needed_mw\":0.0"), "{json}");
    }

    #[test]
    fn status_thresholds_are_exclusive() {
        assert_eq!(utilization_status(70.0), UtilizationStatus::WithinLimits);
        assert_eq!(utilization_status(70.1), UtilizationStatus::ApproachingCapacity);
        assert_eq!(utilization_status(90.0), UtilizationStatus::ApproachingCapacity);
        assert_eq!(utilization_status(90.5), UtilizationStatus::Overload);
    }
}
