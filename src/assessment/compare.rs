use serde::Serialize;

use crate::assessment::recommendations::{generate_recommendations, group_thousands};
use crate::assessment::scenario::PolicyScenario;
use crate::assessment::{assess_scenario, ScenarioAssessment};

/// Fleet gaps at or below this size are not worth reporting.
const FLEET_DIFFERENCE_THRESHOLD: u32 = 10_000;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioComparison {
    pub scenario_assessment: ScenarioAssessment,
    pub other_assessment: ScenarioAssessment,
    pub differences: Vec<String>,
    /// Recommendation count of the scenario minus that of the other one.
    pub recommendation_difference: i64,
}

pub fn compare_scenarios(scenario: &PolicyScenario, other: &PolicyScenario) -> ScenarioComparison {
    let first = assess_scenario(scenario);
    let second = assess_scenario(other);

    let mut differences = Vec::new();
    let fleet_gap = scenario.total_evs.abs_diff(other.total_evs);
    if fleet_gap > FLEET_DIFFERENCE_THRESHOLD {
        differences.push(format!(
            "EV fleet difference: {} vehicles",
            group_thousands(u64::from(fleet_gap))
        ));
    }
    if first.infrastructure_pressure != second.infrastructure_pressure {
        differences.push(format!(
            "Infrastructure pressure: {} vs {}",
            first.infrastructure_pressure.label(),
            second.infrastructure_pressure.label()
        ));
    }
    if first.grid_risk != second.grid_risk {
        differences.push(format!(
            "Grid risk: {} vs {}",
            first.grid_risk.label(),
            second.grid_risk.label()
        ));
    }
    if first.financial_viability != second.financial_viability {
        differences.push(format!(
            "Financial viability: {} vs {}",
            first.financial_viability.label(),
            second.financial_viability.label()
        ));
    }

    let count =
        |s: &PolicyScenario, a: &ScenarioAssessment| generate_recommendations(s, a).len() as i64;
    let recommendation_difference = count(scenario, &first) - count(other, &second);

    ScenarioComparison {
        scenario_assessment: first,
        other_assessment: second,
        differences,
        recommendation_difference,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::baseline_scenario;
    use crate::assessment::scenario::{InvestmentAppetite, RegulatoryFlexibility};

    #[test]
    fn identical_scenarios_have_no_differences() {
        let comparison = compare_scenarios(&baseline_scenario(), &baseline_scenario());
        assert!(comparison.differences.is_empty());
        assert_eq!(comparison.recommendation_difference, 0);
        assert_eq!(comparison.scenario_assessment, comparison.other_assessment);
    }

    #[test]
    fn large_scenario_reports_fleet_and_band_changes() {
        let scaled = PolicyScenario {
            total_evs: 60_000,
            public_chargers: 200,
            peak_charging_share: 80.0,
            investment_appetite: InvestmentAppetite::Transformative,
            regulatory_flexibility: RegulatoryFlexibility::SandboxApproach,
            ..baseline_scenario()
        };
        let comparison = compare_scenarios(&scaled, &baseline_scenario());
        assert_eq!(
            comparison.differences,
            vec![
                "EV fleet difference: 47,500 vehicles",
                "Infrastructure pressure: Critical vs Medium",
                "Grid risk: Medium-High vs Medium",
                "Financial viability: Excellent vs Moderate",
            ]
        );
        assert!(comparison.recommendation_difference > 0);
    }

    #[test]
    fn fleet_gap_of_exactly_ten_thousand_is_not_reported() {
        let other = PolicyScenario {
            total_evs: 22_500,
            public_chargers: 281,
            ..baseline_scenario()
        };
        let comparison = compare_scenarios(&baseline_scenario(), &other);
        assert!(comparison
            .differences
            .iter()
            .all(|line| !line.starts_with("EV fleet difference")));
    }
}
