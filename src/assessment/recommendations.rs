//! Scenario-sensitive action list: infrastructure, grid, fleet strategy, policy priority,
//! financing, stakeholder-specific items, and governance when the situation is pressing.

use serde::Serialize;

use crate::assessment::scenario::{
    ChargerMix, InvestmentAppetite, PolicyPriority, PolicyScenario, RegulatoryFlexibility,
};
use crate::assessment::{ScenarioAssessment, Severity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionPriority {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactLevel {
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionCategory {
    Infrastructure,
    GridManagement,
    GridInfrastructure,
    FleetStrategy,
    ClimateEnvironment,
    Financial,
    Governance,
    UrbanPlanning,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolicyAction {
    pub title: String,
    pub description: String,
    pub category: ActionCategory,
    pub priority: ActionPriority,
    pub timeframe: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impact: Option<ImpactLevel>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stakeholders: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_cost: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kpi: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mitigation_strategy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roi: Option<String>,
}

impl PolicyAction {
    fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        category: ActionCategory,
        priority: ActionPriority,
        timeframe: &str,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            category,
            priority,
            timeframe: timeframe.to_string(),
            impact: None,
            stakeholders: Vec::new(),
            estimated_cost: None,
            kpi: None,
            actions: Vec::new(),
            mitigation_strategy: None,
            roi: None,
        }
    }

    fn impact(mut self, impact: ImpactLevel) -> Self {
        self.impact = Some(impact);
        self
    }

    fn stakeholders(mut self, names: &[&str]) -> Self {
        self.stakeholders = names.iter().map(|name| name.to_string()).collect();
        self
    }

    fn cost(mut self, cost: impl Into<String>) -> Self {
        self.estimated_cost = Some(cost.into());
        self
    }

    fn kpi(mut self, kpi: impl Into<String>) -> Self {
        self.kpi = Some(kpi.into());
        self
    }

    fn actions(mut self, actions: &[&str]) -> Self {
        self.actions = actions.iter().map(|action| action.to_string()).collect();
        self
    }
}

/// Group an integer with thousands separators: 1234567 -> "1,234,567".
pub(crate) fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

pub(crate) fn format_usd(amount: f64) -> String {
    format!("${}", group_thousands(amount.max(0.0).round() as u64))
}

pub fn generate_recommendations(
    scenario: &PolicyScenario,
    assessment: &ScenarioAssessment,
) -> Vec<PolicyAction> {
    let mut recommendations = Vec::new();

    if let Some(action) = infrastructure_action(scenario, assessment) {
        recommendations.push(action);
    }
    if let Some(action) = grid_action(scenario, assessment) {
        recommendations.push(action);
    }
    recommendations.push(fleet_strategy_action(scenario));
    if let Some(action) = policy_priority_action(scenario) {
        recommendations.push(action);
    }
    if let Some(action) = financing_action(scenario) {
        recommendations.push(action);
    }
    recommendations.extend(stakeholder_actions(&scenario.stakeholder));

    if assessment.urgency.is_pressing() {
        recommendations.push(
            PolicyAction::new(
                "Rapid Response Team",
                format!(
                    "{} situation detected. Establish cross-functional team.",
                    assessment.urgency.label()
                ),
                ActionCategory::Governance,
                ActionPriority::Critical,
                "1 month",
            )
            .impact(ImpactLevel::High)
            .stakeholders(&["All relevant agencies"])
            .cost("Minimal")
            .kpi("Weekly progress monitoring")
            .actions(&[
                "Immediate stakeholder coordination",
                "Emergency funding access",
                "Fast-track approvals",
            ]),
        );
    }

    // Stable: actions of equal priority keep their generation order.
    recommendations.sort_by(|left, right| right.priority.cmp(&left.priority));
    recommendations
}

fn infrastructure_action(
    scenario: &PolicyScenario,
    assessment: &ScenarioAssessment,
) -> Option<PolicyAction> {
    let pressure = assessment.infrastructure_pressure;
    if !matches!(pressure, Severity::Critical | Severity::High) {
        return None;
    }

    let evs = scenario.total_evs;
    let ratio = assessment.ev_to_charger_ratio;
    let (title, description, timeframe, priority, cost_per_ev) = if ratio > 200.0 {
        (
            "EMERGENCY: Massive Infrastructure Deployment Required",
            format!(
                "Critical infrastructure gap with {ratio:.1}:1 EV-to-charger ratio. Requires immediate deployment of {} new charging stations.",
                evs / 50
            ),
            "3-6 months",
            ActionPriority::Critical,
            1500.0,
        )
    } else if ratio > 150.0 {
        (
            "Accelerate Charging Infrastructure Rollout",
            format!(
                "High pressure with {ratio:.1}:1 ratio. Target deployment of {} new stations.",
                evs / 80
            ),
            "6-12 months",
            ActionPriority::High,
            1200.0,
        )
    } else {
        (
            "Expand Charging Network",
            format!(
                "Moderate pressure with {ratio:.1}:1 ratio. Plan for {} new stations.",
                evs / 100
            ),
            "12-18 months",
            ActionPriority::Medium,
            1000.0,
        )
    };

    let mut action = PolicyAction::new(
        title,
        description,
        ActionCategory::Infrastructure,
        priority,
        timeframe,
    )
    .impact(ImpactLevel::High)
    .stakeholders(&["MININFRA", "RURA", "City of Kigali"])
    .cost(format_usd(f64::from(evs) * cost_per_ev))
    .kpi(format!(
        "Reduce EV-to-charger ratio to 50:1 (Current: {ratio:.1}:1)"
    ));
    action.actions = infrastructure_steps(scenario, pressure);
    Some(action)
}

fn infrastructure_steps(scenario: &PolicyScenario, pressure: Severity) -> Vec<String> {
    let mut steps: Vec<String> = match pressure {
        Severity::Critical => vec![
            "Emergency permitting for charging stations",
            "Temporary mobile charging solutions",
            "Priority grid connections",
            "Public land allocation",
        ],
        Severity::High => vec![
            "Fast-track approval process",
            "50% subsidy for public chargers",
            "EV-ready building codes",
            "Corridor development",
        ],
        _ => vec![
            "Standard approval process",
            "30% subsidy for public chargers",
            "Planning for future growth",
            "Public-private partnerships",
        ],
    }
    .into_iter()
    .map(str::to_string)
    .collect();

    if scenario.urban_share > 80.0 {
        steps.push("Focus on high-density urban charging".to_string());
    } else {
        steps.push("Balanced urban-rural deployment".to_string());
    }
    steps
}

fn grid_action(
    scenario: &PolicyScenario,
    assessment: &ScenarioAssessment,
) -> Option<PolicyAction> {
    if assessment.grid_risk < Severity::MediumHigh {
        return None;
    }

    let peak = scenario.peak_charging_share;
    let (title, mut description, timeframe, mut mitigation) = if peak > 70.0 {
        (
            "CRITICAL: Immediate Grid Protection Measures",
            format!(
                "Extreme peak charging ({peak}%) risks grid failure. Implement emergency measures."
            ),
            "1-3 months",
            "Mandatory off-peak charging, emergency DG deployment".to_string(),
        )
    } else if peak > 50.0 {
        (
            "Implement Smart Grid Solutions",
            format!("High peak charging ({peak}%) requires advanced grid management."),
            "3-9 months",
            "Time-of-Use tariffs, smart charging, V2G programs".to_string(),
        )
    } else {
        (
            "Proactive Grid Planning",
            format!("Moderate peak charging ({peak}%) allows for planned upgrades."),
            "9-18 months",
            "Grid reinforcement, distributed generation planning".to_string(),
        )
    };

    if matches!(
        scenario.charger_mix,
        ChargerMix::TwentyKwFocus | ChargerMix::FastChargeHeavy
    ) {
        description.push_str(&format!(" Aggravated by {} strategy.", scenario.charger_mix));
        mitigation.push_str(", consider charger power management");
    }

    let priority = if assessment.grid_risk >= Severity::High {
        ActionPriority::High
    } else {
        ActionPriority::Medium
    };
    let (impact, cost) = if peak > 50.0 {
        (ImpactLevel::High, "$5-15M")
    } else {
        (ImpactLevel::Medium, "$2-8M")
    };

    let mut action = PolicyAction::new(
        title,
        description,
        ActionCategory::GridManagement,
        priority,
        timeframe,
    )
    .impact(impact)
    .stakeholders(&["REG", "RURA", "MININFRA"])
    .cost(cost)
    .kpi(format!("Reduce peak charging to <40% (Current: {peak}%)"));
    action.mitigation_strategy = Some(mitigation);
    Some(action)
}

fn fleet_strategy_action(scenario: &PolicyScenario) -> PolicyAction {
    let share = scenario.two_wheeler_share;
    let (title, description, actions) = if share > 60.0 {
        (
            "E-Moto Priority Strategy",
            format!(
                "Dominant two-wheeler share ({share}%) requires specialized infrastructure focus."
            ),
            [
                "Deploy high-density e-moto charging hubs",
                "Standardize battery swapping systems",
                "Develop e-moto dedicated lanes",
            ],
        )
    } else if share > 40.0 {
        (
            "Integrated Two-Wheeler Planning",
            format!("Significant two-wheeler share ({share}%) needs balanced approach."),
            [
                "Mixed-use charging stations",
                "E-moto purchase subsidies",
                "Operator training programs",
            ],
        )
    } else {
        (
            "Mainstream EV Focus",
            format!("Lower two-wheeler share ({share}%) allows focus on car infrastructure."),
            [
                "Standard car charging networks",
                "Public charging corridors",
                "Fleet electrification programs",
            ],
        )
    };

    let dominant = share > 60.0;
    PolicyAction::new(
        title,
        description,
        ActionCategory::FleetStrategy,
        if dominant {
            ActionPriority::High
        } else {
            ActionPriority::Medium
        },
        "6-24 months",
    )
    .impact(if dominant {
        ImpactLevel::High
    } else {
        ImpactLevel::Medium
    })
    .stakeholders(&["City of Kigali", "RDB", "Private Sector"])
    .cost(format_usd(f64::from(scenario.total_evs) * 200.0 * (share / 100.0)))
    .kpi(format!("Optimize infrastructure for {share}% two-wheeler fleet"))
    .actions(&actions)
}

fn policy_priority_action(scenario: &PolicyScenario) -> Option<PolicyAction> {
    match scenario.policy_priority {
        PolicyPriority::ClimateImpactMaximization => {
            let solar = scenario.solar_integration;
            let action = PolicyAction::new(
                "Renewable Charging Strategy",
                format!("Align with climate goals. Current solar integration: {solar}%."),
                ActionCategory::ClimateEnvironment,
                if solar < 30.0 {
                    ActionPriority::High
                } else {
                    ActionPriority::Medium
                },
                "12-36 months",
            )
            .impact(if solar < 50.0 {
                ImpactLevel::High
            } else {
                ImpactLevel::Medium
            })
            .stakeholders(&["REMA", "REG", "MININFRA"])
            .cost(format_usd(f64::from(scenario.total_evs) * 300.0))
            .kpi(format!(
                "Achieve {}% renewable charging by 2030",
                (solar + 20.0).max(50.0)
            ));
            let action = if solar < 30.0 {
                action.actions(&[
                    "Solar mandate for new stations",
                    "Renewable energy credits",
                    "Green financing",
                ])
            } else {
                action.actions(&[
                    "Scale successful models",
                    "Grid integration of renewables",
                    "Carbon tracking",
                ])
            };
            Some(action)
        }
        PolicyPriority::GridStabilityResilience => Some(
            PolicyAction::new(
                "Grid Resilience Framework",
                "Prioritize grid stability in EV integration planning.",
                ActionCategory::GridInfrastructure,
                ActionPriority::High,
                "6-18 months",
            )
            .impact(ImpactLevel::High)
            .stakeholders(&["REG", "RURA", "MININFRA"])
            .cost("$10-25M")
            .kpi("Maintain grid stability at 100,000+ EVs")
            .actions(&[
                "Advanced grid monitoring",
                "Resilience standards",
                "Backup power systems",
            ]),
        ),
        _ => None,
    }
}

fn financing_action(scenario: &PolicyScenario) -> Option<PolicyAction> {
    let bold_investment = matches!(
        scenario.investment_appetite,
        InvestmentAppetite::Aggressive | InvestmentAppetite::Transformative
    );
    let flexible_regulation = matches!(
        scenario.regulatory_flexibility,
        RegulatoryFlexibility::InnovationFriendly | RegulatoryFlexibility::SandboxApproach
    );
    if !(bold_investment && flexible_regulation) {
        return None;
    }

    let mut action = PolicyAction::new(
        "Advanced PPP Framework",
        format!(
            "High investment appetite ({}) with flexible regulation ({}) enables innovative partnerships.",
            scenario.investment_appetite, scenario.regulatory_flexibility
        ),
        ActionCategory::Financial,
        ActionPriority::High,
        "6-24 months",
    )
    .impact(ImpactLevel::High)
    .stakeholders(&["MINECOFIN", "RDB", "Private Sector"])
    .cost("PPP (Public: $10-50M, Private: 3-5x leverage)")
    .kpi(format!(
        "Attract {} private investment",
        format_usd(f64::from(scenario.total_evs) * 100.0)
    ));
    action.roi = Some("12-20%".to_string());
    Some(action)
}

/// Matched on the institution name, so one stakeholder can pick up several items.
fn stakeholder_actions(stakeholder: &str) -> Vec<PolicyAction> {
    let mut actions = Vec::new();

    if stakeholder.contains("Government") || stakeholder.contains("MININFRA") {
        actions.push(PolicyAction::new(
            "Policy Coordination Framework",
            "Coordinate across ministries and agencies for coherent EV policy.",
            ActionCategory::Governance,
            ActionPriority::High,
            "3-12 months",
        ));
    }
    if stakeholder.contains("REG") || stakeholder.contains("Utility") {
        actions.push(PolicyAction::new(
            "Grid Modernization Plan",
            "Upgrade distribution network for EV integration.",
            ActionCategory::GridInfrastructure,
            ActionPriority::High,
            "12-36 months",
        ));
    }
    if stakeholder.contains("Private Investor") || stakeholder.contains("Developer") {
        let mut action = PolicyAction::new(
            "Investment Readiness Assessment",
            "Evaluate market opportunities and regulatory environment.",
            ActionCategory::Financial,
            ActionPriority::Medium,
            "1-3 months",
        );
        action.roi = Some("15-25%".to_string());
        actions.push(action);
    }
    if stakeholder.contains("Kigali") {
        actions.push(PolicyAction::new(
            "Urban Mobility Integration",
            "Integrate EV charging with urban planning and public transport.",
            ActionCategory::UrbanPlanning,
            ActionPriority::Medium,
            "6-24 months",
        ));
    }

    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::{assess_scenario, baseline_scenario};

    fn titles(actions: &[PolicyAction]) -> Vec<&str> {
        actions.iter().map(|action| action.title.as_str()).collect()
    }

    #[test]
    fn thousands_grouping() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_000), "1,000");
        assert_eq!(group_thousands(18_750_000), "18,750,000");
        assert_eq!(format_usd(1_300_000.4), "$1,300,000");
    }

    #[test]
    fn baseline_gets_fleet_and_coordination_actions_only() {
        let scenario = baseline_scenario();
        let recommendations = generate_recommendations(&scenario, &assess_scenario(&scenario));
        assert_eq!(
            titles(&recommendations),
            vec!["Policy Coordination Framework", "Integrated Two-Wheeler Planning"]
        );
        let fleet = &recommendations[1];
        assert_eq!(fleet.estimated_cost.as_deref(), Some("$1,300,000"));
        assert_eq!(fleet.kpi.as_deref(), Some("Optimize infrastructure for 52% two-wheeler fleet"));
    }

    #[test]
    fn critical_scenario_is_sorted_by_priority() {
        let scenario = PolicyScenario {
            total_evs: 60_000,
            public_chargers: 200,
            peak_charging_share: 80.0,
            charger_mix: ChargerMix::FastChargeHeavy,
            v2g_adoption: 0.0,
            solar_integration: 0.0,
            urban_share: 85.0,
            ..baseline_scenario()
        };
        let recommendations = generate_recommendations(&scenario, &assess_scenario(&scenario));

        assert_eq!(
            titles(&recommendations),
            vec![
                "EMERGENCY: Massive Infrastructure Deployment Required",
                "Rapid Response Team",
                "CRITICAL: Immediate Grid Protection Measures",
                "Policy Coordination Framework",
                "Integrated Two-Wheeler Planning",
            ]
        );
        for pair in recommendations.windows(2) {
            assert!(pair[0].priority >= pair[1].priority);
        }

        let infrastructure = &recommendations[0];
        assert!(infrastructure.description.contains("300.0:1"));
        assert!(infrastructure.description.contains("1200 new charging stations"));
        assert_eq!(infrastructure.estimated_cost.as_deref(), Some("$90,000,000"));
        assert_eq!(
            infrastructure.actions.last().map(String::as_str),
            Some("Focus on high-density urban charging")
        );

        let grid = &recommendations[2];
        assert!(grid.description.ends_with("Aggravated by Fast-Charge Heavy strategy."));
        assert_eq!(
            grid.mitigation_strategy.as_deref(),
            Some(
                "Mandatory off-peak charging, emergency DG deployment, \
                 consider charger power management"
            )
        );
    }

    #[test]
    fn policy_priority_and_financing_actions() {
        let scenario = PolicyScenario {
            policy_priority: PolicyPriority::ClimateImpactMaximization,
            investment_appetite: InvestmentAppetite::Aggressive,
            regulatory_flexibility: RegulatoryFlexibility::InnovationFriendly,
            stakeholder: "Private Investor / Developer".to_string(),
            ..baseline_scenario()
        };
        let recommendations = generate_recommendations(&scenario, &assess_scenario(&scenario));
        let names = titles(&recommendations);
        assert!(names.contains(&"Renewable Charging Strategy"));
        assert!(names.contains(&"Advanced PPP Framework"));
        assert!(names.contains(&"Investment Readiness Assessment"));
        assert!(!names.contains(&"Policy Coordination Framework"));

        let climate = recommendations
            .iter()
            .find(|action| action.title == "Renewable Charging Strategy")
            .expect("climate action should be present");
        assert_eq!(climate.priority, ActionPriority::High);
        assert_eq!(climate.kpi.as_deref(), Some("Achieve 50% renewable charging by 2030"));
    }

    #[test]
    fn utility_stakeholder_matches_on_reg() {
        let actions = stakeholder_actions("Rwanda Energy Group (REG)");
        assert_eq!(titles(&actions), vec!["Grid Modernization Plan"]);
        assert!(stakeholder_actions("Research Institution").is_empty());
    }
}
