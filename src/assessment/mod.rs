//! Multi-factor scenario assessment: infrastructure pressure, grid risk, financial viability,
//! social acceptance, urgency, and which area needs attention first.

pub mod compare;
pub mod recommendations;
pub mod roadmap;
pub mod scenario;

use serde::Serialize;

pub use compare::{compare_scenarios, ScenarioComparison};
pub use recommendations::{
    generate_recommendations, ActionCategory, ActionPriority, ImpactLevel, PolicyAction,
};
pub use roadmap::{generate_roadmap, RoadmapPhase};
pub use scenario::{
    baseline_scenario, ChargerMix, FleetSegment, InvestmentAppetite, PolicyPriority,
    PolicyScenario, RegulatoryFlexibility,
};

/// Five-step severity scale shared by infrastructure pressure and grid risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    MediumHigh,
    High,
    Critical,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::MediumHigh => "Medium-High",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FinancialViability {
    Poor,
    Moderate,
    Good,
    Excellent,
}

impl FinancialViability {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Poor => "Poor",
            Self::Moderate => "Moderate",
            Self::Good => "Good",
            Self::Excellent => "Excellent",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SocialAcceptance {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    LowPriority,
    MediumPriority,
    HighPriority,
    Urgent,
    Immediate,
}

impl Urgency {
    pub fn label(&self) -> &'static str {
        match self {
            Self::LowPriority => "Low Priority",
            Self::MediumPriority => "Medium Priority",
            Self::HighPriority => "High Priority",
            Self::Urgent => "Urgent",
            Self::Immediate => "Immediate",
        }
    }

    pub fn is_pressing(&self) -> bool {
        matches!(self, Self::Urgent | Self::Immediate)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityFocus {
    Infrastructure,
    Grid,
    Finance,
    Social,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioAssessment {
    pub infrastructure_pressure: Severity,
    pub infrastructure_score: f64,
    pub grid_risk: Severity,
    pub grid_score: f64,
    pub financial_viability: FinancialViability,
    pub financial_score: f64,
    pub social_acceptance: SocialAcceptance,
    pub social_score: f64,
    /// EVs per public charger, rounded to one decimal.
    pub ev_to_charger_ratio: f64,
    pub urgency: Urgency,
    pub priority_focus: PriorityFocus,
}

pub(crate) fn ev_to_charger(scenario: &PolicyScenario) -> f64 {
    f64::from(scenario.total_evs) / f64::from(scenario.public_chargers.max(1))
}

pub fn assess_scenario(scenario: &PolicyScenario) -> ScenarioAssessment {
    let ratio = ev_to_charger(scenario);
    let (infrastructure_pressure, infrastructure_score) = infrastructure_pressure(ratio);
    let grid_score = grid_score(scenario);
    let financial_score =
        (scenario.investment_appetite.score() + scenario.regulatory_flexibility.score()) / 2.0;
    let social_score = social_score(scenario);

    ScenarioAssessment {
        infrastructure_pressure,
        infrastructure_score,
        grid_risk: grid_risk_band(grid_score),
        grid_score,
        financial_viability: financial_band(financial_score),
        financial_score,
        social_acceptance: social_band(social_score),
        social_score,
        ev_to_charger_ratio: (ratio * 10.0).round() / 10.0,
        urgency: urgency(infrastructure_score, grid_score),
        priority_focus: priority_focus(scenario, ratio),
    }
}

fn infrastructure_pressure(ratio: f64) -> (Severity, f64) {
    if ratio > 200.0 {
        (Severity::Critical, 1.0)
    } else if ratio > 150.0 {
        (Severity::High, 0.8)
    } else if ratio > 100.0 {
        (Severity::MediumHigh, 0.6)
    } else if ratio > 50.0 {
        (Severity::Medium, 0.4)
    } else {
        (Severity::Low, 0.2)
    }
}

fn grid_score(scenario: &PolicyScenario) -> f64 {
    let peak = scenario.peak_charging_share;
    let mut score = if peak > 70.0 {
        0.4
    } else if peak > 50.0 {
        0.3
    } else if peak > 30.0 {
        0.2
    } else {
        0.1
    };

    score += match scenario.charger_mix {
        ChargerMix::TwentyKwFocus => 0.2,
        ChargerMix::FastChargeHeavy => 0.3,
        ChargerMix::TenKwFocus | ChargerMix::Balanced => 0.0,
    };

    // V2G and solar both relieve the evening peak.
    score -= scenario.v2g_adoption / 100.0 * 0.2;
    score -= scenario.solar_integration / 100.0 * 0.15;
    score
}

fn grid_risk_band(score: f64) -> Severity {
    if score > 0.6 {
        Severity::Critical
    } else if score > 0.45 {
        Severity::High
    } else if score > 0.3 {
        Severity::MediumHigh
    } else if score > 0.15 {
        Severity::Medium
    } else {
        Severity::Low
    }
}

fn financial_band(score: f64) -> FinancialViability {
    if score > 0.7 {
        FinancialViability::Excellent
    } else if score > 0.5 {
        FinancialViability::Good
    } else if score > 0.3 {
        FinancialViability::Moderate
    } else {
        FinancialViability::Poor
    }
}

fn social_score(scenario: &PolicyScenario) -> f64 {
    // Two-wheelers are familiar technology, so a larger share eases acceptance.
    let familiarity = if scenario.two_wheeler_share > 60.0 {
        0.2
    } else if scenario.two_wheeler_share > 40.0 {
        0.1
    } else {
        0.0
    };
    0.5 + familiarity + scenario.solar_integration / 100.0 * 0.15
}

fn social_band(score: f64) -> SocialAcceptance {
    if score > 0.7 {
        SocialAcceptance::High
    } else if score > 0.5 {
        SocialAcceptance::Medium
    } else {
        SocialAcceptance::Low
    }
}

fn urgency(infrastructure_score: f64, grid_score: f64) -> Urgency {
    let worst = infrastructure_score.max(grid_score);
    if worst > 0.8 {
        Urgency::Immediate
    } else if worst > 0.6 {
        Urgency::Urgent
    } else if worst > 0.4 {
        Urgency::HighPriority
    } else if worst > 0.2 {
        Urgency::MediumPriority
    } else {
        Urgency::LowPriority
    }
}

/// Area with the highest pressure score. Ties go to the earlier area.
fn priority_focus(scenario: &PolicyScenario, ratio: f64) -> PriorityFocus {
    let finance = match scenario.investment_appetite {
        InvestmentAppetite::Conservative | InvestmentAppetite::Moderate => 0.5,
        InvestmentAppetite::Aggressive | InvestmentAppetite::Transformative => 0.8,
    };
    let candidates = [
        (PriorityFocus::Infrastructure, ratio / 200.0),
        (PriorityFocus::Grid, scenario.peak_charging_share / 100.0),
        (PriorityFocus::Finance, finance),
        // Fewer two-wheelers means a larger social barrier.
        (PriorityFocus::Social, (100.0 - scenario.two_wheeler_share) / 100.0),
    ];

    let mut best = candidates[0];
    for candidate in &candidates[1..] {
        if candidate.1 > best.1 {
            best = *candidate;
        }
    }
    best.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_assessment_matches_reference_bands() {
        let assessment = assess_scenario(&baseline_scenario());
        assert_eq!(assessment.ev_to_charger_ratio, 80.1);
        assert_eq!(assessment.infrastructure_pressure, Severity::Medium);
        assert!((assessment.grid_score - 0.1675).abs() < 1e-9);
        assert_eq!(assessment.grid_risk, Severity::Medium);
        assert_eq!(assessment.financial_viability, FinancialViability::Moderate);
        assert!((assessment.social_score - 0.6225).abs() < 1e-9);
        assert_eq!(assessment.social_acceptance, SocialAcceptance::Medium);
        assert_eq!(assessment.urgency, Urgency::MediumPriority);
        assert_eq!(assessment.priority_focus, PriorityFocus::Grid);
    }

    #[test]
    fn overloaded_network_is_critical_and_immediate() {
        let scenario = PolicyScenario {
            total_evs: 60_000,
            public_chargers: 200,
            peak_charging_share: 80.0,
            charger_mix: ChargerMix::FastChargeHeavy,
            v2g_adoption: 0.0,
            solar_integration: 0.0,
            ..baseline_scenario()
        };
        let assessment = assess_scenario(&scenario);
        assert_eq!(assessment.infrastructure_pressure, Severity::Critical);
        assert_eq!(assessment.grid_risk, Severity::Critical);
        assert_eq!(assessment.urgency, Urgency::Immediate);
        assert_eq!(assessment.priority_focus, PriorityFocus::Infrastructure);
    }

    #[test]
    fn zero_chargers_are_treated_as_one() {
        let scenario = PolicyScenario {
            total_evs: 40,
            public_chargers: 0,
            ..baseline_scenario()
        };
        assert_eq!(assess_scenario(&scenario).ev_to_charger_ratio, 40.0);
    }

    #[test]
    fn financial_score_averages_appetite_and_regulation() {
        let scenario = PolicyScenario {
            investment_appetite: InvestmentAppetite::Transformative,
            regulatory_flexibility: RegulatoryFlexibility::SandboxApproach,
            ..baseline_scenario()
        };
        let assessment = assess_scenario(&scenario);
        assert!((assessment.financial_score - 0.9).abs() < 1e-12);
        assert_eq!(assessment.financial_viability, FinancialViability::Excellent);
    }

    #[test]
    fn tied_focus_scores_resolve_to_the_earlier_area() {
        let scenario = PolicyScenario {
            total_evs: 10_000,
            public_chargers: 100,
            peak_charging_share: 50.0,
            two_wheeler_share: 50.0,
            investment_appetite: InvestmentAppetite::Moderate,
            ..baseline_scenario()
        };
        assert_eq!(assess_scenario(&scenario).priority_focus, PriorityFocus::Infrastructure);
    }
}
