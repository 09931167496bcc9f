//! Scenario evaluator: policy parameters -> grid risk, cost delta, recommendation.
//!
//! Pure over its input and the research coefficient table. The only failure is
//! [EvaluateError::InvalidInput]; there is no partial result.

pub mod input;
pub mod recommendation;

use serde::Serialize;
use tracing::debug;

use crate::research::{coefficients, PenetrationThresholds, ResearchCoefficients};

pub use input::{
    ChargerProfile, EvaluateError, IncentiveType, InputIssue, ScenarioInput, ScenarioRequest,
    StakeholderPerspective, DEFAULT_SOLAR_SHARE,
};
pub use recommendation::{
    effectiveness_rank, incentive_odds_ratio, recommend, Recommendation, RecommendationTag,
    NO_INCENTIVE_ODDS_RATIO,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GridRiskLevel {
    Safe,
    Marginal,
    Unsafe,
}

impl GridRiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::Marginal => "marginal",
            Self::Unsafe => "unsafe",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationResult {
    pub grid_risk_level: GridRiskLevel,
    /// USD/kWh change against the baseline LCOE. Negative is a saving.
    pub estimated_cost_delta: f64,
    pub recommendation: Recommendation,
    pub thresholds: PenetrationThresholds,
}

#[derive(Debug, Clone, Copy)]
pub struct ScenarioEvaluator<'a> {
    coefficients: &'a ResearchCoefficients,
}

impl ScenarioEvaluator<'static> {
    /// Evaluator bound to the process-wide coefficient table.
    pub fn installed() -> Self {
        Self::new(coefficients())
    }
}

impl<'a> ScenarioEvaluator<'a> {
    pub fn new(coefficients: &'a ResearchCoefficients) -> Self {
        Self { coefficients }
    }

    pub fn coefficients(&self) -> &'a ResearchCoefficients {
        self.coefficients
    }

    pub fn evaluate(&self, input: &ScenarioInput) -> Result<EvaluationResult, EvaluateError> {
        let issues = input.validate();
        if !issues.is_empty() {
            return Err(EvaluateError::InvalidInput { issues });
        }

        let thresholds = self.thresholds_for(input.charger_profile);
        let grid_risk_level = classify_grid_risk(input.ev_adoption_rate, thresholds);
        let estimated_cost_delta = self.cost_delta(input.solar_share);
        let recommendation = recommend(
            input.stakeholder_perspective,
            input.incentive_type,
            self.coefficients,
        );

        debug!(
            ev_adoption_rate = input.ev_adoption_rate,
            incentive = %input.incentive_type,
            stakeholder = %input.stakeholder_perspective,
            risk = grid_risk_level.as_str(),
            "scenario evaluated"
        );

        Ok(EvaluationResult {
            grid_risk_level,
            estimated_cost_delta,
            recommendation,
            thresholds,
        })
    }

    pub fn thresholds_for(&self, profile: ChargerProfile) -> PenetrationThresholds {
        let table = &self.coefficients.penetration;
        match profile {
            ChargerProfile::Standard10kw => table.standard_10kw,
            ChargerProfile::Fast20kw => table.fast_20kw,
            ChargerProfile::V2g => table.v2g,
        }
    }

    fn cost_delta(&self, solar_share: f64) -> f64 {
        let lcoe = &self.coefficients.lcoe;
        -lcoe.baseline_lcoe_usd_per_kwh() * lcoe.reduction_factor * (solar_share / 100.0)
    }
}

/// Below the private-car threshold is safe; up to and including the bus/taxi threshold is
/// marginal; above it is unsafe.
pub fn classify_grid_risk(
    ev_adoption_rate: f64,
    thresholds: PenetrationThresholds,
) -> GridRiskLevel {
    if ev_adoption_rate < thresholds.private_car {
        GridRiskLevel::Safe
    } else if ev_adoption_rate <= thresholds.bus_taxi {
        GridRiskLevel::Marginal
    } else {
        GridRiskLevel::Unsafe
    }
}

/// Evaluate against the process-wide coefficient table.
pub fn evaluate(input: &ScenarioInput) -> Result<EvaluationResult, EvaluateError> {
    ScenarioEvaluator::installed().evaluate(input)
}
