use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::assessment::{
    assess_scenario, baseline_scenario, compare_scenarios, generate_recommendations,
    generate_roadmap, PolicyAction, PolicyScenario, RoadmapPhase, ScenarioAssessment,
    ScenarioComparison,
};
use crate::evaluator::{
    EvaluateError, EvaluationResult, InputIssue, ScenarioEvaluator, ScenarioInput,
    ScenarioRequest,
};
use crate::finance::{
    incentive_package, ppp_structure, public_investment_roi, FinanceError, IncentiveLever,
    IncentivePackage, InvestmentLeverage, PppStructure,
};
use crate::grid::{calculate_grid_impact, GridImpact};
use crate::parallel::{adoption_rates, sweep_adoption, SweepError, SweepPoint, WorkerPool};
use crate::research::{coefficients, RWANDA_CONTEXT};

pub const DEFAULT_INCENTIVE_BUDGET_MUSD: f64 = 20.0;
pub const DEFAULT_SWEEP_FROM: f64 = 0.0;
pub const DEFAULT_SWEEP_TO: f64 = 20.0;
pub const DEFAULT_SWEEP_STEP: f64 = 0.5;

#[derive(Debug, Clone, Serialize)]
pub struct ValidationIssue {
    pub field: &'static str,
    pub messages: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationErrorResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub errors: Vec<ValidationIssue>,
}

impl ValidationErrorResponse {
    /// Group issues by field, keeping the order fields were first reported in.
    pub fn from_issues(issues: &[InputIssue]) -> Self {
        let mut errors: Vec<ValidationIssue> = Vec::new();
        for issue in issues {
            match errors.iter_mut().find(|entry| entry.field == issue.field) {
                Some(entry) => entry.messages.push(issue.message.clone()),
                None => errors.push(ValidationIssue {
                    field: issue.field,
                    messages: vec![issue.message.clone()],
                }),
            }
        }
        Self {
            status: "error",
            message: "Validation failed",
            errors,
        }
    }
}

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("{0}")]
    Parse(serde_json::Error),
    #[error("invalid request")]
    Validation(ValidationErrorResponse),
    #[error("failed to encode response: {0}")]
    Encode(serde_json::Error),
}

impl From<EvaluateError> for PayloadError {
    fn from(err: EvaluateError) -> Self {
        Self::Validation(ValidationErrorResponse::from_issues(err.issues()))
    }
}

impl From<FinanceError> for PayloadError {
    fn from(err: FinanceError) -> Self {
        let field = match &err {
            FinanceError::InvalidAmount { field, .. }
            | FinanceError::InvalidPercentage { field, .. } => *field,
            FinanceError::UnknownLever(_) => "levers",
        };
        invalid(field, err.to_string())
    }
}

fn invalid(field: &'static str, message: String) -> PayloadError {
    PayloadError::Validation(ValidationErrorResponse::from_issues(&[InputIssue {
        field,
        message,
    }]))
}

fn parse<'de, T: Deserialize<'de>>(body: &'de str) -> Result<T, PayloadError> {
    serde_json::from_str(body).map_err(PayloadError::Parse)
}

fn encode<T: Serialize>(value: &T) -> Result<String, PayloadError> {
    serde_json::to_string_pretty(value).map_err(PayloadError::Encode)
}

pub fn health_payload() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&serde_json::json!({
        "status": "ok",
        "service": "ev-policy-engine",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub fn coefficients_payload() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(coefficients())
}

pub fn context_payload() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&serde_json::json!({
        "context": RWANDA_CONTEXT,
        "progress_to_2030": RWANDA_CONTEXT.progress_to_2030(),
    }))
}

pub fn baseline_payload() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&baseline_scenario())
}

#[derive(Debug, Serialize)]
pub struct EvaluateResponse {
    pub status: &'static str,
    pub input: ScenarioInput,
    pub result: EvaluationResult,
}

pub fn evaluate_payload(body: &str) -> Result<String, PayloadError> {
    let request: ScenarioRequest = parse(body)?;
    let input = request.into_input()?;
    let result = ScenarioEvaluator::installed().evaluate(&input)?;
    encode(&EvaluateResponse {
        status: "ok",
        input,
        result,
    })
}

#[derive(Debug, Serialize)]
pub struct AssessResponse {
    pub status: &'static str,
    pub scenario: PolicyScenario,
    pub assessment: ScenarioAssessment,
    pub recommendations: Vec<PolicyAction>,
    pub grid_impact: GridImpact,
}

pub fn assess_payload(body: &str) -> Result<String, PayloadError> {
    let scenario = parse::<PolicyScenario>(body)?.validated()?;
    let assessment = assess_scenario(&scenario);
    let recommendations = generate_recommendations(&scenario, &assessment);
    let grid_impact = calculate_grid_impact(&scenario);
    encode(&AssessResponse {
        status: "ok",
        scenario,
        assessment,
        recommendations,
        grid_impact,
    })
}

pub fn grid_impact_payload(body: &str) -> Result<String, PayloadError> {
    let scenario = parse::<PolicyScenario>(body)?.validated()?;
    encode(&calculate_grid_impact(&scenario))
}

#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    pub scenario: PolicyScenario,
    /// Baseline scenario when absent.
    #[serde(default)]
    pub against: Option<PolicyScenario>,
}

pub fn compare_payload(body: &str) -> Result<String, PayloadError> {
    let request: CompareRequest = parse(body)?;
    let scenario = request.scenario.validated()?;
    let against = request.against.unwrap_or_else(baseline_scenario).validated()?;
    let comparison: ScenarioComparison = compare_scenarios(&scenario, &against);
    encode(&comparison)
}

#[derive(Debug, Deserialize)]
pub struct RoadmapRequest {
    #[serde(default)]
    pub scenario: PolicyScenario,
    /// Today in local time when absent.
    #[serde(default)]
    pub start: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct RoadmapResponse {
    pub status: &'static str,
    pub start: NaiveDate,
    pub phases: Vec<RoadmapPhase>,
}

pub fn roadmap_payload(body: &str) -> Result<String, PayloadError> {
    let request: RoadmapRequest = parse(body)?;
    let scenario = request.scenario.validated()?;
    let start = request.start.unwrap_or_else(|| Local::now().date_naive());
    encode(&RoadmapResponse {
        status: "ok",
        start,
        phases: generate_roadmap(&scenario, start),
    })
}

#[derive(Debug, Deserialize)]
pub struct InvestmentRequest {
    pub public_musd: f64,
    pub private_leverage: f64,
    pub jobs_per_musd: f64,
}

#[derive(Debug, Deserialize)]
pub struct IncentivesRequest {
    #[serde(default)]
    pub levers: Vec<String>,
    #[serde(default)]
    pub budget_musd: Option<f64>,
    #[serde(default)]
    pub investment: Option<InvestmentRequest>,
}

#[derive(Debug, Serialize)]
pub struct IncentivesResponse {
    pub status: &'static str,
    pub package: IncentivePackage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub investment: Option<InvestmentLeverage>,
}

pub fn incentives_payload(body: &str) -> Result<String, PayloadError> {
    let request: IncentivesRequest = parse(body)?;

    let mut issues = Vec::new();
    let mut levers = Vec::with_capacity(request.levers.len());
    for raw in &request.levers {
        match raw.parse::<IncentiveLever>() {
            Ok(lever) => levers.push(lever),
            Err(err) => issues.push(InputIssue {
                field: "levers",
                message: err.to_string(),
            }),
        }
    }
    if !issues.is_empty() {
        return Err(PayloadError::Validation(ValidationErrorResponse::from_issues(
            &issues,
        )));
    }

    let package = incentive_package(
        &levers,
        request.budget_musd.unwrap_or(DEFAULT_INCENTIVE_BUDGET_MUSD),
    )?;
    let investment = request
        .investment
        .map(|inv| public_investment_roi(inv.public_musd, inv.private_leverage, inv.jobs_per_musd))
        .transpose()?;

    encode(&IncentivesResponse {
        status: "ok",
        package,
        investment,
    })
}

#[derive(Debug, Deserialize)]
pub struct PppRequest {
    pub project_cost_musd: f64,
    pub public_share_pct: f64,
    pub expected_roi_pct: f64,
}

#[derive(Debug, Serialize)]
pub struct PppResponse {
    pub status: &'static str,
    pub structure: PppStructure,
}

pub fn ppp_payload(body: &str) -> Result<String, PayloadError> {
    let request: PppRequest = parse(body)?;
    let structure = ppp_structure(
        request.project_cost_musd,
        request.public_share_pct,
        request.expected_roi_pct,
    )?;
    encode(&PppResponse {
        status: "ok",
        structure,
    })
}

#[derive(Debug, Deserialize)]
pub struct SweepRequest {
    pub scenario: ScenarioRequest,
    #[serde(default)]
    pub from: Option<f64>,
    #[serde(default)]
    pub to: Option<f64>,
    #[serde(default)]
    pub step: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct SweepResponse {
    pub status: &'static str,
    pub points: Vec<SweepPoint>,
}

pub fn sweep_payload(body: &str, pool: &WorkerPool) -> Result<String, PayloadError> {
    let request: SweepRequest = parse(body)?;
    let base = request.scenario.into_input()?;
    let rates = adoption_rates(
        request.from.unwrap_or(DEFAULT_SWEEP_FROM),
        request.to.unwrap_or(DEFAULT_SWEEP_TO),
        request.step.unwrap_or(DEFAULT_SWEEP_STEP),
    )
    .map_err(|err: SweepError| invalid("range", err.to_string()))?;
    let points = sweep_adoption(&ScenarioEvaluator::installed(), &base, &rates, pool)?;
    encode(&SweepResponse {
        status: "ok",
        points,
    })
}
