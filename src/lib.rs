//! Policy decision engine for Rwanda's electric-vehicle transition.
//!
//! [evaluator::ScenarioEvaluator] turns a compact policy scenario into a grid-risk
//! class, an energy cost delta and a stakeholder recommendation. The remaining modules
//! cover the wider dashboard: multi-factor assessment, grid impact, incentive finance and
//! adoption sweeps, exposed through [cli] and [server].

pub mod assessment;
pub mod cli;
pub mod config;
pub mod evaluator;
pub mod finance;
pub mod grid;
pub mod parallel;
pub mod research;
pub mod server;
pub mod telemetry;

pub use evaluator::{
    evaluate, EvaluateError, EvaluationResult, GridRiskLevel, ScenarioEvaluator, ScenarioInput,
};
