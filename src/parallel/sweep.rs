//! Adoption-rate sensitivity sweep: one evaluation per rate, run in parallel.

use std::io;

use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::evaluator::{EvaluateError, GridRiskLevel, ScenarioEvaluator, ScenarioInput};
use crate::parallel::pool::WorkerPool;

/// Upper bound on generated grid size.
pub const MAX_SWEEP_POINTS: usize = 10_000;

#[derive(Debug, Error)]
pub enum SweepError {
    #[error("invalid sweep range {from}..={to} step {step}")]
    InvalidRange { from: f64, to: f64, step: f64 },
    #[error("sweep range {from}..={to} step {step} exceeds {max} points", max = MAX_SWEEP_POINTS)]
    TooManyPoints { from: f64, to: f64, step: f64 },
    #[error(transparent)]
    Evaluate(#[from] EvaluateError),
    #[error("failed to write sweep CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush sweep CSV: {0}")]
    Io(#[from] io::Error),
}

/// One row of a sweep. Flat so it writes directly as a CSV record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepPoint {
    pub ev_adoption_rate: f64,
    pub grid_risk_level: GridRiskLevel,
    pub estimated_cost_delta: f64,
    pub odds_ratio: f64,
    pub effectiveness_rank: u8,
}

/// Inclusive grid `from, from + step, ..., <= to`. A trailing point within float noise of
/// `to` is kept.
pub fn adoption_rates(from: f64, to: f64, step: f64) -> Result<Vec<f64>, SweepError> {
    let valid = from.is_finite() && to.is_finite() && step.is_finite() && step > 0.0 && to >= from;
    if !valid {
        return Err(SweepError::InvalidRange { from, to, step });
    }

    let intervals = ((to - from) / step + 1e-9).floor();
    if intervals >= MAX_SWEEP_POINTS as f64 {
        return Err(SweepError::TooManyPoints { from, to, step });
    }
    let count = intervals as usize + 1;
    Ok((0..count).map(|i| from + step * i as f64).collect())
}

/// Evaluate `base` at every rate. Output order follows `rates`.
pub fn sweep_adoption(
    evaluator: &ScenarioEvaluator<'_>,
    base: &ScenarioInput,
    rates: &[f64],
    pool: &WorkerPool,
) -> Result<Vec<SweepPoint>, EvaluateError> {
    debug!(points = rates.len(), workers = pool.workers, "starting adoption sweep");

    let run_one = |rate: &f64| {
        let input = ScenarioInput {
            ev_adoption_rate: *rate,
            ..*base
        };
        evaluator.evaluate(&input).map(|result| SweepPoint {
            ev_adoption_rate: *rate,
            grid_risk_level: result.grid_risk_level,
            estimated_cost_delta: result.estimated_cost_delta,
            odds_ratio: result.recommendation.odds_ratio,
            effectiveness_rank: result.recommendation.effectiveness_rank,
        })
    };

    pool.install(|| rates.par_iter().map(run_one).collect())
}

pub fn write_sweep_csv<W: io::Write>(writer: W, points: &[SweepPoint]) -> Result<(), SweepError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for point in points {
        csv_writer.serialize(point)?;
    }
    csv_writer.flush()?;
    Ok(())
}
