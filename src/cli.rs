use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::assessment::{
    assess_scenario, baseline_scenario, compare_scenarios, generate_recommendations,
    generate_roadmap, PolicyScenario,
};
use crate::config::{ConfigError, EngineConfig};
use crate::evaluator::{EvaluateError, ScenarioEvaluator, ScenarioRequest};
use crate::finance::{incentive_package, ppp_structure, FinanceError, IncentiveLever};
use crate::grid::calculate_grid_impact;
use crate::parallel::{adoption_rates, sweep_adoption, write_sweep_csv, SweepError, WorkerPool};
use crate::research::install_coefficients;
use crate::server::{self, ServerError};

const USAGE: &str =
    "usage: ev-policy-engine <serve|evaluate|assess|grid|sweep|compare|roadmap|incentives|ppp>";

#[derive(Debug, Parser)]
#[command(name = "ev-policy-engine", version, about = "Rwanda EV policy decision engine")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the JSON HTTP API.
    Serve,
    /// Evaluate one policy scenario: grid risk, cost delta, recommendation.
    Evaluate {
        #[command(flatten)]
        scenario: ScenarioArgs,
        #[arg(long, allow_hyphen_values = true)]
        rate: f64,
        /// Print a tab-separated row instead of JSON.
        #[arg(long)]
        table: bool,
    },
    /// Full assessment of a dashboard scenario with recommendations and grid impact.
    Assess {
        /// JSON or YAML scenario file; the national baseline when omitted.
        #[arg(long)]
        scenario: Option<PathBuf>,
    },
    /// Grid impact of a dashboard scenario.
    Grid {
        #[arg(long)]
        scenario: Option<PathBuf>,
    },
    /// Evaluate a scenario over a range of adoption rates.
    Sweep {
        #[command(flatten)]
        scenario: ScenarioArgs,
        #[arg(long, default_value_t = 0.0)]
        from: f64,
        #[arg(long, default_value_t = 20.0)]
        to: f64,
        #[arg(long, default_value_t = 0.5)]
        step: f64,
        /// Print CSV instead of JSON.
        #[arg(long)]
        csv: bool,
    },
    /// Compare a scenario against another one (the baseline by default).
    Compare {
        #[arg(long)]
        scenario: PathBuf,
        #[arg(long)]
        against: Option<PathBuf>,
    },
    /// Three-phase implementation roadmap.
    Roadmap {
        #[arg(long)]
        scenario: Option<PathBuf>,
        /// YYYY-MM-DD; today when omitted.
        #[arg(long)]
        start: Option<NaiveDate>,
    },
    /// Combined effect and unit cost of an incentive package.
    Incentives {
        #[arg(long = "lever", required = true)]
        levers: Vec<String>,
        #[arg(long, default_value_t = 20.0)]
        budget: f64,
    },
    /// Public/private split of a PPP project and the private side's required revenue.
    Ppp {
        #[arg(long, default_value_t = 50.0)]
        cost: f64,
        #[arg(long, default_value_t = 30.0)]
        public_share: f64,
        #[arg(long, default_value_t = 12.0)]
        roi: f64,
    },
}

#[derive(Debug, Clone, Args)]
pub struct ScenarioArgs {
    #[arg(long, allow_hyphen_values = true)]
    pub density: f64,
    #[arg(long)]
    pub incentive: String,
    #[arg(long)]
    pub stakeholder: String,
    #[arg(long)]
    pub profile: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub solar: Option<f64>,
}

impl ScenarioArgs {
    fn request(&self, rate: f64) -> ScenarioRequest {
        ScenarioRequest {
            ev_adoption_rate: rate,
            charger_density: self.density,
            incentive_type: self.incentive.clone(),
            stakeholder_perspective: self.stakeholder.clone(),
            charger_profile: self.profile.clone(),
            solar_share: self.solar,
        }
    }
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("unable to read scenario file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("unable to parse scenario file '{path}': {message}")]
    Scenario { path: String, message: String },
    #[error(transparent)]
    Evaluate(#[from] EvaluateError),
    #[error(transparent)]
    Finance(#[from] FinanceError),
    #[error(transparent)]
    Sweep(#[from] SweepError),
    #[error(transparent)]
    Server(#[from] ServerError),
    #[error("failed to serialize output: {0}")]
    Encode(#[from] serde_json::Error),
}

pub fn run_with_args(args: &[String]) -> i32 {
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) if err.use_stderr() => {
            let _ = err.print();
            eprintln!("{USAGE}");
            return 2;
        }
        Err(err) => {
            // --help and --version
            let _ = err.print();
            return 0;
        }
    };

    match run(cli.command) {
        Ok(()) => 0,
        Err(err) => {
            error!(error = %err, "command failed");
            eprintln!("error: {err}");
            1
        }
    }
}

fn run(command: Command) -> Result<(), CliError> {
    let config = EngineConfig::from_env()?;
    if config.coefficients_path.is_some() {
        install_coefficients(config.research_coefficients()?).map_err(ConfigError::from)?;
    }

    match command {
        Command::Serve => {
            server::run_server(config.bind, WorkerPool::with_workers(config.workers))?;
            Ok(())
        }
        Command::Evaluate {
            scenario,
            rate,
            table,
        } => {
            let input = scenario.request(rate).into_input()?;
            let result = ScenarioEvaluator::installed().evaluate(&input)?;
            if table {
                println!(
                    "ev_adoption_rate\tgrid_risk_level\testimated_cost_delta\teffectiveness_rank"
                );
                println!(
                    "{}\t{}\t{:.6}\t{}",
                    input.ev_adoption_rate,
                    result.grid_risk_level.as_str(),
                    result.estimated_cost_delta,
                    result.recommendation.effectiveness_rank
                );
                Ok(())
            } else {
                print_json(&result)
            }
        }
        Command::Assess { scenario } => {
            let scenario = scenario_or_baseline(scenario.as_deref())?;
            let assessment = assess_scenario(&scenario);
            let recommendations = generate_recommendations(&scenario, &assessment);
            print_json(&serde_json::json!({
                "assessment": assessment,
                "recommendations": recommendations,
                "grid_impact": calculate_grid_impact(&scenario),
            }))
        }
        Command::Grid { scenario } => {
            let scenario = scenario_or_baseline(scenario.as_deref())?;
            print_json(&calculate_grid_impact(&scenario))
        }
        Command::Sweep {
            scenario,
            from,
            to,
            step,
            csv,
        } => {
            let base = scenario.request(from).into_input()?;
            let rates = adoption_rates(from, to, step)?;
            let pool = WorkerPool::with_workers(config.workers);
            let points = sweep_adoption(&ScenarioEvaluator::installed(), &base, &rates, &pool)?;
            if csv {
                write_sweep_csv(io::stdout().lock(), &points)?;
                Ok(())
            } else {
                print_json(&points)
            }
        }
        Command::Compare { scenario, against } => {
            let scenario = read_scenario(&scenario)?;
            let against = scenario_or_baseline(against.as_deref())?;
            print_json(&compare_scenarios(&scenario, &against))
        }
        Command::Roadmap { scenario, start } => {
            let scenario = scenario_or_baseline(scenario.as_deref())?;
            let start = start.unwrap_or_else(|| Local::now().date_naive());
            print_json(&generate_roadmap(&scenario, start))
        }
        Command::Incentives { levers, budget } => {
            let levers = levers
                .iter()
                .map(|raw| raw.parse::<IncentiveLever>())
                .collect::<Result<Vec<_>, _>>()?;
            print_json(&incentive_package(&levers, budget)?)
        }
        Command::Ppp {
            cost,
            public_share,
            roi,
        } => print_json(&ppp_structure(cost, public_share, roi)?),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn scenario_or_baseline(path: Option<&Path>) -> Result<PolicyScenario, CliError> {
    match path {
        Some(path) => read_scenario(path),
        None => Ok(baseline_scenario()),
    }
}

/// `.yaml`/`.yml` files parse as YAML, anything else as JSON. Missing fields take baseline values.
fn read_scenario(path: &Path) -> Result<PolicyScenario, CliError> {
    let display = path.display().to_string();
    let raw = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: display.clone(),
        source,
    })?;
    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
    let parsed: Result<PolicyScenario, String> = if is_yaml {
        serde_yaml::from_str(&raw).map_err(|err| err.to_string())
    } else {
        serde_json::from_str(&raw).map_err(|err| err.to_string())
    };
    let scenario = parsed.map_err(|message| CliError::Scenario {
        path: display,
        message,
    })?;
    Ok(scenario.validated()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn parses_evaluate_flags() {
        let cli = Cli::try_parse_from(args(&[
            "ev-policy-engine",
            "evaluate",
            "--rate",
            "1.0",
            "--density",
            "50",
            "--incentive",
            "subsidy",
            "--stakeholder",
            "policymaker",
            "--table",
        ]))
        .unwrap();
        match cli.command {
            Command::Evaluate {
                scenario,
                rate,
                table,
            } => {
                assert_eq!(rate, 1.0);
                assert!(table);
                assert_eq!(scenario.density, 50.0);
                assert_eq!(scenario.profile, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn negative_rate_reaches_validation() {
        let cli = Cli::try_parse_from(args(&[
            "ev-policy-engine",
            "evaluate",
            "--rate",
            "-1",
            "--density",
            "50",
            "--incentive",
            "none",
            "--stakeholder",
            "utility",
        ]))
        .unwrap();
        let Command::Evaluate { scenario, rate, .. } = cli.command else {
            panic!("expected evaluate");
        };
        let err = scenario.request(rate).into_input().unwrap_err();
        assert_eq!(err.issues()[0].field, "ev_adoption_rate");
    }

    #[test]
    fn unknown_subcommand_is_usage_error() {
        assert_eq!(run_with_args(&args(&["ev-policy-engine", "launch"])), 2);
        assert_eq!(run_with_args(&args(&["ev-policy-engine"])), 2);
    }

    #[test]
    fn ppp_defaults_match_dashboard_inputs() {
        let cli = Cli::try_parse_from(args(&["ev-policy-engine", "ppp"])).unwrap();
        let Command::Ppp {
            cost,
            public_share,
            roi,
        } = cli.command
        else {
            panic!("expected ppp");
        };
        assert_eq!((cost, public_share, roi), (50.0, 30.0, 12.0));
    }

    #[test]
    fn roadmap_start_parses_as_date() {
        let cli =
            Cli::try_parse_from(args(&["ev-policy-engine", "roadmap", "--start", "2025-01-01"]))
                .unwrap();
        let Command::Roadmap { start, .. } = cli.command else {
            panic!("expected roadmap");
        };
        assert_eq!(start, NaiveDate::from_ymd_opt(2025, 1, 1));
    }
}
