//! Incentive package builder, public investment leverage and PPP financing split.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::evaluator::input::normalize_token;
use crate::research::{coefficients, ResearchCoefficients};

/// Additional EVs attributed to one unit of combined odds ratio.
pub const EVS_PER_EFFECTIVENESS_UNIT: f64 = 5000.0;

#[derive(Debug, Error, PartialEq)]
pub enum FinanceError {
    #[error("{field} must be a finite, non-negative number (got {value})")]
    InvalidAmount { field: &'static str, value: f64 },
    #[error("{field} must be a percentage between 0 and 100 (got {value})")]
    InvalidPercentage { field: &'static str, value: f64 },
    #[error("unknown incentive lever '{0}'")]
    UnknownLever(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncentiveLever {
    FinancialSubsidies,
    TaxExemptions,
    ChargingInfrastructure,
    PublicAwareness,
    MaintenanceTraining,
    PriorityLanes,
}

impl IncentiveLever {
    pub const ALL: [IncentiveLever; 6] = [
        Self::FinancialSubsidies,
        Self::TaxExemptions,
        Self::ChargingInfrastructure,
        Self::PublicAwareness,
        Self::MaintenanceTraining,
        Self::PriorityLanes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FinancialSubsidies => "financial_subsidies",
            Self::TaxExemptions => "tax_exemptions",
            Self::ChargingInfrastructure => "charging_infrastructure",
            Self::PublicAwareness => "public_awareness",
            Self::MaintenanceTraining => "maintenance_training",
            Self::PriorityLanes => "priority_lanes",
        }
    }

    pub fn odds_ratio(&self, coefficients: &ResearchCoefficients) -> f64 {
        let ors = &coefficients.incentives;
        match self {
            Self::FinancialSubsidies => ors.financial_subsidies,
            Self::TaxExemptions => ors.tax_exemptions,
            Self::ChargingInfrastructure => ors.charging_infrastructure,
            Self::PublicAwareness => ors.public_awareness,
            Self::MaintenanceTraining => ors.maintenance_training,
            Self::PriorityLanes => ors.priority_lanes,
        }
    }
}

impl fmt::Display for IncentiveLever {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IncentiveLever {
    type Err = FinanceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let token = normalize_token(value);
        Self::ALL
            .into_iter()
            .find(|lever| normalize_token(lever.as_str()) == token)
            .ok_or_else(|| FinanceError::UnknownLever(value.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncentivePackage {
    pub levers: Vec<IncentiveLever>,
    pub budget_musd: f64,
    /// Sum of the selected levers' odds ratios.
    pub combined_effectiveness: f64,
    pub estimated_additional_evs: u64,
    /// Absent when the package is empty.
    pub cost_per_additional_ev_usd: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvestmentLeverage {
    pub public_musd: f64,
    pub private_leverage: f64,
    pub total_mobilized_musd: f64,
    pub direct_jobs: u64,
}

/// Public/private split of a PPP project and the revenue the private side needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PppStructure {
    pub project_cost_musd: f64,
    pub public_share_pct: f64,
    pub expected_roi_pct: f64,
    pub public_investment_musd: f64,
    pub private_investment_musd: f64,
    pub required_annual_revenue_musd: f64,
}

fn check_percentage(field: &'static str, value: f64) -> Result<f64, FinanceError> {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Ok(value)
    } else {
        Err(FinanceError::InvalidPercentage { field, value })
    }
}

fn check_amount(field: &'static str, value: f64) -> Result<f64, FinanceError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(FinanceError::InvalidAmount { field, value })
    }
}

/// Combined effect of a set of levers; repeated levers count once.
pub fn incentive_package_with(
    levers: &[IncentiveLever],
    budget_musd: f64,
    coefficients: &ResearchCoefficients,
) -> Result<IncentivePackage, FinanceError> {
    let budget_musd = check_amount("budget_musd", budget_musd)?;

    let mut selected = levers.to_vec();
    selected.sort();
    selected.dedup();

    let combined_effectiveness: f64 = selected
        .iter()
        .map(|lever| lever.odds_ratio(coefficients))
        .sum();
    let estimated_additional_evs =
        (combined_effectiveness * EVS_PER_EFFECTIVENESS_UNIT).floor() as u64;
    let cost_per_additional_ev_usd = (estimated_additional_evs > 0)
        .then(|| budget_musd * 1e6 / estimated_additional_evs as f64);

    Ok(IncentivePackage {
        levers: selected,
        budget_musd,
        combined_effectiveness,
        estimated_additional_evs,
        cost_per_additional_ev_usd,
    })
}

pub fn incentive_package(
    levers: &[IncentiveLever],
    budget_musd: f64,
) -> Result<IncentivePackage, FinanceError> {
    incentive_package_with(levers, budget_musd, coefficients())
}

/// Private capital mobilized and jobs created by a public investment.
pub fn public_investment_roi(
    public_musd: f64,
    private_leverage: f64,
    jobs_per_musd: f64,
) -> Result<InvestmentLeverage, FinanceError> {
    let public_musd = check_amount("public_musd", public_musd)?;
    let private_leverage = check_amount("private_leverage", private_leverage)?;
    let jobs_per_musd = check_amount("jobs_per_musd", jobs_per_musd)?;

    Ok(InvestmentLeverage {
        public_musd,
        private_leverage,
        total_mobilized_musd: public_musd * (1.0 + private_leverage),
        direct_jobs: (public_musd * jobs_per_musd).floor() as u64,
    })
}

pub fn ppp_structure(
    project_cost_musd: f64,
    public_share_pct: f64,
    expected_roi_pct: f64,
) -> Result<PppStructure, FinanceError> {
    let project_cost_musd = check_amount("project_cost_musd", project_cost_musd)?;
    let public_share_pct = check_percentage("public_share_pct", public_share_pct)?;
    let expected_roi_pct = check_percentage("expected_roi_pct", expected_roi_pct)?;

    let public_investment_musd = project_cost_musd * public_share_pct / 100.0;
    let private_investment_musd = project_cost_musd - public_investment_musd;

    Ok(PppStructure {
        project_cost_musd,
        public_share_pct,
        expected_roi_pct,
        public_investment_musd,
        private_investment_musd,
        required_annual_revenue_musd: private_investment_musd * expected_roi_pct / 100.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_package_of_subsidies_and_tax_exemptions() {
        let package = incentive_package_with(
            &[IncentiveLever::TaxExemptions, IncentiveLever::FinancialSubsidies],
            20.0,
            &ResearchCoefficients::default(),
        )
        .unwrap();
        assert!((package.combined_effectiveness - 5.8).abs() < 1e-9);
        assert_eq!(package.estimated_additional_evs, 29_000);
        let cost = package.cost_per_additional_ev_usd.unwrap();
        assert!((cost - 689.655).abs() < 1e-3, "{cost}");
        assert_eq!(
            package.levers,
            vec![IncentiveLever::FinancialSubsidies, IncentiveLever::TaxExemptions]
        );
    }

    #[test]
    fn duplicate_levers_count_once() {
        let c = ResearchCoefficients::default();
        let once = incentive_package_with(&[IncentiveLever::PriorityLanes], 5.0, &c).unwrap();
        let twice = incentive_package_with(
            &[IncentiveLever::PriorityLanes, IncentiveLever::PriorityLanes],
            5.0,
            &c,
        )
        .unwrap();
        assert_eq!(once, twice);
        assert_eq!(once.estimated_additional_evs, 7_250);
    }

    #[test]
    fn empty_package_has_no_unit_cost() {
        let package =
            incentive_package_with(&[], 10.0, &ResearchCoefficients::default()).unwrap();
        assert_eq!(package.estimated_additional_evs, 0);
        assert_eq!(package.cost_per_additional_ev_usd, None);
    }

    #[test]
    fn negative_budget_is_rejected() {
        let err = incentive_package_with(&[], -1.0, &ResearchCoefficients::default()).unwrap_err();
        assert_eq!(
            err,
            FinanceError::InvalidAmount {
                field: "budget_musd",
                value: -1.0
            }
        );
    }

    #[test]
    fn leverage_and_jobs() {
        let roi = public_investment_roi(100.0, 2.5, 20.0).unwrap();
        assert_eq!(roi.total_mobilized_musd, 350.0);
        assert_eq!(roi.direct_jobs, 2_000);
        assert!(public_investment_roi(f64::NAN, 2.5, 20.0).is_err());
    }

    #[test]
    fn ppp_splits_cost_and_prices_private_return() {
        let ppp = ppp_structure(50.0, 30.0, 12.0).unwrap();
        assert!((ppp.public_investment_musd - 15.0).abs() < 1e-9);
        assert!((ppp.private_investment_musd - 35.0).abs() < 1e-9);
        assert!((ppp.required_annual_revenue_musd - 4.2).abs() < 1e-9);

        let fully_public = ppp_structure(80.0, 100.0, 12.0).unwrap();
        assert_eq!(fully_public.private_investment_musd, 0.0);
        assert_eq!(fully_public.required_annual_revenue_musd, 0.0);
    }

    #[test]
    fn ppp_rejects_out_of_range_inputs() {
        assert_eq!(
            ppp_structure(50.0, 101.0, 12.0).unwrap_err(),
            FinanceError::InvalidPercentage {
                field: "public_share_pct",
                value: 101.0
            }
        );
        assert!(matches!(
            ppp_structure(-5.0, 30.0, 12.0),
            Err(FinanceError::InvalidAmount {
                field: "project_cost_musd",
                ..
            })
        ));
        assert!(matches!(
            ppp_structure(50.0, 30.0, f64::INFINITY),
            Err(FinanceError::InvalidPercentage {
                field: "expected_roi_pct",
                ..
            })
        ));
    }

    #[test]
    fn levers_parse_from_labels() {
        assert_eq!(
            "Financial Subsidies".parse::<IncentiveLever>(),
            Ok(IncentiveLever::FinancialSubsidies)
        );
        assert_eq!(
            "priority-lanes".parse::<IncentiveLever>(),
            Ok(IncentiveLever::PriorityLanes)
        );
        assert!("free parking".parse::<IncentiveLever>().is_err());
    }
}
