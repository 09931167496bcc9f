//! Fixed (stakeholder, incentive) -> advice table.

use serde::Serialize;

use crate::evaluator::input::{IncentiveType, StakeholderPerspective};
use crate::research::ResearchCoefficients;

/// Odds ratio of adoption with no incentive in place (the reference category).
pub const NO_INCENTIVE_ODDS_RATIO: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationTag {
    ScaleSubsidies,
    ExtendTaxExemptions,
    IntroduceIncentives,
    PlanGridReinforcement,
    ShiftLoadOffPeak,
    CoInvestInCharging,
    StageInvestment,
    MeasureIncentiveUptake,
    StudyAdoptionBarriers,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub tag: RecommendationTag,
    pub incentive: IncentiveType,
    pub odds_ratio: f64,
    /// 1 = least effective incentive option; higher ranks have larger odds ratios.
    pub effectiveness_rank: u8,
    pub advice: String,
}

pub fn incentive_odds_ratio(incentive: IncentiveType, coefficients: &ResearchCoefficients) -> f64 {
    match incentive {
        IncentiveType::Subsidy => coefficients.incentives.financial_subsidies,
        IncentiveType::TaxExemption => coefficients.incentives.tax_exemptions,
        IncentiveType::None => NO_INCENTIVE_ODDS_RATIO,
    }
}

/// Position of `incentive` when the closed set of incentive options is ordered by odds ratio.
pub fn effectiveness_rank(incentive: IncentiveType, coefficients: &ResearchCoefficients) -> u8 {
    let own = incentive_odds_ratio(incentive, coefficients);
    let weaker = IncentiveType::ALL
        .iter()
        .filter(|other| incentive_odds_ratio(**other, coefficients) < own)
        .count();
    1 + weaker as u8
}

pub fn recommend(
    stakeholder: StakeholderPerspective,
    incentive: IncentiveType,
    coefficients: &ResearchCoefficients,
) -> Recommendation {
    let or = incentive_odds_ratio(incentive, coefficients);
    let subsidy_or = coefficients.incentives.financial_subsidies;
    let barriers = &coefficients.barriers;

    use IncentiveType as I;
    use RecommendationTag as T;
    use StakeholderPerspective as S;

    let (tag, advice) = match (stakeholder, incentive) {
        (S::Policymaker, I::Subsidy) => (
            T::ScaleSubsidies,
            format!(
                "Scale purchase subsidies: subsidy effectiveness (OR {or:.2}) is the strongest adoption lever measured."
            ),
        ),
        (S::Policymaker, I::TaxExemption) => (
            T::ExtendTaxExemptions,
            format!(
                "Extend tax exemptions (OR {or:.2}) and phase in purchase subsidies (OR {subsidy_or:.2}) for a larger effect."
            ),
        ),
        (S::Policymaker, I::None) => (
            T::IntroduceIncentives,
            format!(
                "No incentive in place (OR {or:.2}); introduce purchase subsidies (OR {subsidy_or:.2}) to address high initial cost (barrier OR {:.2}).",
                barriers.high_initial_cost
            ),
        ),
        (S::Utility, I::Subsidy) => (
            T::PlanGridReinforcement,
            format!(
                "Subsidy-driven uptake (OR {or:.2}) will lift night charging peaks; reinforce feeders and site DG near critical substations."
            ),
        ),
        (S::Utility, I::TaxExemption) => (
            T::PlanGridReinforcement,
            format!(
                "Tax exemption uptake (OR {or:.2}) grows charging load steadily; schedule transformer upgrades ahead of demand."
            ),
        ),
        (S::Utility, I::None) => (
            T::ShiftLoadOffPeak,
            format!(
                "Organic adoption only (OR {or:.2}); use time-of-use tariffs to keep new charging load off-peak."
            ),
        ),
        (S::Investor, I::Subsidy) => (
            T::CoInvestInCharging,
            format!(
                "Subsidy effectiveness (OR {or:.2}) de-risks charging demand; co-invest in public charging through PPP structures."
            ),
        ),
        (S::Investor, I::TaxExemption) => (
            T::CoInvestInCharging,
            format!(
                "Tax exemptions (OR {or:.2}) lower vehicle cost; expected demand supports charging co-investment."
            ),
        ),
        (S::Investor, I::None) => (
            T::StageInvestment,
            format!(
                "No incentive in place (OR {or:.2}); limited charging (barrier OR {:.2}) caps demand, so stage investment behind policy signals.",
                barriers.limited_charging
            ),
        ),
        (S::Researcher, I::Subsidy) => (
            T::MeasureIncentiveUptake,
            format!(
                "Track realised uptake against the subsidy effectiveness estimate (OR {or:.2})."
            ),
        ),
        (S::Researcher, I::TaxExemption) => (
            T::MeasureIncentiveUptake,
            format!(
                "Track realised uptake against the tax exemption effect estimate (OR {or:.2})."
            ),
        ),
        (S::Researcher, I::None) => (
            T::StudyAdoptionBarriers,
            format!(
                "Quantify adoption barriers: high initial cost (OR {:.2}), limited charging (OR {:.2}), low awareness (OR {:.2}).",
                barriers.high_initial_cost, barriers.limited_charging, barriers.low_awareness
            ),
        ),
    };

    Recommendation {
        tag,
        incentive,
        odds_ratio: or,
        effectiveness_rank: effectiveness_rank(incentive, coefficients),
        advice,
    }
}
