//! Full dashboard scenario and its option sets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::evaluator::input::{normalize_token, EvaluateError, InputIssue};

/// Option set whose wire form is the human label; parsing ignores case and separators.
macro_rules! labelled_options {
    ($(#[$meta:meta])* $name:ident, $what:literal { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "&'static str")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            pub fn label(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl From<$name> for &'static str {
            fn from(value: $name) -> Self {
                value.label()
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                let token = normalize_token(value);
                Self::ALL
                    .iter()
                    .copied()
                    .find(|option| normalize_token(option.label()) == token)
                    .ok_or_else(|| format!("unknown {} '{}'", $what, value))
            }
        }

        impl TryFrom<String> for $name {
            type Error = String;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }
    };
}

labelled_options!(PolicyPriority, "policy priority" {
    BalancedGrowth => "Balanced Growth",
    InfrastructureAccessEquity => "Infrastructure Access & Equity",
    GridStabilityResilience => "Grid Stability & Resilience",
    PrivateInvestmentAttraction => "Private Investment Attraction",
    ClimateImpactMaximization => "Climate Impact Maximization",
    UrbanAirQuality => "Urban Air Quality",
    EnergySecurity => "Energy Security",
    JobCreationLocalIndustry => "Job Creation & Local Industry",
});

labelled_options!(
    /// Public investment appetite, ordered from most to least cautious.
    InvestmentAppetite, "investment appetite" {
    Conservative => "Conservative",
    Moderate => "Moderate",
    Aggressive => "Aggressive",
    Transformative => "Transformative",
});

labelled_options!(RegulatoryFlexibility, "regulatory flexibility" {
    Traditional => "Traditional",
    Adaptive => "Adaptive",
    InnovationFriendly => "Innovation-Friendly",
    SandboxApproach => "Sandbox Approach",
});

labelled_options!(
    /// Charger power mix. 10 kW suits e-motos, 20 kW and above suits cars and buses.
    ChargerMix, "charger mix" {
    TenKwFocus => "10kW Focus",
    Balanced => "Balanced",
    TwentyKwFocus => "20kW Focus",
    FastChargeHeavy => "Fast-Charge Heavy",
});

labelled_options!(FleetSegment, "fleet segment" {
    PrivateCars => "Private Cars",
    EMotos => "E-Motos",
    Buses => "Buses",
    Taxis => "Taxis",
    GovernmentFleets => "Government Fleets",
    GoodsDelivery => "Goods Delivery",
});

impl InvestmentAppetite {
    pub fn score(&self) -> f64 {
        match self {
            Self::Conservative => 0.2,
            Self::Moderate => 0.5,
            Self::Aggressive => 0.7,
            Self::Transformative => 0.9,
        }
    }
}

impl RegulatoryFlexibility {
    pub fn score(&self) -> f64 {
        match self {
            Self::Traditional => 0.2,
            Self::Adaptive => 0.5,
            Self::InnovationFriendly => 0.7,
            Self::SandboxApproach => 0.9,
        }
    }
}

pub const BASELINE_STAKEHOLDER: &str = "National Government / MININFRA";

/// Percentages are 0..=100. Missing fields in a request take the baseline value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyScenario {
    pub total_evs: u32,
    pub public_chargers: u32,
    /// Annual EV fleet growth, percent.
    pub ev_growth: f64,
    pub two_wheeler_share: f64,
    /// Share of charging that happens in the evening peak.
    pub peak_charging_share: f64,
    pub policy_priority: PolicyPriority,
    pub investment_appetite: InvestmentAppetite,
    pub regulatory_flexibility: RegulatoryFlexibility,
    /// Institution the recommendations are tailored for, e.g. "Rwanda Energy Group (REG)".
    pub stakeholder: String,
    #[serde(alias = "charger_types")]
    pub charger_mix: ChargerMix,
    pub solar_integration: f64,
    pub v2g_adoption: f64,
    /// Urban side of the urban/rural charging split.
    pub urban_share: f64,
    pub fleet_mix: Vec<FleetSegment>,
}

impl Default for PolicyScenario {
    fn default() -> Self {
        baseline_scenario()
    }
}

/// Rwanda's current policy baseline (2023 fleet and charger counts).
pub fn baseline_scenario() -> PolicyScenario {
    PolicyScenario {
        total_evs: 12_500,
        public_chargers: 156,
        ev_growth: 20.0,
        two_wheeler_share: 52.0,
        peak_charging_share: 50.0,
        policy_priority: PolicyPriority::BalancedGrowth,
        investment_appetite: InvestmentAppetite::Moderate,
        regulatory_flexibility: RegulatoryFlexibility::Adaptive,
        stakeholder: BASELINE_STAKEHOLDER.to_string(),
        charger_mix: ChargerMix::Balanced,
        solar_integration: 15.0,
        v2g_adoption: 5.0,
        urban_share: 70.0,
        fleet_mix: vec![FleetSegment::EMotos, FleetSegment::Taxis],
    }
}

impl PolicyScenario {
    pub fn validate(&self) -> Vec<InputIssue> {
        let mut issues = Vec::new();
        let percentages = [
            ("two_wheeler_share", self.two_wheeler_share),
            ("peak_charging_share", self.peak_charging_share),
            ("solar_integration", self.solar_integration),
            ("v2g_adoption", self.v2g_adoption),
            ("urban_share", self.urban_share),
        ];
        for (field, value) in percentages {
            if !value.is_finite() || !(0.0..=100.0).contains(&value) {
                issues.push(InputIssue {
                    field,
                    message: "must be between 0 and 100".to_string(),
                });
            }
        }
        if !self.ev_growth.is_finite() || self.ev_growth < 0.0 {
            issues.push(InputIssue {
                field: "ev_growth",
                message: "must be a finite, non-negative number".to_string(),
            });
        }
        issues
    }

    pub fn validated(self) -> Result<Self, EvaluateError> {
        let issues = self.validate();
        if issues.is_empty() {
            Ok(self)
        } else {
            Err(EvaluateError::InvalidInput { issues })
        }
    }
}
