use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One rejected field with the reasons it was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputIssue {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for InputIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluateError {
    #[error("invalid input: {}", join_issues(.issues))]
    InvalidInput { issues: Vec<InputIssue> },
}

impl EvaluateError {
    pub fn issues(&self) -> &[InputIssue] {
        match self {
            Self::InvalidInput { issues } => issues,
        }
    }
}

fn join_issues(issues: &[InputIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Lowercase and drop separators so `taxExemption`, `tax_exemption` and `Tax Exemption` match.
pub(crate) fn normalize_token(value: &str) -> String {
    value
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric())
        .flat_map(|ch| ch.to_lowercase())
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IncentiveType {
    Subsidy,
    TaxExemption,
    None,
}

impl IncentiveType {
    pub const ALL: [IncentiveType; 3] = [Self::Subsidy, Self::TaxExemption, Self::None];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Subsidy => "subsidy",
            Self::TaxExemption => "taxExemption",
            Self::None => "none",
        }
    }
}

impl fmt::Display for IncentiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IncentiveType {
    type Err = InputIssue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match normalize_token(value).as_str() {
            "subsidy" | "subsidies" | "financialsubsidies" => Ok(Self::Subsidy),
            "taxexemption" | "taxexemptions" => Ok(Self::TaxExemption),
            "none" => Ok(Self::None),
            _ => Err(InputIssue {
                field: "incentive_type",
                message: format!("'{value}' is not one of subsidy, taxExemption, none"),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StakeholderPerspective {
    Policymaker,
    Utility,
    Investor,
    Researcher,
}

impl StakeholderPerspective {
    pub const ALL: [StakeholderPerspective; 4] = [
        Self::Policymaker,
        Self::Utility,
        Self::Investor,
        Self::Researcher,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Policymaker => "policymaker",
            Self::Utility => "utility",
            Self::Investor => "investor",
            Self::Researcher => "researcher",
        }
    }
}

impl fmt::Display for StakeholderPerspective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StakeholderPerspective {
    type Err = InputIssue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match normalize_token(value).as_str() {
            "policymaker" => Ok(Self::Policymaker),
            "utility" => Ok(Self::Utility),
            "investor" => Ok(Self::Investor),
            "researcher" => Ok(Self::Researcher),
            _ => Err(InputIssue {
                field: "stakeholder_perspective",
                message: format!(
                    "'{value}' is not one of policymaker, utility, investor, researcher"
                ),
            }),
        }
    }
}

/// Charger deployment profile; selects the penetration-threshold row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ChargerProfile {
    #[default]
    #[serde(rename = "standard_10kw")]
    Standard10kw,
    #[serde(rename = "fast_20kw")]
    Fast20kw,
    #[serde(rename = "v2g")]
    V2g,
}

impl ChargerProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard10kw => "standard_10kw",
            Self::Fast20kw => "fast_20kw",
            Self::V2g => "v2g",
        }
    }
}

impl FromStr for ChargerProfile {
    type Err = InputIssue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match normalize_token(value).as_str() {
            "standard10kw" | "standard" | "10kw" => Ok(Self::Standard10kw),
            "fast20kw" | "fast" | "20kw" => Ok(Self::Fast20kw),
            "v2g" => Ok(Self::V2g),
            _ => Err(InputIssue {
                field: "charger_profile",
                message: format!("'{value}' is not one of standard_10kw, fast_20kw, v2g"),
            }),
        }
    }
}

pub const DEFAULT_SOLAR_SHARE: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScenarioInput {
    /// Percent of the vehicle fleet that is electric, 0..=100.
    pub ev_adoption_rate: f64,
    pub charger_density: f64,
    pub incentive_type: IncentiveType,
    pub stakeholder_perspective: StakeholderPerspective,
    pub charger_profile: ChargerProfile,
    /// Percent of charging energy supplied by solar microgrids, 0..=100.
    pub solar_share: f64,
}

impl ScenarioInput {
    pub fn new(
        ev_adoption_rate: f64,
        charger_density: f64,
        incentive_type: IncentiveType,
        stakeholder_perspective: StakeholderPerspective,
    ) -> Self {
        Self {
            ev_adoption_rate,
            charger_density,
            incentive_type,
            stakeholder_perspective,
            charger_profile: ChargerProfile::default(),
            solar_share: DEFAULT_SOLAR_SHARE,
        }
    }

    pub fn with_charger_profile(mut self, profile: ChargerProfile) -> Self {
        self.charger_profile = profile;
        self
    }

    pub fn with_solar_share(mut self, solar_share: f64) -> Self {
        self.solar_share = solar_share;
        self
    }

    /// Range checks on the numeric fields. Empty when the input is acceptable.
    pub fn validate(&self) -> Vec<InputIssue> {
        let mut issues = Vec::new();
        percent_issue("ev_adoption_rate", self.ev_adoption_rate, &mut issues);
        if !self.charger_density.is_finite() {
            issues.push(InputIssue {
                field: "charger_density",
                message: "must be a finite number".to_string(),
            });
        } else if self.charger_density < 0.0 {
            issues.push(InputIssue {
                field: "charger_density",
                message: "must not be negative".to_string(),
            });
        }
        percent_issue("solar_share", self.solar_share, &mut issues);
        issues
    }
}

fn percent_issue(field: &'static str, value: f64, issues: &mut Vec<InputIssue>) {
    let message = if !value.is_finite() {
        "must be a finite number"
    } else if value < 0.0 {
        "must not be negative"
    } else if value > 100.0 {
        "must not exceed 100"
    } else {
        return;
    };
    issues.push(InputIssue {
        field,
        message: message.to_string(),
    });
}

/// Wire form of [ScenarioInput]: enumerations arrive as text and are checked here.
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioRequest {
    #[serde(alias = "evAdoptionRate")]
    pub ev_adoption_rate: f64,
    #[serde(alias = "chargerDensity")]
    pub charger_density: f64,
    #[serde(alias = "incentiveType")]
    pub incentive_type: String,
    #[serde(alias = "stakeholderPerspective")]
    pub stakeholder_perspective: String,
    #[serde(default, alias = "chargerProfile")]
    pub charger_profile: Option<String>,
    #[serde(default, alias = "solarShare")]
    pub solar_share: Option<f64>,
}

impl ScenarioRequest {
    pub fn into_input(self) -> Result<ScenarioInput, EvaluateError> {
        let mut issues = Vec::new();

        let incentive_type = collect(self.incentive_type.parse::<IncentiveType>(), &mut issues);
        let stakeholder = collect(
            self.stakeholder_perspective.parse::<StakeholderPerspective>(),
            &mut issues,
        );
        let charger_profile = match self.charger_profile.as_deref() {
            Some(raw) => collect(raw.parse::<ChargerProfile>(), &mut issues),
            None => Some(ChargerProfile::default()),
        };

        let input = ScenarioInput {
            ev_adoption_rate: self.ev_adoption_rate,
            charger_density: self.charger_density,
            incentive_type: incentive_type.unwrap_or(IncentiveType::None),
            stakeholder_perspective: stakeholder.unwrap_or(StakeholderPerspective::Policymaker),
            charger_profile: charger_profile.unwrap_or_default(),
            solar_share: self.solar_share.unwrap_or(DEFAULT_SOLAR_SHARE),
        };
        issues.extend(input.validate());

        if issues.is_empty() {
            Ok(input)
        } else {
            Err(EvaluateError::InvalidInput { issues })
        }
    }
}

fn collect<T>(parsed: Result<T, InputIssue>, issues: &mut Vec<InputIssue>) -> Option<T> {
    match parsed {
        Ok(value) => Some(value),
        Err(issue) => {
            issues.push(issue);
            None
        }
    }
}
