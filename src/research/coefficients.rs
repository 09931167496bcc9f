//! Research coefficient table: the cited figures the engine consumes as fixed lookups.
//! Sources: IPSA+ power-flow simulations (penetration, DG sizing), HOMER Grid (solar LCOE),
//! and the n=385 adoption survey regression (odds ratios).

use serde::{Deserialize, Serialize};

/// Maximum safe EV penetration (percent of fleet) for one charger profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PenetrationThresholds {
    /// Private-car-dominant fleets.
    pub private_car: f64,
    /// Mixed fleets led by buses and taxis.
    pub bus_taxi: f64,
}

/// Rows and row keys missing from an override take the cited figure for that profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "PenetrationOverrides")]
pub struct PenetrationTable {
    pub standard_10kw: PenetrationThresholds,
    pub fast_20kw: PenetrationThresholds,
    pub v2g: PenetrationThresholds,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ThresholdOverrides {
    private_car: Option<f64>,
    bus_taxi: Option<f64>,
}

impl ThresholdOverrides {
    fn over(self, row: PenetrationThresholds) -> PenetrationThresholds {
        PenetrationThresholds {
            private_car: self.private_car.unwrap_or(row.private_car),
            bus_taxi: self.bus_taxi.unwrap_or(row.bus_taxi),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PenetrationOverrides {
    standard_10kw: ThresholdOverrides,
    fast_20kw: ThresholdOverrides,
    v2g: ThresholdOverrides,
}

impl From<PenetrationOverrides> for PenetrationTable {
    fn from(overrides: PenetrationOverrides) -> Self {
        let table = Self::default();
        Self {
            standard_10kw: overrides.standard_10kw.over(table.standard_10kw),
            fast_20kw: overrides.fast_20kw.over(table.fast_20kw),
            v2g: overrides.v2g.over(table.v2g),
        }
    }
}

impl Default for PenetrationTable {
    fn default() -> Self {
        Self {
            standard_10kw: PenetrationThresholds {
                private_car: 1.5,
                bus_taxi: 10.0,
            },
            fast_20kw: PenetrationThresholds {
                private_car: 1.0,
                bus_taxi: 8.0,
            },
            v2g: PenetrationThresholds {
                private_car: 3.0,
                bus_taxi: 15.0,
            },
        }
    }
}

/// Solar microgrid economics from the HOMER Grid study.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LcoeFigures {
    /// Fractional LCOE reduction (1.397 = 139.7 %).
    pub reduction_factor: f64,
    /// LCOE after the reduction, USD/kWh. Negative means net export revenue.
    pub reduced_lcoe_usd_per_kwh: f64,
}

impl Default for LcoeFigures {
    fn default() -> Self {
        Self {
            reduction_factor: 1.397,
            reduced_lcoe_usd_per_kwh: -0.103,
        }
    }
}

impl LcoeFigures {
    /// Pre-reduction LCOE implied by the reduced figure and the reduction factor.
    pub fn baseline_lcoe_usd_per_kwh(&self) -> f64 {
        let remaining = 1.0 - self.reduction_factor;
        if remaining.abs() < f64::EPSILON {
            return 0.0;
        }
        self.reduced_lcoe_usd_per_kwh / remaining
    }
}

/// Odds ratios for policy levers (higher = stronger association with adoption).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IncentiveOddsRatios {
    pub financial_subsidies: f64,
    pub tax_exemptions: f64,
    pub charging_infrastructure: f64,
    pub public_awareness: f64,
    pub maintenance_training: f64,
    pub priority_lanes: f64,
}

impl Default for IncentiveOddsRatios {
    fn default() -> Self {
        Self {
            financial_subsidies: 3.39,
            tax_exemptions: 2.41,
            charging_infrastructure: 1.77,
            public_awareness: 1.63,
            maintenance_training: 1.93,
            priority_lanes: 1.45,
        }
    }
}

/// Odds ratios for adoption barriers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarrierOddsRatios {
    pub high_initial_cost: f64,
    pub limited_charging: f64,
    pub low_awareness: f64,
}

impl Default for BarrierOddsRatios {
    fn default() -> Self {
        Self {
            high_initial_cost: 1.98,
            limited_charging: 1.77,
            low_awareness: 1.63,
        }
    }
}

/// Distributed generation sizing from continuation power flow analysis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DgRequirements {
    pub chargers_10kw_mw: f64,
    pub chargers_20kw_mw: f64,
    /// Additional EV demand (MW) the study sized the DG figures against.
    pub reference_demand_mw: f64,
}

impl Default for DgRequirements {
    fn default() -> Self {
        Self {
            chargers_10kw_mw: 6.5,
            chargers_20kw_mw: 24.5,
            reference_demand_mw: 25.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridBaseline {
    pub capacity_mw: f64,
    pub base_peak_demand_mw: f64,
}

impl Default for GridBaseline {
    fn default() -> Self {
        Self {
            capacity_mw: 230.0,
            base_peak_demand_mw: 100.0,
        }
    }
}

/// Process-wide coefficient table. Every field defaults to the cited figure, so override
/// files only need the keys they change.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResearchCoefficients {
    pub penetration: PenetrationTable,
    pub lcoe: LcoeFigures,
    pub incentives: IncentiveOddsRatios,
    pub barriers: BarrierOddsRatios,
    pub dg: DgRequirements,
    pub grid: GridBaseline,
}
