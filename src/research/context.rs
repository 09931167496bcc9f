//! National context figures for Rwanda (2023 baseline and published targets).

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NationalTargets {
    pub ev_2030_target: u32,
    pub ev_2050_target: u32,
    pub charging_stations_2025: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridParameters {
    pub total_capacity_mw: f64,
    pub peak_demand_mw: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EconomicParameters {
    pub electricity_tariff_usd_per_kwh: f64,
    pub fuel_price_usd_per_litre: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VehicleFleet {
    pub total_evs: u32,
    pub e_motos: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RwandaContext {
    pub targets: NationalTargets,
    pub grid: GridParameters,
    pub economics: EconomicParameters,
    pub fleet: VehicleFleet,
}

pub const RWANDA_CONTEXT: RwandaContext = RwandaContext {
    targets: NationalTargets {
        ev_2030_target: 30_000,
        ev_2050_target: 150_000,
        charging_stations_2025: 500,
    },
    grid: GridParameters {
        total_capacity_mw: 230.0,
        peak_demand_mw: 180.0,
    },
    economics: EconomicParameters {
        electricity_tariff_usd_per_kwh: 0.18,
        fuel_price_usd_per_litre: 1.35,
    },
    fleet: VehicleFleet {
        total_evs: 12_500,
        e_motos: 6_500,
    },
};

impl RwandaContext {
    /// Share of the 2030 fleet target already on the road, 0..=1.
    pub fn progress_to_2030(&self) -> f64 {
        if self.targets.ev_2030_target == 0 {
            return 1.0;
        }
        (f64::from(self.fleet.total_evs) / f64::from(self.targets.ev_2030_target)).min(1.0)
    }
}
