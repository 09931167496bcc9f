//! Load coefficient overrides from YAML or JSON. Format is chosen by file extension.

use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::research::coefficients::ResearchCoefficients;

#[derive(Debug, Error)]
pub enum CoefficientsError {
    #[error("unable to read coefficients file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("unable to parse yaml coefficients '{path}': {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("unable to parse json coefficients '{path}': {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("coefficient '{field}' must be a finite, non-negative number")]
    OutOfRange { field: &'static str },
    #[error("coefficient '{field}' must be a finite number greater than zero")]
    NotPositive { field: &'static str },
    #[error("coefficient '{field}' must be a finite number")]
    NotFinite { field: &'static str },
    #[error("'{row}': private_car threshold {private_car} exceeds bus_taxi threshold {bus_taxi}")]
    InvertedThresholds {
        row: &'static str,
        private_car: f64,
        bus_taxi: f64,
    },
    #[error("research coefficients were already installed for this process")]
    AlreadyInstalled,
}

pub fn load_coefficients(path: &Path) -> Result<ResearchCoefficients, CoefficientsError> {
    let shown = path.display().to_string();
    let raw = fs::read_to_string(path).map_err(|source| CoefficientsError::Io {
        path: shown.clone(),
        source,
    })?;

    let is_json = path
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("json"));
    let coefficients: ResearchCoefficients = if is_json {
        serde_json::from_str(&raw).map_err(|source| CoefficientsError::Json {
            path: shown.clone(),
            source,
        })?
    } else {
        serde_yaml::from_str(&raw).map_err(|source| CoefficientsError::Yaml {
            path: shown.clone(),
            source,
        })?
    };

    check_ranges(&coefficients)?;
    debug!(path = %shown, "loaded research coefficient overrides");
    Ok(coefficients)
}

fn check_ranges(c: &ResearchCoefficients) -> Result<(), CoefficientsError> {
    // LCOE figures are signed by nature; they only need to be finite.
    let finite: [(&'static str, f64); 2] = [
        ("lcoe.reduction_factor", c.lcoe.reduction_factor),
        ("lcoe.reduced_lcoe_usd_per_kwh", c.lcoe.reduced_lcoe_usd_per_kwh),
    ];
    for (field, value) in finite {
        if !value.is_finite() {
            return Err(CoefficientsError::NotFinite { field });
        }
    }

    let non_negative: [(&'static str, f64); 16] = [
        ("penetration.standard_10kw.private_car", c.penetration.standard_10kw.private_car),
        ("penetration.standard_10kw.bus_taxi", c.penetration.standard_10kw.bus_taxi),
        ("penetration.fast_20kw.private_car", c.penetration.fast_20kw.private_car),
        ("penetration.fast_20kw.bus_taxi", c.penetration.fast_20kw.bus_taxi),
        ("penetration.v2g.private_car", c.penetration.v2g.private_car),
        ("penetration.v2g.bus_taxi", c.penetration.v2g.bus_taxi),
        ("incentives.financial_subsidies", c.incentives.financial_subsidies),
        ("incentives.tax_exemptions", c.incentives.tax_exemptions),
        ("incentives.charging_infrastructure", c.incentives.charging_infrastructure),
        ("incentives.public_awareness", c.incentives.public_awareness),
        ("incentives.maintenance_training", c.incentives.maintenance_training),
        ("incentives.priority_lanes", c.incentives.priority_lanes),
        ("barriers.high_initial_cost", c.barriers.high_initial_cost),
        ("barriers.limited_charging", c.barriers.limited_charging),
        ("barriers.low_awareness", c.barriers.low_awareness),
        ("grid.base_peak_demand_mw", c.grid.base_peak_demand_mw),
    ];
    for (field, value) in non_negative {
        if !value.is_finite() || value < 0.0 {
            return Err(CoefficientsError::OutOfRange { field });
        }
    }

    // Divisors in the grid impact calculation.
    let positive: [(&'static str, f64); 4] = [
        ("dg.chargers_10kw_mw", c.dg.chargers_10kw_mw),
        ("dg.chargers_20kw_mw", c.dg.chargers_20kw_mw),
        ("dg.reference_demand_mw", c.dg.reference_demand_mw),
        ("grid.capacity_mw", c.grid.capacity_mw),
    ];
    for (field, value) in positive {
        if !value.is_finite() || value <= 0.0 {
            return Err(CoefficientsError::NotPositive { field });
        }
    }

    let rows = [
        ("penetration.standard_10kw", c.penetration.standard_10kw),
        ("penetration.fast_20kw", c.penetration.fast_20kw),
        ("penetration.v2g", c.penetration.v2g),
    ];
    for (row, thresholds) in rows {
        if thresholds.private_car > thresholds.bus_taxi {
            return Err(CoefficientsError::InvertedThresholds {
                row,
                private_car: thresholds.private_car,
                bus_taxi: thresholds.bus_taxi,
            });
        }
    }
    Ok(())
}
