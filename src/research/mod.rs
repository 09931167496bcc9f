//! Research figures shared by every computation. Installed once at process start, then read-only.

pub mod coefficients;
pub mod context;
pub mod loader;

use once_cell::sync::OnceCell;

pub use coefficients::{
    BarrierOddsRatios, DgRequirements, GridBaseline, IncentiveOddsRatios, LcoeFigures,
    PenetrationTable, PenetrationThresholds, ResearchCoefficients,
};
pub use context::{RwandaContext, RWANDA_CONTEXT};
pub use loader::{load_coefficients, CoefficientsError};

static COEFFICIENTS: OnceCell<ResearchCoefficients> = OnceCell::new();

/// Install the process-wide table. Fails if a table was already installed or read.
pub fn install_coefficients(coefficients: ResearchCoefficients) -> Result<(), CoefficientsError> {
    COEFFICIENTS
        .set(coefficients)
        .map_err(|_| CoefficientsError::AlreadyInstalled)
}

/// The installed table, or the compiled-in defaults if nothing was installed before first use.
pub fn coefficients() -> &'static ResearchCoefficients {
    COEFFICIENTS.get_or_init(ResearchCoefficients::default)
}
