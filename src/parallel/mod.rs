pub mod pool;
pub mod sweep;

pub use pool::WorkerPool;
pub use sweep::{adoption_rates, sweep_adoption, write_sweep_csv, SweepError, SweepPoint};
