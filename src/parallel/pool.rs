//! Rayon thread pool sizing for sensitivity sweeps.
//!
//! A pool with `workers == 0` runs on Rayon's global pool (all CPU cores). A dedicated
//! pool is built once in [WorkerPool::with_workers]; clones share its threads.

use std::sync::Arc;

use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::warn;

#[derive(Debug, Clone, Default)]
pub struct WorkerPool {
    /// Number of worker threads. 0 means the global pool.
    pub workers: usize,
    threads: Option<Arc<ThreadPool>>,
}

impl WorkerPool {
    /// Build the dedicated pool now. If it cannot be built, work runs on the global pool.
    pub fn with_workers(workers: usize) -> Self {
        if workers == 0 {
            return Self::default();
        }
        match ThreadPoolBuilder::new().num_threads(workers).build() {
            Ok(threads) => Self {
                workers,
                threads: Some(Arc::new(threads)),
            },
            Err(err) => {
                warn!(workers, error = %err, "falling back to global rayon pool");
                Self {
                    workers,
                    threads: None,
                }
            }
        }
    }

    /// Run `f` on this pool's threads.
    pub fn install<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        match &self.threads {
            Some(threads) => threads.install(f),
            None => f(),
        }
    }
}
