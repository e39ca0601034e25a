use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, warn};

use super::symbol::SymbolDecoder;
use super::well_decoder::{DecodeContext, WellDecoder};
use crate::error::ConfigError;

/// Fixed-size pool of decode workers
pub struct WorkerPool {
    pool: ThreadPool,
}

impl WorkerPool {
    /// Pool with exactly `threads` workers (at least one)
    pub fn new(threads: usize) -> Result<Self, ConfigError> {
        let threads = threads.max(1);
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("tubescan-worker-{}", i))
            .build()?;
        debug!(threads, "worker pool started");
        Ok(Self { pool })
    }

    /// Number of worker threads
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Run `op` on the pool's threads
    pub fn install<OP, R>(&self, op: OP) -> R
    where
        OP: FnOnce() -> R + Send,
        R: Send,
    {
        self.pool.install(op)
    }

    /// Execute every task, blocking until all have finished.
    ///
    /// A panic inside one task marks that task failed and leaves the others
    /// running.
    pub fn decode_all<D: SymbolDecoder + ?Sized>(
        &self,
        tasks: &mut [WellDecoder<'_>],
        ctx: &DecodeContext<'_, D>,
    ) {
        self.install(|| {
            tasks.par_iter_mut().for_each(|task| {
                let result = catch_unwind(AssertUnwindSafe(|| task.execute(ctx)));
                if let Err(payload) = result {
                    let fault = panic_message(&*payload);
                    warn!(label = task.well().label(), %fault, "well decoder panicked");
                    task.mark_failed(fault);
                }
            });
        });
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    }
}
