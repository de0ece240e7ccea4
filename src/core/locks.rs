//! Per-worker writer locks.
//!
//! Mutations for one worker run one at a time; different workers never wait
//! on each other here.

use parking_lot::{ArcMutexGuard, Mutex, RawMutex};
use std::collections::HashMap;
use std::sync::Arc;

pub type WorkerGuard = ArcMutexGuard<RawMutex, ()>;

#[derive(Default)]
pub struct WorkerLocks {
    registry: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl WorkerLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Block until `worker_id` has no other writer, then hold its lock.
    pub fn acquire(&self, worker_id: &str) -> WorkerGuard {
        let lock = {
            let mut registry = self.registry.lock();
            Arc::clone(
                registry
                    .entry(worker_id.to_string())
                    .or_insert_with(|| Arc::new(Mutex::new(()))),
            )
        };
        lock.lock_arc()
    }
}
