//! Wall-clock access for the tracker.
//!
//! Every "now" read by the state machine, the ledger and the deduplicator
//! goes through [`Clock`], so tests and the hidden `--now` flag can pin time.

use chrono::{DateTime, Local, TimeDelta};
use parking_lot::Mutex;
use std::sync::Arc;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Clock that only moves when told to.
///
/// Clones share the same instant, so a test can keep one handle and pass
/// another to the tracker.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Local>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Local>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    pub fn set(&self, at: DateTime<Local>) {
        *self.now.lock() = at;
    }

    pub fn advance(&self, by: TimeDelta) {
        let mut now = self.now.lock();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Local> {
        *self.now.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn manual_clock_is_shared_between_clones() {
        let start = Local.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();
        let clock = ManualClock::new(start);
        let handle = clock.clone();

        handle.advance(TimeDelta::minutes(90));

        assert_eq!(
            clock.now(),
            Local.with_ymd_and_hms(2025, 3, 10, 10, 30, 0).unwrap()
        );
    }
}
