//! Duplicate-submission guard for state-changing calls.
//!
//! Each `(worker, operation)` slot remembers whether a call is in flight and
//! when the last admitted call finished. A second call arriving while the
//! first runs, or within the cooldown after it, is refused with
//! [`AppError::Throttled`] before any database access.

use crate::core::clock::Clock;
use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Local};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum OperationKind {
    CheckIn,
    CheckOut,
    ReCheckIn,
    StartActivity,
    EndActivity,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::CheckIn => "check-in",
            OperationKind::CheckOut => "check-out",
            OperationKind::ReCheckIn => "re-check-in",
            OperationKind::StartActivity => "start-activity",
            OperationKind::EndActivity => "end-activity",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type SlotKey = (String, OperationKind);

#[derive(Debug, Default)]
struct Slot {
    in_flight: bool,
    last_completed: Option<DateTime<Local>>,
}

pub struct RequestDeduplicator {
    clock: Arc<dyn Clock>,
    slots: Arc<Mutex<HashMap<SlotKey, Slot>>>,
}

impl RequestDeduplicator {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            slots: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Claim the slot for `(worker_id, op)`.
    ///
    /// The returned guard releases the slot when dropped, whatever the outcome
    /// of the guarded call.
    pub fn admit(
        &self,
        worker_id: &str,
        op: OperationKind,
        cooldown_ms: i64,
    ) -> AppResult<AdmitGuard> {
        let now = self.clock.now();
        let key = (worker_id.to_string(), op);
        let mut slots = self.slots.lock();
        let slot = slots.entry(key.clone()).or_default();

        let cooling_down = slot
            .last_completed
            .is_some_and(|done| (now - done).num_milliseconds() < cooldown_ms);

        if slot.in_flight || cooling_down {
            debug!(worker_id, operation = %op, in_flight = slot.in_flight, "request throttled");
            return Err(AppError::Throttled {
                worker_id: worker_id.to_string(),
                operation: op,
            });
        }

        slot.in_flight = true;

        Ok(AdmitGuard {
            key: Some(key),
            slots: Arc::clone(&self.slots),
            clock: Arc::clone(&self.clock),
        })
    }
}

/// Scoped claim on a deduplication slot.
#[must_use = "the slot is released as soon as the guard is dropped"]
pub struct AdmitGuard {
    key: Option<SlotKey>,
    slots: Arc<Mutex<HashMap<SlotKey, Slot>>>,
    clock: Arc<dyn Clock>,
}

impl Drop for AdmitGuard {
    fn drop(&mut self) {
        if let Some(key) = self.key.take() {
            let done = self.clock.now();
            let mut slots = self.slots.lock();
            let slot = slots.entry(key).or_default();
            slot.in_flight = false;
            slot.last_completed = Some(done);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::ManualClock;
    use chrono::{TimeDelta, TimeZone};

    fn setup() -> (ManualClock, RequestDeduplicator) {
        let clock = ManualClock::new(Local.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap());
        let dedup = RequestDeduplicator::new(Arc::new(clock.clone()));
        (clock, dedup)
    }

    #[test]
    fn in_flight_call_blocks_a_duplicate() {
        let (_clock, dedup) = setup();

        let guard = dedup.admit("w1", OperationKind::CheckIn, 0).unwrap();
        let second = dedup.admit("w1", OperationKind::CheckIn, 0);

        assert!(matches!(second, Err(AppError::Throttled { .. })));
        drop(guard);
        assert!(dedup.admit("w1", OperationKind::CheckIn, 0).is_ok());
    }

    #[test]
    fn cooldown_runs_from_completion() {
        let (clock, dedup) = setup();

        drop(dedup.admit("w1", OperationKind::CheckIn, 2000).unwrap());

        clock.advance(TimeDelta::milliseconds(1999));
        assert!(dedup.admit("w1", OperationKind::CheckIn, 2000).is_err());

        clock.advance(TimeDelta::milliseconds(1));
        assert!(dedup.admit("w1", OperationKind::CheckIn, 2000).is_ok());
    }

    #[test]
    fn slots_are_independent() {
        let (_clock, dedup) = setup();

        let _a = dedup.admit("w1", OperationKind::CheckIn, 2000).unwrap();

        assert!(dedup.admit("w2", OperationKind::CheckIn, 2000).is_ok());
        assert!(dedup.admit("w1", OperationKind::StartActivity, 2000).is_ok());
    }
}
