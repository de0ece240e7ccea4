//! Early-checkout decision.

use crate::utils::time::local_datetime;
use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeDelta};

/// Where the scheduled end of a worker's day comes from.
pub trait ScheduleSource: Send + Sync {
    fn scheduled_end(&self, worker_id: &str, date: NaiveDate) -> Option<NaiveTime>;
}

/// `now < scheduled_end - tolerance`.
pub fn is_early(now: DateTime<Local>, scheduled_end: DateTime<Local>, tolerance_minutes: i64) -> bool {
    now < scheduled_end - TimeDelta::minutes(tolerance_minutes)
}

#[derive(Debug, Clone, PartialEq)]
pub struct EarlyCheckoutDecision {
    pub early: bool,
    pub checkout_time: DateTime<Local>,
    pub scheduled_time: Option<DateTime<Local>>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EarlyCheckoutPolicy {
    pub tolerance_minutes: i64,
}

impl EarlyCheckoutPolicy {
    pub fn new(tolerance_minutes: i64) -> Self {
        Self { tolerance_minutes }
    }

    /// Without a scheduled end a checkout is never early.
    pub fn evaluate(
        &self,
        now: DateTime<Local>,
        scheduled_end: Option<DateTime<Local>>,
    ) -> EarlyCheckoutDecision {
        EarlyCheckoutDecision {
            early: scheduled_end.is_some_and(|end| is_early(now, end, self.tolerance_minutes)),
            checkout_time: now,
            scheduled_time: scheduled_end,
        }
    }

    /// Resolve the scheduled end of `worker_id` on `date` and evaluate `now` against it.
    pub fn evaluate_for(
        &self,
        schedule: &dyn ScheduleSource,
        worker_id: &str,
        date: NaiveDate,
        now: DateTime<Local>,
    ) -> EarlyCheckoutDecision {
        let scheduled_end = schedule
            .scheduled_end(worker_id, date)
            .and_then(|t| local_datetime(date, t).ok());
        self.evaluate(now, scheduled_end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 3, 10, h, m, 0).unwrap()
    }

    #[test]
    fn strict_comparison_against_the_end() {
        assert!(is_early(at(16, 0), at(18, 0), 0));
        assert!(is_early(at(17, 59), at(18, 0), 0));
        assert!(!is_early(at(18, 0), at(18, 0), 0));
        assert!(!is_early(at(19, 0), at(18, 0), 0));
    }

    #[test]
    fn tolerance_moves_the_threshold_earlier() {
        assert!(!is_early(at(17, 45), at(18, 0), 15));
        assert!(is_early(at(17, 44), at(18, 0), 15));
    }

    #[test]
    fn no_schedule_means_never_early() {
        let d = EarlyCheckoutPolicy::default().evaluate(at(8, 0), None);
        assert!(!d.early);
        assert_eq!(d.checkout_time, at(8, 0));
        assert_eq!(d.scheduled_time, None);
    }
}
