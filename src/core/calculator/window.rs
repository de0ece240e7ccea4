//! Local calendar-day window.

use crate::errors::AppResult;
use crate::utils::time::start_of_day;
use chrono::{DateTime, Local, NaiveDate, TimeDelta};

/// Half-open interval `[start, end)` of local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Local>,
    pub end: DateTime<Local>,
}

impl TimeWindow {
    /// From the start of `date` to the start of the next day, local time.
    pub fn for_date(date: NaiveDate) -> AppResult<Self> {
        let next = date.succ_opt().unwrap_or(date);
        Ok(Self {
            start: start_of_day(&Local, date)?,
            end: start_of_day(&Local, next)?,
        })
    }

    pub fn contains(&self, t: DateTime<Local>) -> bool {
        self.start <= t && t < self.end
    }

    /// Part of `[from, to]` that falls inside the window, if any.
    pub fn clip(&self, from: DateTime<Local>, to: DateTime<Local>) -> Option<TimeDelta> {
        let s = from.max(self.start);
        let e = to.min(self.end);
        (e > s).then(|| e - s)
    }

    pub fn start_ms(&self) -> i64 {
        self.start.timestamp_millis()
    }

    pub fn end_ms(&self) -> i64 {
        self.end.timestamp_millis()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn window_is_half_open() {
        let day = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let w = TimeWindow::for_date(day).unwrap();

        assert!(w.contains(Local.with_ymd_and_hms(2025, 3, 10, 0, 0, 0).unwrap()));
        assert!(w.contains(Local.with_ymd_and_hms(2025, 3, 10, 23, 59, 59).unwrap()));
        assert!(!w.contains(Local.with_ymd_and_hms(2025, 3, 11, 0, 0, 0).unwrap()));
    }

    #[test]
    fn clip_drops_the_part_outside() {
        let day = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let w = TimeWindow::for_date(day).unwrap();

        let from = Local.with_ymd_and_hms(2025, 3, 9, 23, 0, 0).unwrap();
        let to = Local.with_ymd_and_hms(2025, 3, 10, 1, 0, 0).unwrap();

        assert_eq!(w.clip(from, to), Some(TimeDelta::hours(1)));
        assert_eq!(w.clip(from, w.start), None);
    }
}
