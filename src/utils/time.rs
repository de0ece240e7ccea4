//! Time utilities: parsing HH:MM and timestamps, hour/minute conversions.

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone};

pub const MILLIS_PER_MINUTE: f64 = 60_000.0;
pub const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Longest DST jump searched for by [`start_of_day`].
const MAX_DAY_START_SHIFT_MINUTES: i64 = 180;

pub fn parse_time(t: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(t.trim(), "%H:%M").ok()
}

/// Attach a wall-clock time to a date in the local zone.
///
/// Ambiguous local times (DST fold) resolve to the earlier instant; times in a
/// DST gap are rejected.
pub fn local_datetime(date: NaiveDate, time: NaiveTime) -> AppResult<DateTime<Local>> {
    date.and_time(time)
        .and_local_timezone(Local)
        .earliest()
        .ok_or_else(|| AppError::InvalidTime(format!("{date} {time} does not exist locally")))
}

/// First instant of `date` in `tz`.
///
/// Where clocks jump forward at midnight the day starts at the first minute
/// that exists.
pub fn start_of_day<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> AppResult<DateTime<Tz>> {
    let midnight = date.and_time(NaiveTime::MIN);
    (0..=MAX_DAY_START_SHIFT_MINUTES)
        .find_map(|m| {
            tz.from_local_datetime(&(midnight + TimeDelta::minutes(m)))
                .earliest()
        })
        .ok_or_else(|| AppError::InvalidDate(format!("{date} has no local start")))
}

/// Parse `HH:MM` (on `default_date`), `YYYY-MM-DD HH:MM`, or RFC 3339.
pub fn parse_timestamp(s: &str, default_date: NaiveDate) -> AppResult<DateTime<Local>> {
    let s = s.trim();

    if let Some(t) = parse_time(s) {
        return local_datetime(default_date, t);
    }

    for fmt in ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
            return local_datetime(ndt.date(), ndt.time());
        }
    }

    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Local))
        .map_err(|_| AppError::InvalidTime(s.to_string()))
}

pub fn parse_optional_timestamp(
    input: Option<&String>,
    default_date: NaiveDate,
) -> AppResult<Option<DateTime<Local>>> {
    input
        .map(|s| parse_timestamp(s, default_date))
        .transpose()
}

pub fn millis_to_hours(millis: i64) -> f64 {
    millis as f64 / MILLIS_PER_HOUR
}

/// Nearest whole minute of a duration (half a minute rounds up).
pub fn rounded_minutes(delta: TimeDelta) -> i64 {
    (delta.num_milliseconds() as f64 / MILLIS_PER_MINUTE).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, LocalResult, NaiveDateTime, Timelike};

    /// UTC-3 until 2025-09-07 03:00 UTC, UTC-2 afterwards: local 00:00-00:59
    /// of 2025-09-07 never happens.
    #[derive(Debug, Clone, Copy)]
    struct MidnightDst;

    impl MidnightDst {
        fn switch() -> NaiveDateTime {
            NaiveDate::from_ymd_opt(2025, 9, 7)
                .unwrap()
                .and_hms_opt(3, 0, 0)
                .unwrap()
        }

        fn standard() -> FixedOffset {
            FixedOffset::west_opt(3 * 3600).unwrap()
        }

        fn summer() -> FixedOffset {
            FixedOffset::west_opt(2 * 3600).unwrap()
        }
    }

    impl TimeZone for MidnightDst {
        type Offset = FixedOffset;

        fn from_offset(_: &FixedOffset) -> Self {
            MidnightDst
        }

        fn offset_from_local_date(&self, local: &NaiveDate) -> LocalResult<FixedOffset> {
            self.offset_from_local_datetime(&local.and_time(NaiveTime::MIN))
        }

        fn offset_from_local_datetime(&self, local: &NaiveDateTime) -> LocalResult<FixedOffset> {
            let candidates: Vec<FixedOffset> = [Self::standard(), Self::summer()]
                .into_iter()
                .filter(|off| {
                    let utc = *local - TimeDelta::seconds(off.local_minus_utc() as i64);
                    (utc < Self::switch()) == (*off == Self::standard())
                })
                .collect();
            match candidates.as_slice() {
                [one] => LocalResult::Single(*one),
                [a, b] => LocalResult::Ambiguous(*a, *b),
                _ => LocalResult::None,
            }
        }

        fn offset_from_utc_date(&self, utc: &NaiveDate) -> FixedOffset {
            self.offset_from_utc_datetime(&utc.and_time(NaiveTime::MIN))
        }

        fn offset_from_utc_datetime(&self, utc: &NaiveDateTime) -> FixedOffset {
            if *utc < Self::switch() {
                Self::standard()
            } else {
                Self::summer()
            }
        }
    }

    #[test]
    fn day_starting_in_a_dst_gap_starts_at_the_first_real_minute() {
        let gap_day = NaiveDate::from_ymd_opt(2025, 9, 7).unwrap();
        let start = start_of_day(&MidnightDst, gap_day).unwrap();

        assert_eq!(start.naive_local(), gap_day.and_hms_opt(1, 0, 0).unwrap());

        let day_before = gap_day.pred_opt().unwrap();
        let start = start_of_day(&MidnightDst, day_before).unwrap();
        assert_eq!(start.naive_local(), day_before.and_time(NaiveTime::MIN));
    }

    #[test]
    fn parses_short_and_full_forms() {
        let day = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();

        let short = parse_timestamp("09:30", day).unwrap();
        assert_eq!(short.date_naive(), day);
        assert_eq!((short.hour(), short.minute()), (9, 30));

        let full = parse_timestamp("2025-03-11 17:05", day).unwrap();
        assert_eq!(full.date_naive(), day.succ_opt().unwrap());

        assert!(parse_timestamp("half past nine", day).is_err());
    }

    #[test]
    fn rounds_minutes_to_nearest() {
        assert_eq!(rounded_minutes(TimeDelta::seconds(89)), 1);
        assert_eq!(rounded_minutes(TimeDelta::seconds(90)), 2);
        assert_eq!(rounded_minutes(TimeDelta::minutes(30)), 30);
    }
}
