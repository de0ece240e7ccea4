//! Worked-time arithmetic.

use super::window::TimeWindow;
use crate::models::activity::ActivityRecord;
use crate::models::session::AttendanceSession;
use crate::utils::time::{millis_to_hours, rounded_minutes};
use chrono::{DateTime, Local};

/// Hours from check-in to check-out, or to `now` while still checked in.
/// Never negative.
pub fn session_hours(session: &AttendanceSession, now: DateTime<Local>) -> f64 {
    let end = session.check_out_at.unwrap_or(now);
    hours_between(session.check_in_at, end)
}

pub fn hours_between(from: DateTime<Local>, to: DateTime<Local>) -> f64 {
    millis_to_hours((to - from).num_milliseconds().max(0))
}

/// Sum of every activity interval clipped to `window`; ongoing activities
/// count up to `now`.
pub fn compute_today_hours(
    activities: &[ActivityRecord],
    now: DateTime<Local>,
    window: &TimeWindow,
) -> f64 {
    let millis: i64 = activities
        .iter()
        .filter_map(|a| window.clip(a.start_time, a.effective_end(now)))
        .map(|d| d.num_milliseconds())
        .sum();

    millis_to_hours(millis)
}

/// Whole minutes between `start` and `end`, rounded to nearest.
pub fn duration_minutes(start: DateTime<Local>, end: DateTime<Local>) -> i64 {
    rounded_minutes(end - start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::activity::ActivityType;
    use crate::models::location::Location;
    use chrono::{NaiveDate, TimeZone};

    fn at(h: u32, m: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 3, 10, h, m, 0).unwrap()
    }

    fn activity(id: i64, start: DateTime<Local>, end: Option<DateTime<Local>>) -> ActivityRecord {
        ActivityRecord {
            id,
            worker_id: "w1".into(),
            activity_type: ActivityType::TicketWork,
            title: format!("job {id}"),
            description: None,
            start_time: start,
            end_time: end,
            duration_minutes: end.map(|e| duration_minutes(start, e)),
            location: Location::Unlocated,
            linked_ticket_id: None,
        }
    }

    fn today() -> TimeWindow {
        TimeWindow::for_date(NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()).unwrap()
    }

    #[test]
    fn closed_and_open_intervals_add_up() {
        let acts = vec![
            activity(1, at(9, 10), Some(at(9, 40))),
            activity(2, at(10, 0), None),
        ];

        let hours = compute_today_hours(&acts, at(10, 30), &today());
        assert!((hours - 1.0).abs() < 1e-9);
    }

    #[test]
    fn open_activity_only_grows_with_time() {
        let acts = vec![activity(1, at(8, 0), None)];
        let w = today();

        let mut last = 0.0;
        for minute in 0..=120 {
            let now = at(8, 0) + chrono::TimeDelta::minutes(minute);
            let h = compute_today_hours(&acts, now, &w);
            assert!(h >= last);
            last = h;
        }
    }

    #[test]
    fn yesterday_part_is_not_counted() {
        let start = Local.with_ymd_and_hms(2025, 3, 9, 22, 0, 0).unwrap();
        let acts = vec![activity(1, start, Some(at(1, 0)))];

        let hours = compute_today_hours(&acts, at(12, 0), &today());
        assert!((hours - 1.0).abs() < 1e-9);
    }

    #[test]
    fn session_hours_never_negative() {
        let mut s = AttendanceSession {
            id: 1,
            worker_id: "w1".into(),
            calendar_date: at(9, 0).date_naive(),
            check_in_at: at(9, 0),
            check_in_location: Location::Unlocated,
            check_out_at: None,
            check_out_location: Location::Unlocated,
            status: crate::models::session::SessionStatus::CheckedIn,
            total_hours: None,
            notes: String::new(),
        };

        assert!((session_hours(&s, at(17, 30)) - 8.5).abs() < 1e-9);
        assert_eq!(session_hours(&s, at(8, 0)), 0.0);

        s.check_out_at = Some(at(13, 0));
        assert!((session_hours(&s, at(17, 30)) - 4.0).abs() < 1e-9);
    }
}
