use crate::core::calculator::{TimeWindow, counts, gaps, hours};
use crate::errors::AppResult;
use crate::models::activity::ActivityRecord;
use crate::models::session::AttendanceSession;
use crate::models::summary::DailySummary;
use chrono::{DateTime, Local};

pub struct Core;

impl Core {
    /// Aggregate one day from the activities overlapping `window`
    /// (sorted by start) and the worker's session of that day.
    pub fn build_daily_summary(
        window: &TimeWindow,
        session: Option<&AttendanceSession>,
        activities: &[ActivityRecord],
        now: DateTime<Local>,
    ) -> AppResult<DailySummary> {
        Ok(DailySummary {
            date: window.start.date_naive(),
            today_hours: hours::compute_today_hours(activities, now, window),
            active_activity_count: counts::active_activity_count(activities),
            completed_today_count: counts::completed_today_count(activities, window),
            session_status: session.map(|s| s.status),
            session_hours: session.map(|s| s.total_hours.unwrap_or_else(|| hours::session_hours(s, now))),
            gaps: gaps::compute_gaps(activities)?,
        })
    }
}
