use super::window::TimeWindow;
use crate::models::activity::ActivityRecord;

/// Activities still in progress.
pub fn active_activity_count(activities: &[ActivityRecord]) -> usize {
    activities.iter().filter(|a| a.is_open()).count()
}

/// Activities whose end falls inside `window`.
pub fn completed_today_count(activities: &[ActivityRecord], window: &TimeWindow) -> usize {
    activities
        .iter()
        .filter(|a| a.end_time.is_some_and(|end| window.contains(end)))
        .count()
}
