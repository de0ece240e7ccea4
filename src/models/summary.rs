use super::session::SessionStatus;
use chrono::{DateTime, Local, NaiveDate};
use serde::Serialize;

/// Idle interval between the end of one activity and the start of the next.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Gap {
    pub start: DateTime<Local>,
    pub end: DateTime<Local>,
    pub duration_minutes: i64,
}

/// Derived view of one worker's day. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub date: NaiveDate,
    pub today_hours: f64,
    pub active_activity_count: usize,
    pub completed_today_count: usize,
    pub session_status: Option<SessionStatus>,
    pub session_hours: Option<f64>,
    pub gaps: Vec<Gap>,
}

impl DailySummary {
    pub fn total_gap_minutes(&self) -> i64 {
        self.gaps.iter().map(|g| g.duration_minutes).sum()
    }
}
