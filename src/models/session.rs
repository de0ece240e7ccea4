use super::location::Location;
use chrono::{DateTime, Local, NaiveDate};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    CheckedIn,
    CheckedOut,
    EarlyCheckout,
    AutoCheckedOut,
}

impl SessionStatus {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            SessionStatus::CheckedIn => "CHECKED_IN",
            SessionStatus::CheckedOut => "CHECKED_OUT",
            SessionStatus::EarlyCheckout => "EARLY_CHECKOUT",
            SessionStatus::AutoCheckedOut => "AUTO_CHECKED_OUT",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "CHECKED_IN" => Some(SessionStatus::CheckedIn),
            "CHECKED_OUT" => Some(SessionStatus::CheckedOut),
            "EARLY_CHECKOUT" => Some(SessionStatus::EarlyCheckout),
            "AUTO_CHECKED_OUT" => Some(SessionStatus::AutoCheckedOut),
            _ => None,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, SessionStatus::CheckedIn)
    }

    /// Closed by the worker, so a same-day re-check-in is allowed.
    pub fn is_reopenable(&self) -> bool {
        matches!(
            self,
            SessionStatus::CheckedOut | SessionStatus::EarlyCheckout
        )
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_str())
    }
}

/// One worker's attendance for one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSession {
    pub id: i64,
    pub worker_id: String,
    pub calendar_date: NaiveDate,
    pub check_in_at: DateTime<Local>,
    pub check_in_location: Location,
    pub check_out_at: Option<DateTime<Local>>,
    pub check_out_location: Location,
    pub status: SessionStatus,
    pub total_hours: Option<f64>,
    pub notes: String,
}

impl AttendanceSession {
    /// Append one line to the audit trail. Existing lines are never touched.
    pub fn append_note(&mut self, at: DateTime<Local>, note: &str) {
        if !self.notes.is_empty() {
            self.notes.push('\n');
        }
        self.notes
            .push_str(&format!("[{}] {}", at.format("%Y-%m-%d %H:%M"), note));
    }
}

/// Values needed to create today's session row.
#[derive(Debug, Clone)]
pub struct NewSession {
    pub worker_id: String,
    pub calendar_date: NaiveDate,
    pub check_in_at: DateTime<Local>,
    pub check_in_location: Location,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn status_db_codes_round_trip() {
        for s in [
            SessionStatus::CheckedIn,
            SessionStatus::CheckedOut,
            SessionStatus::EarlyCheckout,
            SessionStatus::AutoCheckedOut,
        ] {
            assert_eq!(SessionStatus::from_db_str(s.to_db_str()), Some(s));
        }
        assert_eq!(SessionStatus::from_db_str("checked_in"), None);
    }

    #[test]
    fn notes_are_appended_line_by_line() {
        let at = Local.with_ymd_and_hms(2025, 3, 10, 16, 5, 0).unwrap();
        let mut s = AttendanceSession {
            id: 1,
            worker_id: "w1".into(),
            calendar_date: at.date_naive(),
            check_in_at: at,
            check_in_location: Location::Unlocated,
            check_out_at: None,
            check_out_location: Location::Unlocated,
            status: SessionStatus::CheckedIn,
            total_hours: None,
            notes: String::new(),
        };

        s.append_note(at, "first");
        s.append_note(at, "second");

        assert_eq!(
            s.notes,
            "[2025-03-10 16:05] first\n[2025-03-10 16:05] second"
        );
    }
}
