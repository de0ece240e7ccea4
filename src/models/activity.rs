use super::location::Location;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityType {
    TicketWork,
    Travel,
    Meeting,
    Training,
    WorkFromHome,
    Other,
}

impl ActivityType {
    pub const ALL: [ActivityType; 6] = [
        ActivityType::TicketWork,
        ActivityType::Travel,
        ActivityType::Meeting,
        ActivityType::Training,
        ActivityType::WorkFromHome,
        ActivityType::Other,
    ];

    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            ActivityType::TicketWork => "TICKET_WORK",
            ActivityType::Travel => "TRAVEL",
            ActivityType::Meeting => "MEETING",
            ActivityType::Training => "TRAINING",
            ActivityType::WorkFromHome => "WORK_FROM_HOME",
            ActivityType::Other => "OTHER",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.to_db_str() == s)
    }

    /// Helper: accept CLI spellings such as `ticket-work`, `ticket_work`, `TICKET_WORK`
    pub fn from_code(code: &str) -> Option<Self> {
        Self::from_db_str(&code.trim().replace('-', "_").to_uppercase())
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    pub id: i64,
    pub worker_id: String,
    pub activity_type: ActivityType,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Local>,
    pub end_time: Option<DateTime<Local>>, // None ⇔ ongoing
    pub duration_minutes: Option<i64>,
    pub location: Location,
    pub linked_ticket_id: Option<String>,
}

impl ActivityRecord {
    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }

    /// End of the interval, treating an ongoing activity as ending `now`.
    pub fn effective_end(&self, now: DateTime<Local>) -> DateTime<Local> {
        self.end_time.unwrap_or(now)
    }
}

/// Request to start an activity.
#[derive(Debug, Clone)]
pub struct NewActivity {
    pub activity_type: ActivityType,
    pub title: String,
    pub description: Option<String>,
    pub location: Location,
    pub linked_ticket_id: Option<String>,
    /// Defaults to the current time.
    pub start_time: Option<DateTime<Local>>,
}

impl NewActivity {
    pub fn new(activity_type: ActivityType, title: impl Into<String>) -> Self {
        Self {
            activity_type,
            title: title.into(),
            description: None,
            location: Location::Unlocated,
            linked_ticket_id: None,
            start_time: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    pub fn linked_ticket(mut self, ticket_id: impl Into<String>) -> Self {
        self.linked_ticket_id = Some(ticket_id.into());
        self
    }

    pub fn starting_at(mut self, start: DateTime<Local>) -> Self {
        self.start_time = Some(start);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cli_spellings() {
        assert_eq!(
            ActivityType::from_code("ticket-work"),
            Some(ActivityType::TicketWork)
        );
        assert_eq!(
            ActivityType::from_code("work_from_home"),
            Some(ActivityType::WorkFromHome)
        );
        assert_eq!(ActivityType::from_code("MEETING"), Some(ActivityType::Meeting));
        assert_eq!(ActivityType::from_code("lunch"), None);
    }
}
