//! Scheduled end-of-day times resolved from the configuration file.

use super::Config;
use crate::core::policy::ScheduleSource;
use crate::errors::{AppError, AppResult};
use crate::utils::time::parse_time;
use chrono::{NaiveDate, NaiveTime};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct ConfigSchedule {
    default_end: Option<NaiveTime>,
    per_worker: HashMap<String, NaiveTime>,
}

impl ConfigSchedule {
    pub fn from_config(cfg: &Config) -> AppResult<Self> {
        let default_end = cfg
            .default_scheduled_end
            .as_deref()
            .map(|s| parse_hhmm("default_scheduled_end", s))
            .transpose()?;

        let per_worker = cfg
            .worker_schedules
            .iter()
            .map(|(worker, s)| Ok((worker.clone(), parse_hhmm(worker, s)?)))
            .collect::<AppResult<HashMap<_, _>>>()?;

        Ok(Self {
            default_end,
            per_worker,
        })
    }

    /// Same end time for everybody.
    pub fn fixed(end: NaiveTime) -> Self {
        Self {
            default_end: Some(end),
            per_worker: HashMap::new(),
        }
    }

    pub fn with_worker(mut self, worker_id: &str, end: NaiveTime) -> Self {
        self.per_worker.insert(worker_id.to_string(), end);
        self
    }
}

impl ScheduleSource for ConfigSchedule {
    fn scheduled_end(&self, worker_id: &str, _date: NaiveDate) -> Option<NaiveTime> {
        self.per_worker.get(worker_id).copied().or(self.default_end)
    }
}

fn parse_hhmm(field: &str, value: &str) -> AppResult<NaiveTime> {
    parse_time(value).ok_or_else(|| {
        AppError::Config(format!("schedule '{field}': '{value}' is not HH:MM"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worker_override_wins_over_default() {
        let day = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let six = NaiveTime::from_hms_opt(18, 0, 0).unwrap();
        let four = NaiveTime::from_hms_opt(16, 0, 0).unwrap();

        let s = ConfigSchedule::fixed(six).with_worker("part-timer", four);

        assert_eq!(s.scheduled_end("part-timer", day), Some(four));
        assert_eq!(s.scheduled_end("anyone", day), Some(six));
        assert_eq!(ConfigSchedule::default().scheduled_end("anyone", day), None);
    }
}
