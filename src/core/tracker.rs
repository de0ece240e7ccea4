//! Shared state behind every attendance and activity operation.
//!
//! A [`Tracker`] owns the database, the clock, the per-worker locks and the
//! duplicate-request guard. The state machine and the ledger are thin views
//! borrowing it, so every caller goes through the same rules.

use crate::config::{Config, ConfigSchedule};
use crate::core::attendance::AttendanceStateMachine;
use crate::core::calculator::TimeWindow;
use crate::core::clock::Clock;
use crate::core::dedup::RequestDeduplicator;
use crate::core::ledger::ActivityLedger;
use crate::core::locks::WorkerLocks;
use crate::core::logic::Core;
use crate::core::policy::{EarlyCheckoutPolicy, ScheduleSource};
use crate::db::log::{LogEntry, load_log};
use crate::db::pool::DbPool;
use crate::db::{activities, sessions};
use crate::errors::{AppError, AppResult};
use crate::models::summary::DailySummary;
use crate::utils::time::parse_time;
use chrono::{DateTime, Local, NaiveDate, NaiveTime};
use std::sync::Arc;
use std::time::Duration;

/// Tunables read from the configuration file.
#[derive(Debug, Clone)]
pub struct TrackingSettings {
    pub cooldown_ms: i64,
    pub early_policy: EarlyCheckoutPolicy,
    pub auto_checkout_cutoff: NaiveTime,
    pub location_timeout: Duration,
    pub accuracy_warning_meters: f64,
}

impl Default for TrackingSettings {
    fn default() -> Self {
        Self {
            cooldown_ms: 2000,
            early_policy: EarlyCheckoutPolicy::default(),
            auto_checkout_cutoff: NaiveTime::from_hms_opt(23, 59, 0).unwrap_or(NaiveTime::MIN),
            location_timeout: Duration::from_secs(20),
            accuracy_warning_meters: 100.0,
        }
    }
}

impl TrackingSettings {
    pub fn from_config(cfg: &Config) -> AppResult<Self> {
        let cutoff = parse_time(&cfg.auto_checkout_cutoff).ok_or_else(|| {
            AppError::Config(format!(
                "auto_checkout_cutoff '{}' is not HH:MM",
                cfg.auto_checkout_cutoff
            ))
        })?;

        Ok(Self {
            cooldown_ms: cfg.dedup_cooldown_ms,
            early_policy: EarlyCheckoutPolicy::new(cfg.early_checkout_tolerance_minutes),
            auto_checkout_cutoff: cutoff,
            location_timeout: Duration::from_secs(cfg.location_timeout_secs),
            accuracy_warning_meters: cfg.accuracy_warning_meters,
        })
    }
}

pub struct Tracker {
    pub(crate) pool: DbPool,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) locks: WorkerLocks,
    pub(crate) dedup: RequestDeduplicator,
    pub(crate) schedule: Arc<dyn ScheduleSource>,
    pub(crate) settings: TrackingSettings,
}

impl Tracker {
    pub fn new(
        pool: DbPool,
        clock: Arc<dyn Clock>,
        schedule: Arc<dyn ScheduleSource>,
        settings: TrackingSettings,
    ) -> Self {
        Self {
            pool,
            dedup: RequestDeduplicator::new(Arc::clone(&clock)),
            clock,
            locks: WorkerLocks::new(),
            schedule,
            settings,
        }
    }

    /// Open the configured database with the configured schedule.
    pub fn from_config(cfg: &Config, clock: Arc<dyn Clock>) -> AppResult<Self> {
        let pool = DbPool::new(cfg.database_path())?;
        let schedule = ConfigSchedule::from_config(cfg)?;
        let settings = TrackingSettings::from_config(cfg)?;
        Ok(Self::new(pool, clock, Arc::new(schedule), settings))
    }

    pub fn attendance(&self) -> AttendanceStateMachine<'_> {
        AttendanceStateMachine::new(self)
    }

    pub fn activities(&self) -> ActivityLedger<'_> {
        ActivityLedger::new(self)
    }

    pub fn now(&self) -> DateTime<Local> {
        self.clock.now()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.now().date_naive()
    }

    pub fn settings(&self) -> &TrackingSettings {
        &self.settings
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Today's summary for a worker, computed fresh.
    pub fn daily_summary(&self, worker_id: &str) -> AppResult<DailySummary> {
        self.daily_summary_for(worker_id, self.today())
    }

    pub fn daily_summary_for(&self, worker_id: &str, date: NaiveDate) -> AppResult<DailySummary> {
        let window = TimeWindow::for_date(date)?;
        let now = self.clock.now();

        let (session, acts) = self.pool.with_conn(|conn| {
            let session = sessions::find_by_worker_date(conn, worker_id, &date)?;
            let acts =
                activities::overlapping(conn, worker_id, window.start_ms(), window.end_ms())?;
            Ok((session, acts))
        })?;

        Core::build_daily_summary(&window, session.as_ref(), &acts, now)
    }

    /// Rows of the internal audit log, oldest first.
    pub fn audit_log(&self) -> AppResult<Vec<LogEntry>> {
        self.pool.with_conn(load_log)
    }
}
