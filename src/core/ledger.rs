//! Activity intervals of each worker.

use crate::core::calculator::hours::duration_minutes;
use crate::core::dedup::OperationKind;
use crate::core::tracker::Tracker;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::{activities, sessions};
use crate::errors::{AppError, AppResult};
use crate::models::activity::{ActivityRecord, NewActivity};
use crate::utils::formatting::hhmm;
use chrono::{DateTime, Local};
use rusqlite::Connection;
use std::collections::VecDeque;
use tracing::info;

const PAGE_SIZE: usize = 50;

pub struct ActivityLedger<'a> {
    tracker: &'a Tracker,
}

impl<'a> ActivityLedger<'a> {
    pub fn new(tracker: &'a Tracker) -> Self {
        Self { tracker }
    }

    /// Open a new activity for a worker who is checked in today.
    ///
    /// The start defaults to now and may not precede the end of the worker's
    /// last finished activity.
    pub fn start_activity(&self, worker_id: &str, new: NewActivity) -> AppResult<ActivityRecord> {
        if new.title.trim().is_empty() {
            return Err(AppError::InvalidActivity("title must not be empty".into()));
        }

        let t = self.tracker;
        let _admit = t
            .dedup
            .admit(worker_id, OperationKind::StartActivity, t.settings.cooldown_ms)?;
        let _lock = t.locks.acquire(worker_id);

        let now = t.clock.now();
        let today = now.date_naive();
        let start = new.start_time.unwrap_or(now);

        let record = t.pool.transaction(|tx| {
            let checked_in = sessions::find_by_worker_date(tx, worker_id, &today)?
                .is_some_and(|s| s.status.is_open());
            if !checked_in {
                return Err(AppError::CheckInRequired(worker_id.to_string()));
            }

            if let Some(open) = activities::find_open(tx, worker_id)? {
                return Err(AppError::ActivityAlreadyOpen {
                    worker_id: worker_id.to_string(),
                    activity_id: open.id,
                });
            }

            if let Some(last_end) = activities::latest_end(tx, worker_id)?
                && start < last_end
            {
                return Err(AppError::InvalidTime(format!(
                    "start {} is before the end of the previous activity ({})",
                    hhmm(&start),
                    hhmm(&last_end)
                )));
            }

            let id = activities::insert(tx, worker_id, &new, &start)?;
            ttlog(
                tx,
                now,
                "activity_start",
                worker_id,
                &format!(
                    "#{id} {} '{}' at {}",
                    new.activity_type,
                    new.title.trim(),
                    hhmm(&start)
                ),
            )?;
            load(tx, id)
        })?;

        info!(
            worker_id,
            activity_id = record.id,
            activity_type = %record.activity_type,
            "activity started"
        );
        Ok(record)
    }

    /// Close an ongoing activity at `end_time` (now when `None`).
    pub fn end_activity(
        &self,
        activity_id: i64,
        end_time: Option<DateTime<Local>>,
    ) -> AppResult<ActivityRecord> {
        let t = self.tracker;
        let worker_id = self.activity(activity_id)?.worker_id;

        let _admit = t
            .dedup
            .admit(&worker_id, OperationKind::EndActivity, t.settings.cooldown_ms)?;
        let _lock = t.locks.acquire(&worker_id);

        let now = t.clock.now();
        let end = end_time.unwrap_or(now);

        let record = t.pool.transaction(|tx| {
            let a = load(tx, activity_id)?;
            if !a.is_open() {
                return Err(AppError::AlreadyEnded(activity_id));
            }
            if end < a.start_time {
                return Err(AppError::InvalidTime(format!(
                    "end {} is before the start {}",
                    hhmm(&end),
                    hhmm(&a.start_time)
                )));
            }

            let minutes = duration_minutes(a.start_time, end);
            activities::set_end(tx, activity_id, &end, minutes)?;
            ttlog(
                tx,
                now,
                "activity_end",
                &worker_id,
                &format!("#{activity_id} ended at {} ({minutes} min)", hhmm(&end)),
            )?;
            load(tx, activity_id)
        })?;

        info!(
            worker_id = %worker_id,
            activity_id,
            duration_minutes = record.duration_minutes,
            "activity ended"
        );
        Ok(record)
    }

    pub fn activity(&self, activity_id: i64) -> AppResult<ActivityRecord> {
        self.tracker
            .pool
            .with_conn(|conn| load(conn, activity_id))
    }

    pub fn current_activity(&self, worker_id: &str) -> AppResult<Option<ActivityRecord>> {
        self.tracker
            .pool
            .with_conn(|conn| activities::find_open(conn, worker_id))
    }

    /// Activities of `worker_id` starting within `[from, to]`, by start time.
    ///
    /// Nothing is read until the listing is iterated; each iteration starts
    /// over from the first row.
    pub fn list_activities(
        &self,
        worker_id: &str,
        from: DateTime<Local>,
        to: DateTime<Local>,
    ) -> ActivityListing<'a> {
        ActivityListing {
            pool: &self.tracker.pool,
            worker_id: worker_id.to_string(),
            from_ms: from.timestamp_millis(),
            to_ms: to.timestamp_millis(),
            page_size: PAGE_SIZE,
        }
    }
}

fn load(conn: &Connection, activity_id: i64) -> AppResult<ActivityRecord> {
    activities::get(conn, activity_id)?
        .ok_or_else(|| AppError::NotFound(format!("activity #{activity_id}")))
}

/// Restartable, lazily read range of activities.
pub struct ActivityListing<'a> {
    pool: &'a DbPool,
    worker_id: String,
    from_ms: i64,
    to_ms: i64,
    page_size: usize,
}

impl<'a> ActivityListing<'a> {
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn iter(&self) -> ActivityPages<'_> {
        ActivityPages {
            listing: self,
            cursor: None,
            buffer: VecDeque::new(),
            done: false,
        }
    }
}

impl<'l, 'a> IntoIterator for &'l ActivityListing<'a> {
    type Item = AppResult<ActivityRecord>;
    type IntoIter = ActivityPages<'l>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// One pass over an [`ActivityListing`], fetched page by page.
pub struct ActivityPages<'l> {
    listing: &'l ActivityListing<'l>,
    cursor: Option<(i64, i64)>,
    buffer: VecDeque<ActivityRecord>,
    done: bool,
}

impl ActivityPages<'_> {
    fn fetch(&mut self) -> AppResult<()> {
        let l = self.listing;
        let rows = l.pool.with_conn(|conn| {
            activities::page(conn, &l.worker_id, l.from_ms, l.to_ms, self.cursor, l.page_size)
        })?;

        if rows.len() < l.page_size {
            self.done = true;
        }
        if let Some((start_ms, last)) = rows.last() {
            self.cursor = Some((*start_ms, last.id));
        }
        self.buffer.extend(rows.into_iter().map(|(_, a)| a));
        Ok(())
    }
}

impl Iterator for ActivityPages<'_> {
    type Item = AppResult<ActivityRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.buffer.is_empty() && !self.done {
            if let Err(e) = self.fetch() {
                self.done = true;
                return Some(Err(e));
            }
        }
        self.buffer.pop_front().map(Ok)
    }
}
