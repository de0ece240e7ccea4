//! Check-in / check-out lifecycle of a worker's day.
//!
//! ```text
//! NOT_CHECKED_IN ──check_in──▶ CHECKED_IN ──check_out──▶ CHECKED_OUT | EARLY_CHECKOUT
//!                                  ▲                              │
//!                                  └──────── re_check_in ─────────┘
//! CHECKED_IN ──auto_checkout──▶ AUTO_CHECKED_OUT (final)
//! ```
//!
//! Every mutation runs behind the duplicate-request guard and the worker's
//! lock, and commits as one transaction together with its audit-log row.

use crate::core::calculator::hours::{hours_between, session_hours};
use crate::core::dedup::OperationKind;
use crate::core::tracker::Tracker;
use crate::db::log::ttlog;
use crate::db::sessions;
use crate::errors::{AppError, AppResult};
use crate::models::location::Location;
use crate::models::session::{AttendanceSession, NewSession, SessionStatus};
use crate::utils::formatting::hhmm;
use crate::utils::time::local_datetime;
use chrono::{DateTime, Local, NaiveDate, NaiveTime};
use rusqlite::Connection;
use serde::Serialize;
use tracing::{debug, info};

/// Returned instead of committing an early checkout that was not confirmed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationRequest {
    pub requires_confirmation: bool,
    pub session_id: i64,
    pub message: String,
    pub checkout_time: DateTime<Local>,
    pub scheduled_time: DateTime<Local>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CheckoutOutcome {
    Committed(AttendanceSession),
    RequiresConfirmation(ConfirmationRequest),
}

impl CheckoutOutcome {
    pub fn session(&self) -> Option<&AttendanceSession> {
        match self {
            CheckoutOutcome::Committed(s) => Some(s),
            CheckoutOutcome::RequiresConfirmation(_) => None,
        }
    }
}

pub struct AttendanceStateMachine<'a> {
    tracker: &'a Tracker,
}

impl<'a> AttendanceStateMachine<'a> {
    pub fn new(tracker: &'a Tracker) -> Self {
        Self { tracker }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn session(&self, session_id: i64) -> AppResult<AttendanceSession> {
        self.tracker
            .pool
            .with_conn(|conn| load(conn, session_id))
    }

    pub fn today_session(&self, worker_id: &str) -> AppResult<Option<AttendanceSession>> {
        let today = self.tracker.today();
        self.tracker
            .pool
            .with_conn(|conn| sessions::find_by_worker_date(conn, worker_id, &today))
    }

    pub fn sessions_for_worker(
        &self,
        worker_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<AttendanceSession>> {
        self.tracker
            .pool
            .with_conn(|conn| sessions::in_range(conn, Some(worker_id), &from, &to))
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Start (or resume) the worker's day at the current time.
    ///
    /// A session of today closed by the worker is reopened the same way
    /// [`re_check_in`](Self::re_check_in) does it.
    pub fn check_in(&self, worker_id: &str, location: Location) -> AppResult<AttendanceSession> {
        if !location.is_located() {
            return Err(AppError::LocationRequired);
        }

        let t = self.tracker;
        let _admit = t
            .dedup
            .admit(worker_id, OperationKind::CheckIn, t.settings.cooldown_ms)?;
        let _lock = t.locks.acquire(worker_id);

        let now = t.clock.now();
        let today = now.date_naive();

        let session = t.pool.transaction(|tx| {
            match sessions::find_by_worker_date(tx, worker_id, &today)? {
                None => {
                    let id = sessions::insert(
                        tx,
                        &NewSession {
                            worker_id: worker_id.to_string(),
                            calendar_date: today,
                            check_in_at: now,
                            check_in_location: location.clone(),
                        },
                    )?;
                    ttlog(
                        tx,
                        now,
                        "check_in",
                        worker_id,
                        &format!(
                            "Session #{id} opened at {} ({})",
                            hhmm(&now),
                            location.display_address()
                        ),
                    )?;
                    load(tx, id)
                }
                Some(s) if s.status.is_open() => Err(AppError::AlreadyCheckedIn {
                    worker_id: worker_id.to_string(),
                    date: today,
                }),
                Some(s) if s.status.is_reopenable() => reopen(tx, s, &location, now),
                Some(s) => Err(AppError::SessionClosed(s.id)),
            }
        })?;

        info!(worker_id, session_id = session.id, "checked in");
        Ok(session)
    }

    /// Close the session at the current time.
    ///
    /// Before the scheduled end and without `confirm_early`, nothing changes and
    /// a [`ConfirmationRequest`] comes back; asking again is harmless.
    pub fn check_out(
        &self,
        session_id: i64,
        location: Location,
        confirm_early: bool,
    ) -> AppResult<CheckoutOutcome> {
        let t = self.tracker;
        let now = t.clock.now();

        let current = self.session(session_id)?;

        let decision = t.settings.early_policy.evaluate_for(
            t.schedule.as_ref(),
            &current.worker_id,
            current.calendar_date,
            now,
        );

        // A closed session gets no confirmation; it goes through `admit` and
        // is refused inside the transaction.
        if current.status.is_open()
            && decision.early
            && !confirm_early
            && let Some(scheduled) = decision.scheduled_time
        {
            debug!(worker_id = %current.worker_id, session_id, "early checkout needs confirmation");
            return Ok(CheckoutOutcome::RequiresConfirmation(ConfirmationRequest {
                requires_confirmation: true,
                session_id,
                message: format!(
                    "Your shift ends at {}. Check out early at {}?",
                    hhmm(&scheduled),
                    hhmm(&now)
                ),
                checkout_time: now,
                scheduled_time: scheduled,
            }));
        }

        let worker_id = current.worker_id;
        let _admit = t
            .dedup
            .admit(&worker_id, OperationKind::CheckOut, t.settings.cooldown_ms)?;
        let _lock = t.locks.acquire(&worker_id);

        let session = t.pool.transaction(|tx| {
            let mut s = load(tx, session_id)?;
            ensure_checked_in(&s)?;

            s.check_out_at = Some(now);
            s.check_out_location = location.clone();
            s.status = if decision.early {
                SessionStatus::EarlyCheckout
            } else {
                SessionStatus::CheckedOut
            };
            s.total_hours = Some(session_hours(&s, now));
            if decision.early {
                s.append_note(now, &format!("early checkout confirmed at {}", hhmm(&now)));
            }
            sessions::update(tx, &s)?;

            ttlog(
                tx,
                now,
                "check_out",
                &worker_id,
                &format!(
                    "Session #{} {} at {} ({})",
                    s.id,
                    s.status,
                    hhmm(&now),
                    location.display_address()
                ),
            )?;
            Ok(s)
        })?;

        info!(
            worker_id = %worker_id,
            session_id,
            status = %session.status,
            total_hours = session.total_hours,
            "checked out"
        );
        Ok(CheckoutOutcome::Committed(session))
    }

    /// Reopen a session of today that the worker closed.
    pub fn re_check_in(&self, session_id: i64, location: Location) -> AppResult<AttendanceSession> {
        let t = self.tracker;
        let current = self.session(session_id)?;
        let today = t.today();

        if current.calendar_date != today {
            return Err(AppError::WrongDay {
                session_id,
                session_date: current.calendar_date,
                today,
            });
        }

        let worker_id = current.worker_id;
        let _admit = t
            .dedup
            .admit(&worker_id, OperationKind::ReCheckIn, t.settings.cooldown_ms)?;
        let _lock = t.locks.acquire(&worker_id);

        let now = t.clock.now();
        let session = t.pool.transaction(|tx| {
            let s = load(tx, session_id)?;
            if !s.status.is_reopenable() {
                return Err(AppError::NotFound(format!(
                    "session #{session_id} is {}, not checked out",
                    s.status
                )));
            }
            reopen(tx, s, &location, now)
        })?;

        info!(worker_id = %worker_id, session_id, "re-checked in");
        Ok(session)
    }

    /// Close a still-open session at `cutoff`. Any other status is left as is.
    pub fn auto_checkout(
        &self,
        session_id: i64,
        cutoff: DateTime<Local>,
    ) -> AppResult<AttendanceSession> {
        let t = self.tracker;
        let worker_id = self.session(session_id)?.worker_id;
        let _lock = t.locks.acquire(&worker_id);

        t.pool.transaction(|tx| {
            let mut s = load(tx, session_id)?;
            if !s.status.is_open() {
                debug!(session_id, status = %s.status, "auto-checkout skipped");
                return Ok(s);
            }

            s.check_out_at = Some(cutoff);
            s.check_out_location = Location::Unlocated;
            s.status = SessionStatus::AutoCheckedOut;
            s.total_hours = Some(hours_between(s.check_in_at, cutoff));
            s.append_note(cutoff, "closed by auto-checkout");
            sessions::update(tx, &s)?;

            ttlog(
                tx,
                t.clock.now(),
                "auto_checkout",
                &worker_id,
                &format!("Session #{} closed at {}", s.id, hhmm(&cutoff)),
            )?;
            info!(worker_id = %worker_id, session_id, "auto checked out");
            Ok(s)
        })
    }

    /// Auto-checkout every session of `date` still open, at `cutoff`
    /// (the configured cutoff when `None`). Returns the sessions closed now.
    pub fn auto_checkout_day(
        &self,
        date: NaiveDate,
        cutoff: Option<NaiveTime>,
    ) -> AppResult<Vec<AttendanceSession>> {
        let cutoff_time = cutoff.unwrap_or(self.tracker.settings.auto_checkout_cutoff);
        let cutoff_at = local_datetime(date, cutoff_time)?;

        let ids = self
            .tracker
            .pool
            .with_conn(|conn| sessions::open_ids_for_date(conn, &date))?;

        let mut closed = Vec::new();
        for id in ids {
            let s = self.auto_checkout(id, cutoff_at)?;
            if s.status == SessionStatus::AutoCheckedOut {
                closed.push(s);
            }
        }
        Ok(closed)
    }
}

fn load(conn: &Connection, session_id: i64) -> AppResult<AttendanceSession> {
    sessions::get(conn, session_id)?
        .ok_or_else(|| AppError::NotFound(format!("session #{session_id}")))
}

fn ensure_checked_in(s: &AttendanceSession) -> AppResult<()> {
    if s.status.is_open() {
        Ok(())
    } else {
        Err(AppError::NotFound(format!(
            "no open session #{} (status {})",
            s.id, s.status
        )))
    }
}

/// Back to CHECKED_IN, keeping the original check-in time and place.
fn reopen(
    conn: &Connection,
    mut s: AttendanceSession,
    location: &Location,
    now: DateTime<Local>,
) -> AppResult<AttendanceSession> {
    let previous = s.status;
    let closed_at = s.check_out_at.map(|t| hhmm(&t)).unwrap_or_default();

    s.check_out_at = None;
    s.check_out_location = Location::Unlocated;
    s.status = SessionStatus::CheckedIn;
    s.total_hours = None;
    s.append_note(
        now,
        &format!(
            "re-check-in after {previous} at {closed_at} ({})",
            location.display_address()
        ),
    );
    sessions::update(conn, &s)?;

    ttlog(
        conn,
        now,
        "re_check_in",
        &s.worker_id,
        &format!("Session #{} reopened at {}", s.id, hhmm(&now)),
    )?;
    Ok(s)
}
