//! Queries on the `sessions` table.

use crate::db::codec::{
    date_from_db, date_to_db, location_from_db, location_to_db, opt_ts_from_db, ts_from_db,
    ts_to_db,
};
use crate::errors::{AppError, AppResult};
use crate::models::session::{AttendanceSession, NewSession, SessionStatus};
use chrono::{Local, NaiveDate};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};

const COLUMNS: &str = "id, worker_id, calendar_date, check_in_at,
    check_in_lat, check_in_lng, check_in_accuracy, check_in_address,
    check_out_at, check_out_lat, check_out_lng, check_out_accuracy, check_out_address,
    status, total_hours, notes";

pub fn map_row(row: &Row) -> rusqlite::Result<AttendanceSession> {
    let status_str: String = row.get("status")?;
    let status = SessionStatus::from_db_str(&status_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            13,
            Type::Text,
            Box::new(AppError::Migration(format!(
                "unexpected session status '{status_str}'"
            ))),
        )
    })?;

    let date_str: String = row.get("calendar_date")?;
    let check_in_str: String = row.get("check_in_at")?;

    Ok(AttendanceSession {
        id: row.get("id")?,
        worker_id: row.get("worker_id")?,
        calendar_date: date_from_db(2, &date_str)?,
        check_in_at: ts_from_db(3, &check_in_str)?,
        check_in_location: location_from_db(
            4,
            row.get("check_in_lat")?,
            row.get("check_in_lng")?,
            row.get("check_in_accuracy")?,
            row.get("check_in_address")?,
        )?,
        check_out_at: opt_ts_from_db(8, row.get("check_out_at")?)?,
        check_out_location: location_from_db(
            9,
            row.get("check_out_lat")?,
            row.get("check_out_lng")?,
            row.get("check_out_accuracy")?,
            row.get("check_out_address")?,
        )?,
        status,
        total_hours: row.get("total_hours")?,
        notes: row.get("notes")?,
    })
}

fn collect(
    rows: impl Iterator<Item = rusqlite::Result<AttendanceSession>>,
) -> AppResult<Vec<AttendanceSession>> {
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn get(conn: &Connection, id: i64) -> AppResult<Option<AttendanceSession>> {
    let sql = format!("SELECT {COLUMNS} FROM sessions WHERE id = ?1");
    let mut stmt = conn.prepare_cached(&sql)?;
    Ok(stmt.query_row([id], map_row).optional()?)
}

pub fn find_by_worker_date(
    conn: &Connection,
    worker_id: &str,
    date: &NaiveDate,
) -> AppResult<Option<AttendanceSession>> {
    let sql = format!("SELECT {COLUMNS} FROM sessions WHERE worker_id = ?1 AND calendar_date = ?2");
    let mut stmt = conn.prepare_cached(&sql)?;
    Ok(stmt
        .query_row(params![worker_id, date_to_db(date)], map_row)
        .optional()?)
}

/// Sessions whose calendar date lies in `[from, to]`, optionally for one worker.
pub fn in_range(
    conn: &Connection,
    worker_id: Option<&str>,
    from: &NaiveDate,
    to: &NaiveDate,
) -> AppResult<Vec<AttendanceSession>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM sessions
         WHERE calendar_date BETWEEN ?1 AND ?2
           AND (?3 IS NULL OR worker_id = ?3)
         ORDER BY calendar_date ASC, worker_id ASC"
    );
    let mut stmt = conn.prepare_cached(&sql)?;
    let rows = stmt.query_map(
        params![date_to_db(from), date_to_db(to), worker_id],
        map_row,
    )?;
    collect(rows)
}

/// Ids of the sessions of `date` still CHECKED_IN.
pub fn open_ids_for_date(conn: &Connection, date: &NaiveDate) -> AppResult<Vec<i64>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id FROM sessions WHERE calendar_date = ?1 AND status = 'CHECKED_IN' ORDER BY id",
    )?;
    let rows = stmt.query_map([date_to_db(date)], |row| row.get::<_, i64>(0))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn insert(conn: &Connection, new: &NewSession) -> AppResult<i64> {
    let (lat, lng, acc, addr) = location_to_db(&new.check_in_location);

    conn.execute(
        "INSERT INTO sessions (worker_id, calendar_date, check_in_at,
             check_in_lat, check_in_lng, check_in_accuracy, check_in_address,
             status, notes, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 'CHECKED_IN', '', ?8)",
        params![
            new.worker_id,
            date_to_db(&new.calendar_date),
            ts_to_db(&new.check_in_at),
            lat,
            lng,
            acc,
            addr,
            Local::now().to_rfc3339(),
        ],
    )?;

    Ok(conn.last_insert_rowid())
}

/// Update every mutable field of a session (all except id, worker and date).
pub fn update(conn: &Connection, s: &AttendanceSession) -> AppResult<()> {
    let (in_lat, in_lng, in_acc, in_addr) = location_to_db(&s.check_in_location);
    let (out_lat, out_lng, out_acc, out_addr) = location_to_db(&s.check_out_location);

    let changed = conn.execute(
        "UPDATE sessions
         SET check_in_at = ?1,
             check_in_lat = ?2, check_in_lng = ?3, check_in_accuracy = ?4, check_in_address = ?5,
             check_out_at = ?6,
             check_out_lat = ?7, check_out_lng = ?8, check_out_accuracy = ?9, check_out_address = ?10,
             status = ?11, total_hours = ?12, notes = ?13
         WHERE id = ?14",
        params![
            ts_to_db(&s.check_in_at),
            in_lat,
            in_lng,
            in_acc,
            in_addr,
            s.check_out_at.as_ref().map(ts_to_db),
            out_lat,
            out_lng,
            out_acc,
            out_addr,
            s.status.to_db_str(),
            s.total_hours,
            s.notes,
            s.id,
        ],
    )?;

    if changed == 0 {
        return Err(AppError::NotFound(format!("session #{}", s.id)));
    }
    Ok(())
}
