//! Queries on the `activities` table.
//!
//! Ordering and range filters use the `start_ms`/`end_ms` epoch columns; the
//! RFC 3339 text columns are what gets decoded.

use crate::db::codec::{location_from_db, location_to_db, opt_ts_from_db, ts_from_db, ts_to_db};
use crate::errors::{AppError, AppResult};
use crate::models::activity::{ActivityRecord, ActivityType, NewActivity};
use chrono::{DateTime, Local};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};

const COLUMNS: &str = "id, worker_id, activity_type, title, description,
    start_time, end_time, duration_minutes, lat, lng, accuracy, address, linked_ticket_id";

pub fn map_row(row: &Row) -> rusqlite::Result<ActivityRecord> {
    let type_str: String = row.get("activity_type")?;
    let activity_type = ActivityType::from_db_str(&type_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            Type::Text,
            Box::new(AppError::InvalidActivityType(type_str.clone())),
        )
    })?;

    let start_str: String = row.get("start_time")?;

    Ok(ActivityRecord {
        id: row.get("id")?,
        worker_id: row.get("worker_id")?,
        activity_type,
        title: row.get("title")?,
        description: row.get("description")?,
        start_time: ts_from_db(5, &start_str)?,
        end_time: opt_ts_from_db(6, row.get("end_time")?)?,
        duration_minutes: row.get("duration_minutes")?,
        location: location_from_db(
            8,
            row.get("lat")?,
            row.get("lng")?,
            row.get("accuracy")?,
            row.get("address")?,
        )?,
        linked_ticket_id: row.get("linked_ticket_id")?,
    })
}

fn collect(
    rows: impl Iterator<Item = rusqlite::Result<ActivityRecord>>,
) -> AppResult<Vec<ActivityRecord>> {
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn get(conn: &Connection, id: i64) -> AppResult<Option<ActivityRecord>> {
    let sql = format!("SELECT {COLUMNS} FROM activities WHERE id = ?1");
    let mut stmt = conn.prepare_cached(&sql)?;
    Ok(stmt.query_row([id], map_row).optional()?)
}

/// The worker's ongoing activity, if any.
pub fn find_open(conn: &Connection, worker_id: &str) -> AppResult<Option<ActivityRecord>> {
    let sql = format!("SELECT {COLUMNS} FROM activities WHERE worker_id = ?1 AND end_ms IS NULL");
    let mut stmt = conn.prepare_cached(&sql)?;
    Ok(stmt.query_row([worker_id], map_row).optional()?)
}

/// End time of the worker's most recently ended activity.
pub fn latest_end(conn: &Connection, worker_id: &str) -> AppResult<Option<DateTime<Local>>> {
    let mut stmt = conn.prepare_cached(
        "SELECT end_time FROM activities
         WHERE worker_id = ?1 AND end_ms IS NOT NULL
         ORDER BY end_ms DESC LIMIT 1",
    )?;
    let raw: Option<String> = stmt
        .query_row([worker_id], |row| row.get(0))
        .optional()?;
    Ok(opt_ts_from_db(0, raw)?)
}

/// One page of a worker's activities starting within `[from_ms, to_ms]`,
/// strictly after the `(start_ms, id)` cursor.
pub fn page(
    conn: &Connection,
    worker_id: &str,
    from_ms: i64,
    to_ms: i64,
    after: Option<(i64, i64)>,
    limit: usize,
) -> AppResult<Vec<(i64, ActivityRecord)>> {
    let sql = format!(
        "SELECT start_ms, {COLUMNS} FROM activities
         WHERE worker_id = ?1
           AND start_ms BETWEEN ?2 AND ?3
           AND (?4 IS NULL OR start_ms > ?4 OR (start_ms = ?4 AND id > ?5))
         ORDER BY start_ms ASC, id ASC
         LIMIT ?6"
    );
    let (cursor_ms, cursor_id) = match after {
        Some((ms, id)) => (Some(ms), Some(id)),
        None => (None, None),
    };

    let mut stmt = conn.prepare_cached(&sql)?;
    let rows = stmt.query_map(
        params![worker_id, from_ms, to_ms, cursor_ms, cursor_id, limit as i64],
        |row| Ok((row.get::<_, i64>("start_ms")?, map_row(row)?)),
    )?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Activities of a worker whose interval touches `[window_start_ms, window_end_ms)`.
/// Ongoing activities are included whenever they started before the window ends.
pub fn overlapping(
    conn: &Connection,
    worker_id: &str,
    window_start_ms: i64,
    window_end_ms: i64,
) -> AppResult<Vec<ActivityRecord>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM activities
         WHERE worker_id = ?1
           AND start_ms < ?3
           AND (end_ms IS NULL OR end_ms >= ?2)
         ORDER BY start_ms ASC, id ASC"
    );
    let mut stmt = conn.prepare_cached(&sql)?;
    let rows = stmt.query_map(params![worker_id, window_start_ms, window_end_ms], map_row)?;
    collect(rows)
}

/// Activities of all (or one) workers starting within `[from_ms, to_ms]`.
pub fn in_range(
    conn: &Connection,
    worker_id: Option<&str>,
    from_ms: i64,
    to_ms: i64,
) -> AppResult<Vec<ActivityRecord>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM activities
         WHERE start_ms BETWEEN ?1 AND ?2
           AND (?3 IS NULL OR worker_id = ?3)
         ORDER BY start_ms ASC, id ASC"
    );
    let mut stmt = conn.prepare_cached(&sql)?;
    let rows = stmt.query_map(params![from_ms, to_ms, worker_id], map_row)?;
    collect(rows)
}

pub fn insert(
    conn: &Connection,
    worker_id: &str,
    new: &NewActivity,
    start_time: &DateTime<Local>,
) -> AppResult<i64> {
    let (lat, lng, acc, addr) = location_to_db(&new.location);

    conn.execute(
        "INSERT INTO activities (worker_id, activity_type, title, description,
             start_time, start_ms, lat, lng, accuracy, address, linked_ticket_id, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            worker_id,
            new.activity_type.to_db_str(),
            new.title,
            new.description,
            ts_to_db(start_time),
            start_time.timestamp_millis(),
            lat,
            lng,
            acc,
            addr,
            new.linked_ticket_id,
            Local::now().to_rfc3339(),
        ],
    )?;

    Ok(conn.last_insert_rowid())
}

/// Close an activity. Only touches rows that are still open.
pub fn set_end(
    conn: &Connection,
    id: i64,
    end_time: &DateTime<Local>,
    duration_minutes: i64,
) -> AppResult<()> {
    let changed = conn.execute(
        "UPDATE activities
         SET end_time = ?1, end_ms = ?2, duration_minutes = ?3
         WHERE id = ?4 AND end_ms IS NULL",
        params![
            ts_to_db(end_time),
            end_time.timestamp_millis(),
            duration_minutes,
            id
        ],
    )?;

    if changed == 0 {
        return Err(AppError::AlreadyEnded(id));
    }
    Ok(())
}
