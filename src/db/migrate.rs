//! Versioned schema migrations.
//!
//! Each migration runs at most once; applied versions are recorded in the
//! internal `log` table as `operation = 'migration_applied'`.

use crate::errors::{AppError, AppResult};
use rusqlite::{Connection, OptionalExtension, params};
use tracing::info;

struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20251006_0001_create_sessions",
        description: "Created sessions table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS sessions (
            id                  INTEGER PRIMARY KEY AUTOINCREMENT,
            worker_id           TEXT NOT NULL,
            calendar_date       TEXT NOT NULL,
            check_in_at         TEXT NOT NULL,
            check_in_lat        REAL,
            check_in_lng        REAL,
            check_in_accuracy   REAL,
            check_in_address    TEXT,
            check_out_at        TEXT,
            check_out_lat       REAL,
            check_out_lng       REAL,
            check_out_accuracy  REAL,
            check_out_address   TEXT,
            status              TEXT NOT NULL CHECK(status IN
                ('CHECKED_IN','CHECKED_OUT','EARLY_CHECKOUT','AUTO_CHECKED_OUT')),
            total_hours         REAL,
            notes               TEXT NOT NULL DEFAULT '',
            created_at          TEXT NOT NULL,
            UNIQUE(worker_id, calendar_date),
            CHECK((check_in_lat IS NULL) = (check_in_lng IS NULL)),
            CHECK((check_out_lat IS NULL) = (check_out_lng IS NULL))
        );

        CREATE INDEX IF NOT EXISTS idx_sessions_date_status ON sessions(calendar_date, status);
        "#,
    },
    Migration {
        version: "20251006_0002_create_activities",
        description: "Created activities table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS activities (
            id                INTEGER PRIMARY KEY AUTOINCREMENT,
            worker_id         TEXT NOT NULL,
            activity_type     TEXT NOT NULL CHECK(activity_type IN
                ('TICKET_WORK','TRAVEL','MEETING','TRAINING','WORK_FROM_HOME','OTHER')),
            title             TEXT NOT NULL,
            description       TEXT,
            start_time        TEXT NOT NULL,
            start_ms          INTEGER NOT NULL,
            end_time          TEXT,
            end_ms            INTEGER,
            duration_minutes  INTEGER,
            lat               REAL,
            lng               REAL,
            accuracy          REAL,
            address           TEXT,
            linked_ticket_id  TEXT,
            created_at        TEXT NOT NULL,
            CHECK((end_time IS NULL) = (end_ms IS NULL)),
            CHECK((lat IS NULL) = (lng IS NULL))
        );

        CREATE INDEX IF NOT EXISTS idx_activities_worker_start ON activities(worker_id, start_ms, id);
        "#,
    },
    Migration {
        version: "20251013_0003_single_open_activity",
        description: "At most one open activity per worker",
        sql: r#"
        CREATE UNIQUE INDEX IF NOT EXISTS idx_activities_one_open
            ON activities(worker_id) WHERE end_ms IS NULL;
        "#,
    },
];

/// Ensure that the `log` table exists.
fn ensure_log_table(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )
}

fn is_applied(conn: &Connection, version: &str) -> rusqlite::Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, m: &Migration) -> AppResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(m.sql)
        .map_err(|e| AppError::Migration(format!("{}: {}", m.version, e)))?;

    tx.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (?1, 'migration_applied', ?2, ?3)",
        params![chrono::Local::now().to_rfc3339(), m.version, m.description],
    )?;

    tx.commit()?;

    info!(version = m.version, "migration applied");
    Ok(())
}

/// Public entry point: run all pending migrations.
///
/// Invoked by db::init_db().
pub fn run_pending_migrations(conn: &Connection) -> AppResult<()> {
    ensure_log_table(conn)?;

    for m in MIGRATIONS {
        if !is_applied(conn, m.version)? {
            apply(conn, m)?;
        }
    }

    Ok(())
}

/// Versions already applied, oldest first.
pub fn applied_versions(conn: &Connection) -> AppResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT target FROM log WHERE operation = 'migration_applied' ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_run_once() {
        let conn = Connection::open_in_memory().unwrap();

        run_pending_migrations(&conn).unwrap();
        run_pending_migrations(&conn).unwrap();

        let versions = applied_versions(&conn).unwrap();
        assert_eq!(versions.len(), MIGRATIONS.len());
        assert_eq!(versions[0], "20251006_0001_create_sessions");
    }
}
