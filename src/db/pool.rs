//! SQLite connection wrapper shared by every worker's operations.
//!
//! One connection behind a mutex: each call holds it only for the duration of
//! a query or a transaction. Per-worker ordering is handled above this layer.

use crate::db::initialize::init_db;
use crate::errors::AppResult;
use parking_lot::Mutex;
use rusqlite::{Connection, Transaction};
use std::path::Path;
use std::time::Duration;

pub struct DbPool {
    conn: Mutex<Connection>,
}

impl DbPool {
    /// Open (or create) the database file and bring its schema up to date.
    pub fn new(path: impl AsRef<Path>) -> AppResult<Self> {
        let conn = Connection::open(path.as_ref())?;
        conn.busy_timeout(Duration::from_secs(5))?;
        init_db(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Private database, used by tests and dry runs.
    pub fn in_memory() -> AppResult<Self> {
        let conn = Connection::open_in_memory()?;
        init_db(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Helper to execute a closure with a connection reference.
    pub fn with_conn<F, T>(&self, func: F) -> AppResult<T>
    where
        F: FnOnce(&Connection) -> AppResult<T>,
    {
        let conn = self.conn.lock();
        func(&conn)
    }

    /// Run `func` inside a transaction: committed on `Ok`, rolled back on `Err`.
    pub fn transaction<F, T>(&self, func: F) -> AppResult<T>
    where
        F: FnOnce(&Transaction<'_>) -> AppResult<T>,
    {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let out = func(&tx)?;
        tx.commit()?;
        Ok(out)
    }
}
