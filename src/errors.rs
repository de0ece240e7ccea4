//! Unified application error type.
//! All modules (db, core, cli, utils) return AppError to keep the error
//! handling consistent and easy to manage.

use crate::core::dedup::OperationKind;
use chrono::NaiveDate;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid time: {0}")]
    InvalidTime(String),

    #[error("Invalid location: {0}")]
    InvalidLocation(String),

    #[error("Invalid activity type: {0}")]
    InvalidActivityType(String),

    #[error("Invalid activity: {0}")]
    InvalidActivity(String),

    // ---------------------------
    // Attendance / activity rules
    // ---------------------------
    #[error("A located position is required for this operation")]
    LocationRequired,

    #[error("Location unavailable: {0}")]
    LocationUnavailable(String),

    #[error("Worker '{worker_id}' is already checked in for {date}")]
    AlreadyCheckedIn { worker_id: String, date: NaiveDate },

    #[error("Worker '{0}' must be checked in today before starting an activity")]
    CheckInRequired(String),

    #[error("Worker '{worker_id}' already has activity #{activity_id} in progress")]
    ActivityAlreadyOpen { worker_id: String, activity_id: i64 },

    #[error("Activity #{0} has already ended")]
    AlreadyEnded(i64),

    #[error("Session #{session_id} belongs to {session_date}, not today ({today})")]
    WrongDay {
        session_id: i64,
        session_date: NaiveDate,
        today: NaiveDate,
    },

    #[error("Session #{0} was closed by auto-checkout and can no longer change")]
    SessionClosed(i64),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate {operation} request for worker '{worker_id}' ignored")]
    Throttled {
        worker_id: String,
        operation: OperationKind,
    },

    #[error("Activities must be sorted by start time and must not overlap: {0}")]
    UnsortedOrOverlapping(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration: {0}")]
    ConfigLoad(#[from] serde_yaml::Error),

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl AppError {
    /// Errors the user can fix by changing the input and trying again.
    pub fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            AppError::LocationRequired
                | AppError::LocationUnavailable(_)
                | AppError::WrongDay { .. }
                | AppError::CheckInRequired(_)
                | AppError::InvalidDate(_)
                | AppError::InvalidTime(_)
                | AppError::InvalidLocation(_)
                | AppError::InvalidActivityType(_)
                | AppError::InvalidActivity(_)
        )
    }

    /// Harmless duplicates, never reported as failures.
    pub fn is_silent(&self) -> bool {
        matches!(self, AppError::Throttled { .. })
    }
}

pub type AppResult<T> = Result<T, AppError>;
