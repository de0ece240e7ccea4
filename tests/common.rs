#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{DateTime, Local, NaiveTime, TimeZone};
use fieldclock::config::ConfigSchedule;
use fieldclock::core::{ManualClock, Tracker, TrackingSettings};
use fieldclock::db::pool::DbPool;
use fieldclock::models::location::Location;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

pub fn fc() -> Command {
    cargo_bin_cmd!("fieldclock")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_fieldclock.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// `init` a fresh test database and return its path.
pub fn init_test_db(name: &str) -> String {
    let db_path = setup_test_db(name);
    fc().args(["--db", &db_path, "--test", "init"])
        .assert()
        .success();
    db_path
}

/// Run a command against `db_path` with the clock pinned to `now`.
pub fn fc_at(db_path: &str, now: &str) -> Command {
    let mut cmd = fc();
    cmd.args(["--db", db_path, "--now", now]);
    cmd
}

/// 2025-03-10 (a Monday) at `h:m`, local time.
pub fn at(h: u32, m: u32) -> DateTime<Local> {
    Local.with_ymd_and_hms(2025, 3, 10, h, m, 0).unwrap()
}

pub fn depot() -> Location {
    Location::located(45.4642, 9.19, Some(12.0), Some("Depot, Via Roma 1".into())).unwrap()
}

pub fn customer_site() -> Location {
    Location::located(45.4781, 9.2272, Some(30.0), None).unwrap()
}

/// In-memory tracker with an 18:00 scheduled end and a manual clock.
pub fn tracker_at(start: DateTime<Local>) -> (ManualClock, Tracker) {
    tracker_with(start, TrackingSettings::default())
}

pub fn tracker_with(start: DateTime<Local>, settings: TrackingSettings) -> (ManualClock, Tracker) {
    let clock = ManualClock::new(start);
    let schedule = ConfigSchedule::fixed(NaiveTime::from_hms_opt(18, 0, 0).unwrap());
    let tracker = Tracker::new(
        DbPool::in_memory().unwrap(),
        Arc::new(clock.clone()),
        Arc::new(schedule),
        settings,
    );
    (clock, tracker)
}
