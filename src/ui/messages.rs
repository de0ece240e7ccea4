//! User-facing terminal output.
//!
//! Diagnostics go through `tracing` to stderr; everything the user is meant
//! to read goes through these helpers.

use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, RED, RESET, YELLOW};
use serde::Serialize;
use std::fmt;

const BOLD: &str = "\x1b[1m";

const ICON_INFO: &str = "ℹ️";
const ICON_OK: &str = "✅";
const ICON_WARN: &str = "⚠️";
const ICON_ERR: &str = "❌";

pub fn info<T: fmt::Display>(msg: T) {
    println!("{CYAN}{BOLD}{ICON_INFO}{RESET} {msg}");
}

pub fn success<T: fmt::Display>(msg: T) {
    println!("{GREEN}{BOLD}{ICON_OK}{RESET} {msg}");
}

pub fn warning<T: fmt::Display>(msg: T) {
    println!("{YELLOW}{BOLD}{ICON_WARN}{RESET} {msg}");
}

pub fn error<T: fmt::Display>(msg: T) {
    eprintln!("{RED}{BOLD}{ICON_ERR}{RESET} {msg}");
}

pub fn header<T: fmt::Display>(msg: T) {
    println!("{CYAN}{BOLD}== {msg} =={RESET}\n");
}

/// Machine-readable output for `--json`.
pub fn json<T: Serialize>(value: &T) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
