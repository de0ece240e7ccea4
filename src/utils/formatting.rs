//! Formatting utilities used for CLI and export outputs.

use crate::models::session::SessionStatus;
use crate::utils::colors::{CYAN, GREEN, MAGENTA, RESET, YELLOW};
use chrono::{DateTime, Local};

pub fn bold(s: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", s)
}

pub fn mins2readable(mins: i64, want_sign: bool, short: bool) -> String {
    let abs_m = mins.abs();
    let hours = abs_m / 60;
    let minutes = abs_m % 60;

    let sign = if mins > 0 && want_sign {
        "+"
    } else if mins < 0 && want_sign {
        "-"
    } else {
        ""
    };

    if short {
        format!("{}{:02}:{:02}", sign, hours, minutes)
    } else {
        format!("{}{:02}h {:02}m", sign, hours, minutes)
    }
}

/// Decimal hours rendered as `07h 30m`.
pub fn hours2readable(hours: f64) -> String {
    mins2readable((hours * 60.0).round() as i64, false, false)
}

pub fn hhmm(ts: &DateTime<Local>) -> String {
    ts.format("%H:%M").to_string()
}

pub fn optional_hhmm(ts: Option<&DateTime<Local>>) -> String {
    ts.map(hhmm).unwrap_or_else(|| "--:--".to_string())
}

/// Label and ANSI color for a session status.
pub fn describe_status(status: SessionStatus) -> (&'static str, &'static str) {
    match status {
        SessionStatus::CheckedIn => ("Checked in", GREEN),
        SessionStatus::CheckedOut => ("Checked out", CYAN),
        SessionStatus::EarlyCheckout => ("Early checkout", YELLOW),
        SessionStatus::AutoCheckedOut => ("Auto checked out", MAGENTA),
    }
}

pub fn colored_status(status: SessionStatus) -> String {
    let (label, color) = describe_status(status);
    format!("{color}{label}{RESET}")
}
