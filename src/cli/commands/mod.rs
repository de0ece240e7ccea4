pub mod activity;
pub mod attendance;
pub mod config;
pub mod export;
pub mod init;
pub mod log;
pub mod sessions;
pub mod summary;

use crate::cli::parser::LocationArgs;
use crate::core::location::{FixedLocationProvider, NoGeocoder, acquire_location};
use crate::core::tracker::Tracker;
use crate::errors::AppResult;
use crate::models::activity::ActivityRecord;
use crate::models::location::{Location, LocationFix};
use crate::models::session::AttendanceSession;
use crate::ui::messages::{info, json, warning};
use crate::utils::colors::{colorize_in_out, colorize_optional};
use crate::utils::formatting::{bold, colored_status, hhmm, hours2readable, optional_hhmm};
use serde::Serialize;

/// What every data command needs.
pub struct CommandContext<'a> {
    pub tracker: &'a Tracker,
    pub json: bool,
}

impl CommandContext<'_> {
    /// Print `value` as JSON with `--json`, otherwise run `human`.
    pub fn emit<T: Serialize>(&self, value: &T, human: impl FnOnce(&T)) -> AppResult<()> {
        if self.json {
            json(value)
        } else {
            human(value);
            Ok(())
        }
    }
}

/// Turn `--lat/--lng/--accuracy/--address` into a [`Location`].
/// No coordinates means no location.
pub(crate) fn resolve_location(args: &LocationArgs, tracker: &Tracker) -> AppResult<Location> {
    let (Some(latitude), Some(longitude)) = (args.lat, args.lng) else {
        return Ok(Location::Unlocated);
    };

    let now = tracker.now();
    let provider = FixedLocationProvider::new(Some(LocationFix {
        latitude,
        longitude,
        accuracy_meters: args.accuracy,
        timestamp: now,
    }));
    let location = acquire_location(
        &provider,
        &NoGeocoder,
        tracker.settings().location_timeout,
        now,
        args.address.clone(),
    )?;

    let threshold = tracker.settings().accuracy_warning_meters;
    if location.accuracy_exceeds(threshold) {
        warning(format!(
            "Location accuracy is worse than {threshold:.0} m; the position was recorded anyway."
        ));
    }
    Ok(location)
}

pub(crate) fn print_session(s: &AttendanceSession) {
    println!(
        "{} #{} · {} · {}",
        bold("Session"),
        s.id,
        s.worker_id,
        s.calendar_date
    );
    println!("  Status    : {}", colored_status(s.status));
    println!(
        "  Check-in  : {} @ {}",
        colorize_in_out(&hhmm(&s.check_in_at), true),
        s.check_in_location.display_address()
    );
    if let Some(out) = &s.check_out_at {
        println!(
            "  Check-out : {} @ {}",
            colorize_in_out(&hhmm(out), false),
            s.check_out_location.display_address()
        );
    }
    if let Some(h) = s.total_hours {
        println!("  Worked    : {}", hours2readable(h));
    }
    if !s.notes.is_empty() {
        println!("  Notes     :");
        for line in s.notes.lines() {
            println!("    {line}");
        }
    }
}

pub(crate) fn print_activity(a: &ActivityRecord) {
    let duration = a
        .duration_minutes
        .map(|m| format!("{m} min"))
        .unwrap_or_else(|| "ongoing".to_string());

    println!(
        "#{} {} [{}] {} → {} ({})",
        a.id,
        bold(&a.title),
        a.activity_type,
        hhmm(&a.start_time),
        colorize_optional(&optional_hhmm(a.end_time.as_ref())),
        duration
    );
    if let Some(ticket) = &a.linked_ticket_id {
        println!("   ticket: {ticket}");
    }
    if a.location.is_located() {
        println!("   at: {}", a.location.display_address());
    }
}

pub(crate) fn no_data(what: &str) {
    info(format!("No {what} found."));
}
