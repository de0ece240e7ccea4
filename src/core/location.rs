//! Acquiring a location for check-in, check-out and activities.
//!
//! The fix source and the reverse geocoder are collaborators behind traits.
//! Geocoding is best effort: when it fails the coordinates themselves become
//! the address. A fix taken longer than the acquisition timeout before `now`
//! is stale and refused.

use crate::errors::{AppError, AppResult};
use crate::models::location::{Location, LocationFix};
use chrono::{DateTime, Local, TimeDelta};
use std::time::Duration;
use tracing::{debug, warn};

pub trait LocationProvider {
    /// Produce a fix or give up after `timeout` with `LocationUnavailable`.
    fn current_fix(&self, timeout: Duration) -> AppResult<LocationFix>;
}

pub trait ReverseGeocoder {
    fn address_for(&self, latitude: f64, longitude: f64) -> AppResult<Option<String>>;
}

/// Provider returning a fix known in advance (command-line coordinates).
#[derive(Debug, Clone, Default)]
pub struct FixedLocationProvider {
    fix: Option<LocationFix>,
}

impl FixedLocationProvider {
    pub fn new(fix: Option<LocationFix>) -> Self {
        Self { fix }
    }
}

impl LocationProvider for FixedLocationProvider {
    fn current_fix(&self, _timeout: Duration) -> AppResult<LocationFix> {
        self.fix
            .clone()
            .ok_or_else(|| AppError::LocationUnavailable("no position was provided".into()))
    }
}

/// Geocoder for setups without a geocoding service.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGeocoder;

impl ReverseGeocoder for NoGeocoder {
    fn address_for(&self, _latitude: f64, _longitude: f64) -> AppResult<Option<String>> {
        Ok(None)
    }
}

/// Obtain a fix and turn it into a [`Location`].
///
/// `known_address` skips the geocoder. Provider errors are returned as they
/// are and never retried.
pub fn acquire_location(
    provider: &dyn LocationProvider,
    geocoder: &dyn ReverseGeocoder,
    timeout: Duration,
    now: DateTime<Local>,
    known_address: Option<String>,
) -> AppResult<Location> {
    let fix = provider.current_fix(timeout)?;

    let max_age = TimeDelta::from_std(timeout).unwrap_or(TimeDelta::MAX);
    if now - fix.timestamp > max_age {
        return Err(AppError::LocationUnavailable(format!(
            "last fix was taken at {}, older than {}s",
            fix.timestamp.format("%F %T"),
            timeout.as_secs()
        )));
    }

    // Validates the coordinates before the geocoder ever sees them.
    let bare = fix.clone().into_location(None)?;

    let address = match known_address {
        Some(a) if !a.trim().is_empty() => Some(a),
        _ => match geocoder.address_for(fix.latitude, fix.longitude) {
            Ok(Some(a)) => Some(a),
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "reverse geocoding failed, using coordinates");
                None
            }
        },
    };

    let address = address.or_else(|| bare.point().map(|p| p.coordinates_text()));
    debug!(
        latitude = fix.latitude,
        longitude = fix.longitude,
        fix_at = %fix.timestamp,
        ?address,
        "location acquired"
    );
    fix.into_location(address)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    struct FailingGeocoder;

    impl ReverseGeocoder for FailingGeocoder {
        fn address_for(&self, _: f64, _: f64) -> AppResult<Option<String>> {
            Err(AppError::LocationUnavailable("geocoder offline".into()))
        }
    }

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap()
    }

    fn fix() -> LocationFix {
        LocationFix {
            latitude: 45.4642,
            longitude: 9.19,
            accuracy_meters: Some(8.0),
            timestamp: now(),
        }
    }

    #[test]
    fn geocoder_failure_falls_back_to_coordinates() {
        let provider = FixedLocationProvider::new(Some(fix()));
        let loc = acquire_location(&provider, &FailingGeocoder, Duration::from_secs(1), now(), None).unwrap();

        assert_eq!(loc.point().and_then(|p| p.address()), Some("45.464200, 9.190000"));
    }

    #[test]
    fn known_address_wins() {
        let provider = FixedLocationProvider::new(Some(fix()));
        let loc = acquire_location(
            &provider,
            &NoGeocoder,
            Duration::from_secs(1),
            now(),
            Some("Via Roma 1".into()),
        )
        .unwrap();

        assert_eq!(loc.display_address(), "Via Roma 1");
    }

    #[test]
    fn missing_fix_is_unavailable() {
        let provider = FixedLocationProvider::default();
        let err =
            acquire_location(&provider, &NoGeocoder, Duration::from_secs(1), now(), None).unwrap_err();

        assert!(matches!(err, AppError::LocationUnavailable(_)));
    }

    #[test]
    fn stale_fix_is_unavailable() {
        let provider = FixedLocationProvider::new(Some(fix()));
        let timeout = Duration::from_secs(20);

        let fresh = now() + TimeDelta::seconds(20);
        assert!(acquire_location(&provider, &NoGeocoder, timeout, fresh, None).is_ok());

        let late = now() + TimeDelta::seconds(21);
        let err = acquire_location(&provider, &NoGeocoder, timeout, late, None).unwrap_err();
        assert!(matches!(err, AppError::LocationUnavailable(msg) if msg.contains("2025-03-10 09:00:00")));
    }
}
