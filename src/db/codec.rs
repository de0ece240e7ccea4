//! Column encoding shared by the session and activity queries.
//!
//! Timestamps are RFC 3339 text in the local offset; dates are `YYYY-MM-DD`.
//! A location occupies four nullable columns and is decoded through the
//! validating constructor, so a half-filled row is a conversion error.

use crate::errors::AppError;
use crate::models::location::Location;
use chrono::{DateTime, Local, NaiveDate, SecondsFormat};
use rusqlite::types::Type;

pub fn ts_to_db(ts: &DateTime<Local>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, false)
}

pub fn date_to_db(d: &NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

fn conversion_error(idx: usize, err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

pub fn ts_from_db(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Local>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Local))
        .map_err(|_| conversion_error(idx, AppError::InvalidTime(raw.to_string())))
}

pub fn opt_ts_from_db(idx: usize, raw: Option<String>) -> rusqlite::Result<Option<DateTime<Local>>> {
    raw.map(|s| ts_from_db(idx, &s)).transpose()
}

pub fn date_from_db(idx: usize, raw: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| conversion_error(idx, AppError::InvalidDate(raw.to_string())))
}

/// Columns of a location: `(lat, lng, accuracy, address)`.
pub type LocationColumns<'a> = (Option<f64>, Option<f64>, Option<f64>, Option<&'a str>);

pub fn location_to_db(loc: &Location) -> LocationColumns<'_> {
    match loc.point() {
        Some(p) => (
            Some(p.latitude()),
            Some(p.longitude()),
            p.accuracy_meters(),
            p.address(),
        ),
        None => (None, None, None, None),
    }
}

pub fn location_from_db(
    idx: usize,
    lat: Option<f64>,
    lng: Option<f64>,
    accuracy: Option<f64>,
    address: Option<String>,
) -> rusqlite::Result<Location> {
    match (lat, lng) {
        (Some(lat), Some(lng)) => Location::located(lat, lng, accuracy, address)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Real, Box::new(e))),
        (None, None) => Ok(Location::Unlocated),
        _ => Err(rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Real,
            Box::new(AppError::InvalidLocation(
                "latitude and longitude must be stored together".into(),
            )),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timestamp_text_keeps_the_instant() {
        let ts = Local.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();
        assert_eq!(ts_from_db(0, &ts_to_db(&ts)).unwrap(), ts);
    }

    #[test]
    fn half_filled_location_is_rejected() {
        assert!(location_from_db(0, Some(1.0), None, None, None).is_err());
        assert_eq!(
            location_from_db(0, None, None, Some(5.0), None).unwrap(),
            Location::Unlocated
        );
    }
}
