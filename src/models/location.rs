use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Local};
use serde::Serialize;

/// A validated coordinate pair with its optional metadata.
///
/// Fields are private: the only way to obtain a `GeoPoint` is through
/// [`GeoPoint::new`], so a latitude can never exist without its longitude.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
    accuracy_meters: Option<f64>,
    address: Option<String>,
}

impl GeoPoint {
    pub fn new(
        latitude: f64,
        longitude: f64,
        accuracy_meters: Option<f64>,
        address: Option<String>,
    ) -> AppResult<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(AppError::InvalidLocation(format!(
                "latitude {latitude} is outside [-90, 90]"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(AppError::InvalidLocation(format!(
                "longitude {longitude} is outside [-180, 180]"
            )));
        }
        if let Some(acc) = accuracy_meters
            && (!acc.is_finite() || acc < 0.0)
        {
            return Err(AppError::InvalidLocation(format!(
                "accuracy {acc} must be a non-negative number of meters"
            )));
        }

        let address = address
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty());

        Ok(Self {
            latitude,
            longitude,
            accuracy_meters,
            address,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn accuracy_meters(&self) -> Option<f64> {
        self.accuracy_meters
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    /// "lat, lng" text used whenever no address could be resolved.
    pub fn coordinates_text(&self) -> String {
        format!("{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

/// Where an event happened: either a full fix or nothing at all.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Location {
    Located(GeoPoint),
    #[default]
    Unlocated,
}

impl Location {
    pub fn located(
        latitude: f64,
        longitude: f64,
        accuracy_meters: Option<f64>,
        address: Option<String>,
    ) -> AppResult<Self> {
        GeoPoint::new(latitude, longitude, accuracy_meters, address).map(Location::Located)
    }

    pub fn is_located(&self) -> bool {
        matches!(self, Location::Located(_))
    }

    pub fn point(&self) -> Option<&GeoPoint> {
        match self {
            Location::Located(p) => Some(p),
            Location::Unlocated => None,
        }
    }

    /// Best human-readable description: the address, else the coordinates.
    pub fn display_address(&self) -> String {
        match self {
            Location::Located(p) => p
                .address()
                .map(str::to_string)
                .unwrap_or_else(|| p.coordinates_text()),
            Location::Unlocated => "no location".to_string(),
        }
    }

    /// True when the fix reports an accuracy worse than `threshold_meters`.
    /// Only used to warn the user; a coarse fix is still accepted.
    pub fn accuracy_exceeds(&self, threshold_meters: f64) -> bool {
        self.point()
            .and_then(GeoPoint::accuracy_meters)
            .is_some_and(|acc| acc > threshold_meters)
    }
}

/// Raw fix as delivered by a location provider.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationFix {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy_meters: Option<f64>,
    pub timestamp: DateTime<Local>,
}

impl LocationFix {
    pub fn into_location(self, address: Option<String>) -> AppResult<Location> {
        Location::located(
            self.latitude,
            self.longitude,
            self.accuracy_meters,
            address,
        )
    }
}
