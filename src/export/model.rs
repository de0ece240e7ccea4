//! Flat rows written by the exporters.

use crate::db::codec::ts_to_db;
use crate::models::activity::ActivityRecord;
use crate::models::location::Location;
use crate::models::session::AttendanceSession;
use serde::Serialize;

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct SessionExport {
    pub id: i64,
    pub worker_id: String,
    pub date: String,
    pub status: String,
    pub check_in_at: String,
    pub check_in_lat: Option<f64>,
    pub check_in_lng: Option<f64>,
    pub check_in_address: Option<String>,
    pub check_out_at: Option<String>,
    pub check_out_lat: Option<f64>,
    pub check_out_lng: Option<f64>,
    pub check_out_address: Option<String>,
    pub total_hours: Option<f64>,
    pub notes: String,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ActivityExport {
    pub id: i64,
    pub worker_id: String,
    pub activity_type: String,
    pub title: String,
    pub description: Option<String>,
    pub start_time: String,
    pub end_time: Option<String>,
    pub duration_minutes: Option<i64>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub address: Option<String>,
    pub linked_ticket_id: Option<String>,
}

fn flat_location(loc: &Location) -> (Option<f64>, Option<f64>, Option<String>) {
    match loc.point() {
        Some(p) => (
            Some(p.latitude()),
            Some(p.longitude()),
            Some(loc.display_address()),
        ),
        None => (None, None, None),
    }
}

impl From<&AttendanceSession> for SessionExport {
    fn from(s: &AttendanceSession) -> Self {
        let (in_lat, in_lng, in_addr) = flat_location(&s.check_in_location);
        let (out_lat, out_lng, out_addr) = flat_location(&s.check_out_location);

        Self {
            id: s.id,
            worker_id: s.worker_id.clone(),
            date: s.calendar_date.format("%Y-%m-%d").to_string(),
            status: s.status.to_db_str().to_string(),
            check_in_at: ts_to_db(&s.check_in_at),
            check_in_lat: in_lat,
            check_in_lng: in_lng,
            check_in_address: in_addr,
            check_out_at: s.check_out_at.as_ref().map(ts_to_db),
            check_out_lat: out_lat,
            check_out_lng: out_lng,
            check_out_address: out_addr,
            total_hours: s.total_hours.map(|h| (h * 100.0).round() / 100.0),
            notes: s.notes.clone(),
        }
    }
}

impl From<&ActivityRecord> for ActivityExport {
    fn from(a: &ActivityRecord) -> Self {
        let (lat, lng, address) = flat_location(&a.location);

        Self {
            id: a.id,
            worker_id: a.worker_id.clone(),
            activity_type: a.activity_type.to_db_str().to_string(),
            title: a.title.clone(),
            description: a.description.clone(),
            start_time: ts_to_db(&a.start_time),
            end_time: a.end_time.as_ref().map(ts_to_db),
            duration_minutes: a.duration_minutes,
            lat,
            lng,
            address,
            linked_ticket_id: a.linked_ticket_id.clone(),
        }
    }
}
