//! Idle intervals between consecutive activities.

use super::hours::duration_minutes;
use crate::errors::{AppError, AppResult};
use crate::models::activity::ActivityRecord;
use crate::models::summary::Gap;

/// Gaps between adjacent activities of a list sorted by start time.
///
/// An ongoing predecessor produces no gap. Input that is out of order, or
/// where an activity starts before its predecessor ended, is rejected rather
/// than reordered.
pub fn compute_gaps(activities: &[ActivityRecord]) -> AppResult<Vec<Gap>> {
    let mut gaps = Vec::new();

    for pair in activities.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);

        if next.start_time < prev.start_time {
            return Err(AppError::UnsortedOrOverlapping(format!(
                "activity #{} starts before activity #{}",
                next.id, prev.id
            )));
        }

        let Some(prev_end) = prev.end_time else {
            continue;
        };

        if next.start_time < prev_end {
            return Err(AppError::UnsortedOrOverlapping(format!(
                "activity #{} starts before activity #{} ended",
                next.id, prev.id
            )));
        }

        if next.start_time > prev_end {
            gaps.push(Gap {
                start: prev_end,
                end: next.start_time,
                duration_minutes: duration_minutes(prev_end, next.start_time),
            });
        }
    }

    Ok(gaps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::activity::ActivityType;
    use crate::models::location::Location;
    use chrono::{DateTime, Local, TimeZone};

    fn at(h: u32, m: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 3, 10, h, m, 0).unwrap()
    }

    fn activity(id: i64, start: DateTime<Local>, end: Option<DateTime<Local>>) -> ActivityRecord {
        ActivityRecord {
            id,
            worker_id: "w1".into(),
            activity_type: ActivityType::Travel,
            title: "drive".into(),
            description: None,
            start_time: start,
            end_time: end,
            duration_minutes: None,
            location: Location::Unlocated,
            linked_ticket_id: None,
        }
    }

    #[test]
    fn emits_positive_gaps_only() {
        let acts = vec![
            activity(1, at(9, 10), Some(at(9, 40))),
            activity(2, at(9, 40), Some(at(9, 50))),
            activity(3, at(10, 0), None),
        ];

        let gaps = compute_gaps(&acts).unwrap();

        assert_eq!(gaps.len(), 1);
        assert_eq!(gaps[0].start, at(9, 50));
        assert_eq!(gaps[0].end, at(10, 0));
        assert_eq!(gaps[0].duration_minutes, 10);
    }

    #[test]
    fn rejects_unsorted_and_overlapping() {
        let unsorted = vec![
            activity(1, at(10, 0), Some(at(10, 30))),
            activity(2, at(9, 0), Some(at(9, 30))),
        ];
        let overlapping = vec![
            activity(1, at(9, 0), Some(at(10, 0))),
            activity(2, at(9, 30), Some(at(10, 30))),
        ];

        assert!(matches!(
            compute_gaps(&unsorted),
            Err(AppError::UnsortedOrOverlapping(_))
        ));
        assert!(matches!(
            compute_gaps(&overlapping),
            Err(AppError::UnsortedOrOverlapping(_))
        ));
    }

    #[test]
    fn empty_and_single_inputs_have_no_gaps() {
        assert!(compute_gaps(&[]).unwrap().is_empty());
        assert!(compute_gaps(&[activity(1, at(9, 0), None)]).unwrap().is_empty());
    }
}
