use chrono::{Local, TimeDelta, TimeZone};
use fieldclock::errors::AppError;
use fieldclock::models::activity::{ActivityType, NewActivity};
use fieldclock::models::session::SessionStatus;

mod common;
use common::{at, customer_site, depot, tracker_at};

#[test]
fn activity_needs_a_checked_in_worker() {
    let (_clock, tracker) = tracker_at(at(9, 0));

    let err = tracker
        .activities()
        .start_activity("w1", NewActivity::new(ActivityType::Travel, "To customer"))
        .unwrap_err();

    assert!(matches!(err, AppError::CheckInRequired(_)));
}

#[test]
fn refused_start_does_not_block_the_next_one() {
    let (clock, tracker) = tracker_at(at(9, 0));
    let ledger = tracker.activities();

    assert!(matches!(
        ledger.start_activity("w1", NewActivity::new(ActivityType::Travel, "To customer")),
        Err(AppError::CheckInRequired(_))
    ));

    clock.advance(TimeDelta::seconds(3));
    tracker.attendance().check_in("w1", depot()).unwrap();
    let started = ledger
        .start_activity("w1", NewActivity::new(ActivityType::Travel, "To customer"))
        .unwrap();

    assert!(started.is_open());
}

#[test]
fn only_one_open_activity_per_worker() {
    let (clock, tracker) = tracker_at(at(9, 0));
    tracker.attendance().check_in("w1", depot()).unwrap();

    let first = tracker
        .activities()
        .start_activity("w1", NewActivity::new(ActivityType::Travel, "To customer"))
        .unwrap();
    assert!(first.is_open());

    clock.advance(TimeDelta::minutes(1));
    let err = tracker
        .activities()
        .start_activity("w1", NewActivity::new(ActivityType::Meeting, "Briefing"))
        .unwrap_err();

    assert!(matches!(
        err,
        AppError::ActivityAlreadyOpen { activity_id, .. } if activity_id == first.id
    ));
    assert_eq!(
        tracker.activities().current_activity("w1").unwrap().map(|a| a.id),
        Some(first.id)
    );
}

#[test]
fn empty_title_is_rejected() {
    let (_clock, tracker) = tracker_at(at(9, 0));
    tracker.attendance().check_in("w1", depot()).unwrap();

    let err = tracker
        .activities()
        .start_activity("w1", NewActivity::new(ActivityType::Other, "   "))
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidActivity(_)));
}

#[test]
fn end_records_rounded_duration() {
    let (clock, tracker) = tracker_at(at(9, 0));
    tracker.attendance().check_in("w1", depot()).unwrap();

    let start = at(9, 0);
    let end = Local.with_ymd_and_hms(2025, 3, 10, 9, 30, 40).unwrap();

    let a = tracker
        .activities()
        .start_activity(
            "w1",
            NewActivity::new(ActivityType::TicketWork, "Replace router")
                .description("Customer reports no signal")
                .linked_ticket("TCK-1042")
                .location(customer_site())
                .starting_at(start),
        )
        .unwrap();

    clock.set(at(10, 0));
    let ended = tracker.activities().end_activity(a.id, Some(end)).unwrap();

    assert_eq!(ended.end_time, Some(end));
    assert_eq!(ended.duration_minutes, Some(31));
    assert_eq!(ended.linked_ticket_id.as_deref(), Some("TCK-1042"));
    assert_eq!(ended.location, customer_site());
}

#[test]
fn ending_twice_is_refused() {
    let (clock, tracker) = tracker_at(at(9, 0));
    tracker.attendance().check_in("w1", depot()).unwrap();
    let a = tracker
        .activities()
        .start_activity("w1", NewActivity::new(ActivityType::Training, "Safety"))
        .unwrap();

    clock.set(at(10, 0));
    tracker.activities().end_activity(a.id, None).unwrap();

    clock.set(at(10, 5));
    assert!(matches!(
        tracker.activities().end_activity(a.id, None),
        Err(AppError::AlreadyEnded(id)) if id == a.id
    ));
    assert!(matches!(
        tracker.activities().end_activity(4242, None),
        Err(AppError::NotFound(_))
    ));
}

#[test]
fn end_before_start_is_invalid() {
    let (clock, tracker) = tracker_at(at(9, 0));
    tracker.attendance().check_in("w1", depot()).unwrap();
    let a = tracker
        .activities()
        .start_activity("w1", NewActivity::new(ActivityType::Meeting, "Standup"))
        .unwrap();

    clock.set(at(9, 30));
    let err = tracker
        .activities()
        .end_activity(a.id, Some(at(8, 0)))
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidTime(_)));
    assert!(tracker.activities().activity(a.id).unwrap().is_open());
}

#[test]
fn new_activity_cannot_start_inside_the_previous_one() {
    let (clock, tracker) = tracker_at(at(9, 0));
    tracker.attendance().check_in("w1", depot()).unwrap();
    let a = tracker
        .activities()
        .start_activity("w1", NewActivity::new(ActivityType::Travel, "Drive"))
        .unwrap();
    clock.set(at(10, 0));
    tracker.activities().end_activity(a.id, None).unwrap();

    clock.set(at(10, 30));
    let err = tracker
        .activities()
        .start_activity(
            "w1",
            NewActivity::new(ActivityType::TicketWork, "Fix").starting_at(at(9, 45)),
        )
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidTime(_)));
}

#[test]
fn summary_adds_closed_and_open_intervals() {
    let (clock, tracker) = tracker_at(at(9, 0));
    tracker.attendance().check_in("w1", depot()).unwrap();
    let ledger = tracker.activities();

    clock.set(at(9, 10));
    let first = ledger
        .start_activity("w1", NewActivity::new(ActivityType::Travel, "Drive"))
        .unwrap();
    clock.set(at(9, 40));
    ledger.end_activity(first.id, None).unwrap();

    clock.set(at(10, 0));
    ledger
        .start_activity("w1", NewActivity::new(ActivityType::TicketWork, "Install"))
        .unwrap();

    clock.set(at(10, 30));
    let summary = tracker.daily_summary("w1").unwrap();

    assert!((summary.today_hours - 1.0).abs() < 1e-9);
    assert_eq!(summary.active_activity_count, 1);
    assert_eq!(summary.completed_today_count, 1);
    assert_eq!(summary.session_status, Some(SessionStatus::CheckedIn));
    assert_eq!(summary.gaps.len(), 1);
    assert_eq!(summary.gaps[0].duration_minutes, 20);

    clock.set(at(11, 0));
    let later = tracker.daily_summary("w1").unwrap();
    assert!(later.today_hours > summary.today_hours);
}

#[test]
fn summary_of_an_empty_day() {
    let (_clock, tracker) = tracker_at(at(9, 0));

    let summary = tracker.daily_summary("nobody").unwrap();

    assert_eq!(summary.today_hours, 0.0);
    assert_eq!(summary.active_activity_count, 0);
    assert_eq!(summary.completed_today_count, 0);
    assert_eq!(summary.session_status, None);
    assert!(summary.gaps.is_empty());
}

#[test]
fn listing_is_ordered_and_restartable() {
    let (clock, tracker) = tracker_at(at(8, 0));
    tracker.attendance().check_in("w1", depot()).unwrap();
    let ledger = tracker.activities();

    for (i, h) in [9, 10, 11, 12, 13].into_iter().enumerate() {
        clock.set(at(h, 0));
        let a = ledger
            .start_activity("w1", NewActivity::new(ActivityType::TicketWork, format!("job {i}")))
            .unwrap();
        clock.set(at(h, 30));
        ledger.end_activity(a.id, None).unwrap();
    }

    let listing = ledger
        .list_activities("w1", at(0, 0), at(23, 59))
        .with_page_size(2);

    let first_pass: Vec<_> = listing.iter().map(|r| r.unwrap().title).collect();
    let second_pass: Vec<_> = listing.iter().map(|r| r.unwrap().title).collect();

    assert_eq!(first_pass, vec!["job 0", "job 1", "job 2", "job 3", "job 4"]);
    assert_eq!(first_pass, second_pass);

    let window: Vec<_> = ledger
        .list_activities("w1", at(10, 0), at(12, 0))
        .iter()
        .map(|r| r.unwrap().title)
        .collect();
    assert_eq!(window, vec!["job 1", "job 2", "job 3"]);

    assert_eq!(
        ledger.list_activities("w2", at(0, 0), at(23, 59)).iter().count(),
        0
    );
}
