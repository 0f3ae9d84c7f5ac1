//! Derived-counter recomputation against PostgreSQL
//!
//! Counters on events and clubs are caches over source rows. These tests
//! corrupt them directly and verify that recomputation restores the
//! values derivable from the source tables.

mod helpers;

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use serial_test::serial;

use helpers::database_helper::TestDatabase;
use helpers::test_data::{event_request, seed_published_event};
use CampusEvents::models::attendance::{AttendanceMethod, MarkAttendanceRequest};
use CampusEvents::models::feedback::SubmitFeedbackRequest;
use CampusEvents::CampusEventsError;

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL (set TEST_DATABASE_URL or have Docker available)"]
async fn rebuild_restores_corrupted_event_counters() {
    let db = TestDatabase::new().await.expect("test database");
    db.cleanup().await.expect("cleanup");
    let services = db.services();

    let seeded = seed_published_event(&services).await;
    services
        .registrations
        .register(seeded.student.id, seeded.event.id)
        .await
        .expect("register");

    let now = Utc::now();
    db.set_event_times(
        seeded.event.id,
        now - Duration::minutes(90),
        now - Duration::minutes(10),
    )
    .await
    .expect("set times");

    services
        .attendance
        .mark_attendance(MarkAttendanceRequest {
            user_id: seeded.student.id,
            event_id: seeded.event.id,
            marked_by: seeded.admin.id,
            method: AttendanceMethod::QrScan,
            notes: None,
        })
        .await
        .expect("check-in");
    services
        .feedback
        .submit(SubmitFeedbackRequest {
            user_id: seeded.student.id,
            event_id: seeded.event.id,
            rating: 5,
            comment: None,
            would_recommend: Some(true),
            is_anonymous: None,
        })
        .await
        .expect("feedback");

    // Corrupt every cached counter
    db.execute_sql(
        "UPDATE events SET registrations = 99, attendance = 99, feedback_count = 99, average_rating = 1.2",
    )
    .await
    .expect("corrupt events");
    db.execute_sql("UPDATE clubs SET total_events = 0, total_members = 0, total_attendees = 0")
        .await
        .expect("corrupt clubs");

    let summary = services.stats.rebuild_all().await.expect("rebuild");
    assert!(summary.events >= 1);
    assert!(summary.clubs >= 1);

    let event = services.events.get_event(seeded.event.id).await.expect("event");
    assert_eq!(event.stats.registrations, 1);
    assert_eq!(event.stats.attendance, 1);
    assert_eq!(event.stats.feedback_count, 1);
    assert!((event.stats.average_rating - 5.0).abs() < f64::EPSILON);

    let club = services.clubs.get_club(seeded.club.id).await.expect("club");
    assert_eq!(club.stats.total_events, 1);
    assert_eq!(club.stats.total_members, 1);
    assert_eq!(club.stats.total_attendees, 1);
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL (set TEST_DATABASE_URL or have Docker available)"]
async fn recompute_for_missing_event_fails() {
    let db = TestDatabase::new().await.expect("test database");
    db.cleanup().await.expect("cleanup");
    let services = db.services();

    let err = services.stats.recompute_event_stats(424242).await.unwrap_err();
    assert_matches!(err, CampusEventsError::EventNotFound { event_id: 424242 });
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL (set TEST_DATABASE_URL or have Docker available)"]
async fn cancelled_events_do_not_count_toward_club_totals() {
    let db = TestDatabase::new().await.expect("test database");
    db.cleanup().await.expect("cleanup");
    let services = db.services();

    let seeded = seed_published_event(&services).await;
    let doomed = services
        .events
        .create_event(event_request(seeded.club.id, seeded.admin.id))
        .await
        .expect("second event");
    services
        .events
        .cancel_event(doomed.id)
        .await
        .expect("cancel");

    let club = services.clubs.get_club(seeded.club.id).await.expect("club");
    assert_eq!(club.stats.total_events, 1);
    assert_eq!(club.stats.total_members, 1);

    let recomputed = services
        .stats
        .recompute_club_stats(seeded.club.id)
        .await
        .expect("recompute");
    assert_eq!(recomputed.total_events, 1);
}
