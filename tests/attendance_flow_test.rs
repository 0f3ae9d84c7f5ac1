//! Check-in rules against a real PostgreSQL instance
//!
//! Event schedules are rewritten directly in the database so window
//! boundaries can be exercised without sleeping through real time.

mod helpers;

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use serial_test::serial;

use helpers::database_helper::TestDatabase;
use helpers::test_data::{seed_published_event, student_request};
use CampusEvents::models::attendance::{AttendanceMethod, MarkAttendanceRequest};
use CampusEvents::CampusEventsError;

fn mark_request(user_id: i64, event_id: i64, marked_by: i64) -> MarkAttendanceRequest {
    MarkAttendanceRequest {
        user_id,
        event_id,
        marked_by,
        method: AttendanceMethod::Manual,
        notes: None,
    }
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL (set TEST_DATABASE_URL or have Docker available)"]
async fn attendance_during_event_updates_event_and_club_counters() {
    let db = TestDatabase::new().await.expect("test database");
    db.cleanup().await.expect("cleanup");
    let services = db.services();

    let seeded = seed_published_event(&services).await;
    services
        .registrations
        .register(seeded.student.id, seeded.event.id)
        .await
        .expect("register");

    // Event is running right now
    let now = Utc::now();
    db.set_event_times(seeded.event.id, now - Duration::minutes(10), now + Duration::minutes(50))
        .await
        .expect("set times");

    let attendance = services
        .attendance
        .mark_attendance(mark_request(seeded.student.id, seeded.event.id, seeded.admin.id))
        .await
        .expect("mark attendance");
    assert_eq!(attendance.method, "manual");

    let event = services.events.get_event(seeded.event.id).await.expect("event");
    assert_eq!(event.stats.attendance, 1);

    let club = services.clubs.get_club(seeded.club.id).await.expect("club");
    assert_eq!(club.stats.total_attendees, 1);
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL (set TEST_DATABASE_URL or have Docker available)"]
async fn attendance_requires_an_active_registration() {
    let db = TestDatabase::new().await.expect("test database");
    db.cleanup().await.expect("cleanup");
    let services = db.services();

    let seeded = seed_published_event(&services).await;
    let walk_in = services
        .users
        .create_user(student_request())
        .await
        .expect("walk-in user");

    let now = Utc::now();
    db.set_event_times(seeded.event.id, now - Duration::minutes(10), now + Duration::minutes(50))
        .await
        .expect("set times");

    let err = services
        .attendance
        .mark_attendance(mark_request(walk_in.id, seeded.event.id, seeded.admin.id))
        .await
        .unwrap_err();
    assert_matches!(err, CampusEventsError::NotRegistered { .. });

    // A cancelled registration does not satisfy the prerequisite either
    services
        .registrations
        .register(seeded.student.id, seeded.event.id)
        .await
        .expect("register");
    db.execute_sql("UPDATE registrations SET status = 'cancelled', cancelled_at = NOW()")
        .await
        .expect("cancel directly");

    let err = services
        .attendance
        .mark_attendance(mark_request(seeded.student.id, seeded.event.id, seeded.admin.id))
        .await
        .unwrap_err();
    assert_matches!(err, CampusEventsError::NotRegistered { .. });
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL (set TEST_DATABASE_URL or have Docker available)"]
async fn attendance_window_closes_after_the_margin() {
    let db = TestDatabase::new().await.expect("test database");
    db.cleanup().await.expect("cleanup");
    let services = db.services();

    let seeded = seed_published_event(&services).await;
    services
        .registrations
        .register(seeded.student.id, seeded.event.id)
        .await
        .expect("register");

    // Ended 45 minutes ago, past the 30-minute grace period
    let now = Utc::now();
    db.set_event_times(
        seeded.event.id,
        now - Duration::minutes(120),
        now - Duration::minutes(45),
    )
    .await
    .expect("set times");

    let err = services
        .attendance
        .mark_attendance(mark_request(seeded.student.id, seeded.event.id, seeded.admin.id))
        .await
        .unwrap_err();
    assert_matches!(err, CampusEventsError::AttendanceWindowClosed { .. });
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL (set TEST_DATABASE_URL or have Docker available)"]
async fn grace_period_survives_lazy_completion() {
    let db = TestDatabase::new().await.expect("test database");
    db.cleanup().await.expect("cleanup");
    let services = db.services();

    let seeded = seed_published_event(&services).await;
    services
        .registrations
        .register(seeded.student.id, seeded.event.id)
        .await
        .expect("register");

    // Ended 10 minutes ago, still inside the grace period. Loading the
    // event flips it to completed first.
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
        .mark_attendance(mark_request(seeded.student.id, seeded.event.id, seeded.admin.id))
        .await
        .expect("check-in during grace period");

    let event = services.events.get_event(seeded.event.id).await.expect("event");
    assert_eq!(event.status, "completed");
    assert_eq!(event.stats.attendance, 1);
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL (set TEST_DATABASE_URL or have Docker available)"]
async fn duplicate_attendance_is_rejected() {
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
    db.set_event_times(seeded.event.id, now - Duration::minutes(10), now + Duration::minutes(50))
        .await
        .expect("set times");

    services
        .attendance
        .mark_attendance(mark_request(seeded.student.id, seeded.event.id, seeded.admin.id))
        .await
        .expect("first check-in");

    let err = services
        .attendance
        .mark_attendance(mark_request(seeded.student.id, seeded.event.id, seeded.admin.id))
        .await
        .unwrap_err();
    assert_matches!(err, CampusEventsError::AlreadyAttended { .. });
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL (set TEST_DATABASE_URL or have Docker available)"]
async fn check_in_token_requires_a_positive_lifetime() {
    let db = TestDatabase::new().await.expect("test database");
    db.cleanup().await.expect("cleanup");
    let services = db.services();

    let seeded = seed_published_event(&services).await;

    for ttl in [0, -5] {
        let err = services
            .events
            .issue_qr_code(seeded.event.id, ttl)
            .await
            .unwrap_err();
        assert_matches!(err, CampusEventsError::Validation(_));
    }

    let event = services
        .events
        .issue_qr_code(seeded.event.id, 30)
        .await
        .expect("issue token");
    assert!(event.qr_code.is_some());
    assert!(event.qr_code_expiry.expect("expiry") > Utc::now());
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL (set TEST_DATABASE_URL or have Docker available)"]
async fn event_summary_reports_rate_and_method_breakdown() {
    let db = TestDatabase::new().await.expect("test database");
    db.cleanup().await.expect("cleanup");
    let services = db.services();

    let seeded = seed_published_event(&services).await;
    let second = services
        .users
        .create_user(student_request())
        .await
        .expect("second student");

    services
        .registrations
        .register(seeded.student.id, seeded.event.id)
        .await
        .expect("register first");
    services
        .registrations
        .register(second.id, seeded.event.id)
        .await
        .expect("register second");

    let now = Utc::now();
    db.set_event_times(seeded.event.id, now - Duration::minutes(10), now + Duration::minutes(50))
        .await
        .expect("set times");

    services
        .attendance
        .mark_attendance(mark_request(seeded.student.id, seeded.event.id, seeded.admin.id))
        .await
        .expect("check-in");

    let summary = services
        .attendance
        .event_summary(seeded.event.id)
        .await
        .expect("summary");
    assert_eq!(summary.total_registrations, 2);
    assert_eq!(summary.total_attendance, 1);
    assert!((summary.attendance_rate - 50.0).abs() < f64::EPSILON);
    assert_eq!(summary.method_breakdown.get("manual"), Some(&1));
}
