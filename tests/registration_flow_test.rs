//! Registration lifecycle against a real PostgreSQL instance
//!
//! Run with `cargo test -- --ignored` and either TEST_DATABASE_URL set
//! or Docker available for testcontainers.

mod helpers;

use assert_matches::assert_matches;
use serial_test::serial;

use helpers::database_helper::TestDatabase;
use helpers::test_data::{event_request, seed_published_event, student_request};
use CampusEvents::models::registration::RegistrationStatus;
use CampusEvents::CampusEventsError;

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL (set TEST_DATABASE_URL or have Docker available)"]
async fn register_updates_event_counters() {
    let db = TestDatabase::new().await.expect("test database");
    db.cleanup().await.expect("cleanup");
    let services = db.services();

    let seeded = seed_published_event(&services).await;

    let registration = services
        .registrations
        .register(seeded.student.id, seeded.event.id)
        .await
        .expect("registration should succeed");
    assert_eq!(registration.status(), Some(RegistrationStatus::Registered));

    let event = services.events.get_event(seeded.event.id).await.expect("event");
    assert_eq!(event.stats.registrations, 1);
    assert_eq!(event.stats.attendance, 0);
    assert_eq!(event.stats.feedback_count, 0);
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL (set TEST_DATABASE_URL or have Docker available)"]
async fn duplicate_registration_is_rejected() {
    let db = TestDatabase::new().await.expect("test database");
    db.cleanup().await.expect("cleanup");
    let services = db.services();

    let seeded = seed_published_event(&services).await;

    services
        .registrations
        .register(seeded.student.id, seeded.event.id)
        .await
        .expect("first registration");

    let err = services
        .registrations
        .register(seeded.student.id, seeded.event.id)
        .await
        .unwrap_err();
    assert_matches!(err, CampusEventsError::AlreadyRegistered { .. });

    // A cancelled registration still blocks re-registration
    services
        .registrations
        .cancel(seeded.student.id, seeded.event.id, None)
        .await
        .expect("cancel");
    let err = services
        .registrations
        .register(seeded.student.id, seeded.event.id)
        .await
        .unwrap_err();
    assert_matches!(err, CampusEventsError::AlreadyRegistered { .. });
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL (set TEST_DATABASE_URL or have Docker available)"]
async fn full_event_rejects_instead_of_waitlisting() {
    let db = TestDatabase::new().await.expect("test database");
    db.cleanup().await.expect("cleanup");
    let services = db.services();

    let seeded = seed_published_event(&services).await;

    let mut request = event_request(seeded.club.id, seeded.admin.id);
    request.title = "Tiny Workshop".to_string();
    request.max_participants = Some(1);
    let event = services.events.create_event(request).await.expect("event");
    let event = services.events.publish_event(event.id).await.expect("publish");

    let second = services
        .users
        .create_user(student_request())
        .await
        .expect("second student");

    services
        .registrations
        .register(seeded.student.id, event.id)
        .await
        .expect("fills the single slot");

    let err = services
        .registrations
        .register(second.id, event.id)
        .await
        .unwrap_err();
    assert_matches!(err, CampusEventsError::EventFull { .. });

    // No waitlist row was created for the rejected user
    let registrations = services
        .registrations
        .list_for_event(event.id)
        .await
        .expect("list");
    assert_eq!(registrations.len(), 1);
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL (set TEST_DATABASE_URL or have Docker available)"]
async fn cancellation_is_one_way_and_updates_counters() {
    let db = TestDatabase::new().await.expect("test database");
    db.cleanup().await.expect("cleanup");
    let services = db.services();

    let seeded = seed_published_event(&services).await;

    services
        .registrations
        .register(seeded.student.id, seeded.event.id)
        .await
        .expect("register");

    let cancelled = services
        .registrations
        .cancel(
            seeded.student.id,
            seeded.event.id,
            Some("schedule conflict".to_string()),
        )
        .await
        .expect("cancel");
    assert_eq!(cancelled.status(), Some(RegistrationStatus::Cancelled));
    assert!(cancelled.cancelled_at.is_some());
    assert_eq!(cancelled.cancellation_reason.as_deref(), Some("schedule conflict"));

    let event = services.events.get_event(seeded.event.id).await.expect("event");
    assert_eq!(event.stats.registrations, 0);

    let err = services
        .registrations
        .cancel(seeded.student.id, seeded.event.id, None)
        .await
        .unwrap_err();
    assert_matches!(err, CampusEventsError::InvalidStateTransition { .. });
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL (set TEST_DATABASE_URL or have Docker available)"]
async fn draft_event_does_not_accept_registrations() {
    let db = TestDatabase::new().await.expect("test database");
    db.cleanup().await.expect("cleanup");
    let services = db.services();

    let seeded = seed_published_event(&services).await;

    let draft = services
        .events
        .create_event(event_request(seeded.club.id, seeded.admin.id))
        .await
        .expect("draft event");

    let err = services
        .registrations
        .register(seeded.student.id, draft.id)
        .await
        .unwrap_err();
    assert_matches!(err, CampusEventsError::RegistrationClosed { .. });
}
