//! User account rules against a real PostgreSQL instance

mod helpers;

use assert_matches::assert_matches;
use serial_test::serial;

use helpers::database_helper::TestDatabase;
use helpers::test_data::student_request;
use CampusEvents::models::user::UpdateUserRequest;
use CampusEvents::CampusEventsError;

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL (set TEST_DATABASE_URL or have Docker available)"]
async fn update_stores_student_id_uppercased() {
    let db = TestDatabase::new().await.expect("test database");
    db.cleanup().await.expect("cleanup");
    let services = db.services();

    let user = services
        .users
        .create_user(student_request())
        .await
        .expect("create user");

    // Lowercase and padded input is normalized before it is persisted
    let updated = services
        .users
        .update_user(
            user.id,
            UpdateUserRequest {
                student_id: Some(" cs2021b42 ".to_string()),
                ..Default::default()
            },
        )
        .await
        .expect("update user");
    assert_eq!(updated.student_id.as_deref(), Some("CS2021B42"));

    let fetched = services.users.get_user(user.id).await.expect("fetch");
    assert_eq!(fetched.student_id.as_deref(), Some("CS2021B42"));

    // Values invalid even after normalization are still rejected
    let err = services
        .users
        .update_user(
            user.id,
            UpdateUserRequest {
                student_id: Some("cs-2021".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_matches!(err, CampusEventsError::Validation(_));
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL (set TEST_DATABASE_URL or have Docker available)"]
async fn list_users_clamps_limits_to_the_configured_cap() {
    let db = TestDatabase::new().await.expect("test database");
    db.cleanup().await.expect("cleanup");
    let services = db.services();

    for _ in 0..3 {
        services
            .users
            .create_user(student_request())
            .await
            .expect("create user");
    }

    // Oversized limits are clamped, not rejected
    let all = services.users.list_users(100_000, 0).await.expect("list");
    assert_eq!(all.len(), 3);

    // Degenerate limits are clamped up to a single row
    let one = services.users.list_users(0, 0).await.expect("list");
    assert_eq!(one.len(), 1);
}
