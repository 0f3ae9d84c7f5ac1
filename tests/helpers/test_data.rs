//! Request builders and seed scenarios for the integration tests
//!
//! Every builder generates unique emails, student IDs, and club names so
//! tests can run back to back against the same database.

use chrono::{Duration, Utc};
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use uuid::Uuid;

use CampusEvents::models::club::{Club, CreateClubRequest};
use CampusEvents::models::event::{CreateEventRequest, Event, EventCategory};
use CampusEvents::models::user::{CreateUserRequest, User, UserRole};
use CampusEvents::services::ServiceFactory;

pub fn unique_suffix() -> String {
    Uuid::new_v4().to_string().replace('-', "")[..8].to_string()
}

pub fn club_request(name: &str) -> CreateClubRequest {
    CreateClubRequest {
        name: name.to_string(),
        description: Some("A club created by the integration tests".to_string()),
        contact_email: Some(format!("club.{}@campus.test", unique_suffix())),
    }
}

pub fn student_request() -> CreateUserRequest {
    let suffix = unique_suffix();
    CreateUserRequest {
        email: format!("student.{suffix}@campus.test"),
        first_name: FirstName().fake(),
        last_name: LastName().fake(),
        student_id: Some(format!("S{}", suffix.to_uppercase())),
        role: UserRole::Student,
        club_id: None,
    }
}

pub fn club_admin_request(club_id: i64) -> CreateUserRequest {
    let suffix = unique_suffix();
    CreateUserRequest {
        email: format!("admin.{suffix}@campus.test"),
        first_name: FirstName().fake(),
        last_name: LastName().fake(),
        student_id: None,
        role: UserRole::ClubAdmin,
        club_id: Some(club_id),
    }
}

/// Event starting a day from now, two hours long
pub fn event_request(club_id: i64, created_by: i64) -> CreateEventRequest {
    let starts_at = Utc::now() + Duration::hours(24);
    CreateEventRequest {
        title: "Intro to Robotics".to_string(),
        description: "Hands-on robotics workshop for beginners".to_string(),
        club_id,
        created_by,
        starts_at,
        ends_at: starts_at + Duration::hours(2),
        location: "Engineering Hall".to_string(),
        venue: Some("Room 204".to_string()),
        category: EventCategory::Workshop,
        max_participants: None,
        registration_deadline: None,
        attendance_required: Some(true),
    }
}

pub struct Seeded {
    pub club: Club,
    pub admin: User,
    pub student: User,
    pub event: Event,
}

/// Club, its admin, a student, and a published event
pub async fn seed_published_event(services: &ServiceFactory) -> Seeded {
    let club = services
        .clubs
        .create_club(club_request(&format!("Robotics Club {}", unique_suffix())))
        .await
        .expect("Failed to create club");
    let admin = services
        .users
        .create_user(club_admin_request(club.id))
        .await
        .expect("Failed to create admin");
    let student = services
        .users
        .create_user(student_request())
        .await
        .expect("Failed to create student");

    let event = services
        .events
        .create_event(event_request(club.id, admin.id))
        .await
        .expect("Failed to create event");
    let event = services
        .events
        .publish_event(event.id)
        .await
        .expect("Failed to publish event");

    Seeded {
        club,
        admin,
        student,
        event,
    }
}
