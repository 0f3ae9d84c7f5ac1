//! Database service layer
//!
//! Aggregates the per-entity repositories behind one handle that the
//! service layer receives by injection.

use crate::database::{
    AttendanceRepository, ClubRepository, DatabasePool, EventRepository, FeedbackRepository,
    RegistrationRepository, UserRepository,
};

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pub clubs: ClubRepository,
    pub users: UserRepository,
    pub events: EventRepository,
    pub registrations: RegistrationRepository,
    pub attendance: AttendanceRepository,
    pub feedback: FeedbackRepository,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            clubs: ClubRepository::new(pool.clone()),
            users: UserRepository::new(pool.clone()),
            events: EventRepository::new(pool.clone()),
            registrations: RegistrationRepository::new(pool.clone()),
            attendance: AttendanceRepository::new(pool.clone()),
            feedback: FeedbackRepository::new(pool),
        }
    }
}
