//! Services module
//!
//! Business logic on top of the repositories. The write-path services
//! (events, registrations, attendance, feedback, users) invoke the stats
//! service explicitly after each committed mutation; there are no
//! schema-attached hooks.

pub mod attendance;
pub mod club;
pub mod event;
pub mod feedback;
pub mod registration;
pub mod stats;
pub mod user;

// Re-export commonly used services
pub use attendance::{AttendanceService, AttendanceSummary};
pub use club::ClubService;
pub use event::EventService;
pub use feedback::{FeedbackService, FeedbackSummary};
pub use registration::RegistrationService;
pub use stats::{RebuildSummary, StatsService};
pub use user::UserService;

use crate::config::settings::Settings;
use crate::database::DatabaseService;

/// Service factory for creating and wiring all services
///
/// Repositories are passed in explicitly so every dependency is visible
/// at construction time.
#[derive(Debug, Clone)]
pub struct ServiceFactory {
    pub clubs: ClubService,
    pub users: UserService,
    pub events: EventService,
    pub registrations: RegistrationService,
    pub attendance: AttendanceService,
    pub feedback: FeedbackService,
    pub stats: StatsService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(db: DatabaseService, settings: Settings) -> Self {
        let stats = StatsService::new(
            db.clubs.clone(),
            db.users.clone(),
            db.events.clone(),
            db.registrations.clone(),
            db.attendance.clone(),
            db.feedback.clone(),
        );

        let clubs = ClubService::new(db.clubs.clone());
        let users = UserService::new(
            db.users.clone(),
            db.clubs.clone(),
            stats.clone(),
            settings.clone(),
        );
        let events = EventService::new(
            db.events.clone(),
            db.clubs.clone(),
            db.users.clone(),
            stats.clone(),
            settings,
        );
        let registrations = RegistrationService::new(
            db.registrations.clone(),
            db.events.clone(),
            db.users.clone(),
            stats.clone(),
        );
        let attendance = AttendanceService::new(
            db.attendance.clone(),
            db.registrations.clone(),
            db.events.clone(),
            db.users.clone(),
            stats.clone(),
        );
        let feedback = FeedbackService::new(
            db.feedback,
            db.attendance,
            db.events,
            stats.clone(),
        );

        Self {
            clubs,
            users,
            events,
            registrations,
            attendance,
            feedback,
            stats,
        }
    }
}
