//! Database repositories module
//!
//! This module contains all repository implementations for data access

pub mod attendance;
pub mod club;
pub mod event;
pub mod feedback;
pub mod registration;
pub mod user;

// Re-export repositories
pub use attendance::AttendanceRepository;
pub use club::ClubRepository;
pub use event::EventRepository;
pub use feedback::FeedbackRepository;
pub use registration::RegistrationRepository;
pub use user::UserRepository;
