//! Data models module
//!
//! Row structs for the six entity collections plus the request types the
//! repositories accept. Status columns are stored as strings; each model
//! carries a typed helper enum next to it.

pub mod attendance;
pub mod club;
pub mod event;
pub mod feedback;
pub mod registration;
pub mod user;

// Re-export commonly used models
pub use attendance::{Attendance, AttendanceMethod, MarkAttendanceRequest};
pub use club::{Club, ClubStats, CreateClubRequest, UpdateClubRequest};
pub use event::{
    CreateEventRequest, Event, EventCategory, EventStats, EventStatus, RegistrationWindow,
    UpdateEventRequest, ATTENDANCE_WINDOW_MINUTES,
};
pub use feedback::{Feedback, SubmitFeedbackRequest};
pub use registration::{CreateRegistrationRequest, Registration, RegistrationStatus};
pub use user::{CreateUserRequest, UpdateUserRequest, User, UserRole};
