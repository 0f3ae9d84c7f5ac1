//! Error handling for CampusEvents
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy. Validation and
//! prerequisite failures are rejected before any write; stats refresh
//! failures are logged by the stats service and never surfaced.

use thiserror::Error;

/// Main error type for the CampusEvents application
#[derive(Error, Debug)]
pub enum CampusEventsError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("User not found: {user_id}")]
    UserNotFound { user_id: i64 },

    #[error("Club not found: {club_id}")]
    ClubNotFound { club_id: i64 },

    #[error("Event not found: {event_id}")]
    EventNotFound { event_id: i64 },

    #[error("Registration not found for user {user_id} on event {event_id}")]
    RegistrationNotFound { user_id: i64, event_id: i64 },

    #[error("Feedback not found: {feedback_id}")]
    FeedbackNotFound { feedback_id: i64 },

    #[error("Attendance record not found: {attendance_id}")]
    AttendanceNotFound { attendance_id: i64 },

    #[error("User {user_id} is already registered for event {event_id}")]
    AlreadyRegistered { user_id: i64, event_id: i64 },

    #[error("Attendance already marked for user {user_id} on event {event_id}")]
    AlreadyAttended { user_id: i64, event_id: i64 },

    #[error("Feedback already submitted by user {user_id} for event {event_id}")]
    FeedbackAlreadySubmitted { user_id: i64, event_id: i64 },

    #[error("Registration is closed for event {event_id}: {reason}")]
    RegistrationClosed { event_id: i64, reason: String },

    #[error("Event {event_id} has reached its participant limit")]
    EventFull { event_id: i64 },

    #[error("Attendance window is closed for event {event_id}")]
    AttendanceWindowClosed { event_id: i64 },

    #[error("User {user_id} is not actively registered for event {event_id}")]
    NotRegistered { user_id: i64, event_id: i64 },

    #[error("User {user_id} has no attendance record for event {event_id}")]
    AttendanceRequired { user_id: i64, event_id: i64 },

    #[error("Event {event_id} has not ended yet")]
    EventNotEnded { event_id: i64 },

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for CampusEvents operations
pub type Result<T> = std::result::Result<T, CampusEventsError>;

impl CampusEventsError {
    /// Whether the error was caused by the caller's input or request state
    /// rather than by the platform itself.
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            CampusEventsError::Database(_)
                | CampusEventsError::Migration(_)
                | CampusEventsError::Config(_)
                | CampusEventsError::Serialization(_)
                | CampusEventsError::Io(_)
        )
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CampusEventsError::Database(_) => ErrorSeverity::Critical,
            CampusEventsError::Migration(_) => ErrorSeverity::Critical,
            CampusEventsError::Config(_) => ErrorSeverity::Critical,
            CampusEventsError::Serialization(_) => ErrorSeverity::Error,
            CampusEventsError::Io(_) => ErrorSeverity::Error,
            CampusEventsError::InvalidStateTransition { .. } => ErrorSeverity::Warning,
            _ => ErrorSeverity::Info,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
