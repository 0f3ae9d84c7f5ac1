//! Field validation helpers
//!
//! Schema-level constraints shared by the services. Every function rejects
//! bad input with `CampusEventsError::Validation` before anything is
//! written to the database.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::models::feedback::{MAX_RATING, MIN_RATING};
use crate::utils::errors::{CampusEventsError, Result};

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap())
}

fn student_id_regex() -> &'static Regex {
    static STUDENT_ID: OnceLock<Regex> = OnceLock::new();
    STUDENT_ID.get_or_init(|| Regex::new(r"^[A-Z0-9]+$").unwrap())
}

/// Validate an email address
pub fn validate_email(email: &str) -> Result<()> {
    if !email_regex().is_match(email) {
        return Err(CampusEventsError::Validation(format!(
            "invalid email address: {email}"
        )));
    }
    Ok(())
}

/// Validate a student ID (uppercase letters and digits only)
pub fn validate_student_id(student_id: &str) -> Result<()> {
    if !student_id_regex().is_match(student_id) {
        return Err(CampusEventsError::Validation(
            "student ID may contain only uppercase letters and digits".to_string(),
        ));
    }
    Ok(())
}

/// Validate a required text field against length bounds
pub fn validate_length(field: &str, value: &str, min: usize, max: usize) -> Result<()> {
    let len = value.trim().chars().count();
    if len < min {
        return Err(CampusEventsError::Validation(format!(
            "{field} must be at least {min} characters"
        )));
    }
    if len > max {
        return Err(CampusEventsError::Validation(format!(
            "{field} cannot exceed {max} characters"
        )));
    }
    Ok(())
}

/// Validate an optional text field against a maximum length
pub fn validate_optional_length(field: &str, value: Option<&str>, max: usize) -> Result<()> {
    if let Some(value) = value {
        if value.trim().chars().count() > max {
            return Err(CampusEventsError::Validation(format!(
                "{field} cannot exceed {max} characters"
            )));
        }
    }
    Ok(())
}

/// Validate a feedback rating
pub fn validate_rating(rating: i32) -> Result<()> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(CampusEventsError::Validation(format!(
            "rating must be between {MIN_RATING} and {MAX_RATING}"
        )));
    }
    Ok(())
}

/// Validate the time window of an event at creation
pub fn validate_event_times(
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
    registration_deadline: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<()> {
    if starts_at <= now {
        return Err(CampusEventsError::Validation(
            "event start time must be in the future".to_string(),
        ));
    }
    if ends_at <= starts_at {
        return Err(CampusEventsError::Validation(
            "event end time must be after the start time".to_string(),
        ));
    }
    if let Some(deadline) = registration_deadline {
        if deadline > starts_at {
            return Err(CampusEventsError::Validation(
                "registration deadline must be before the event start time".to_string(),
            ));
        }
    }
    Ok(())
}

/// Validate an optional participant limit
pub fn validate_max_participants(max_participants: Option<i32>) -> Result<()> {
    if let Some(max) = max_participants {
        if max < 1 {
            return Err(CampusEventsError::Validation(
                "maximum participants must be at least 1".to_string(),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("student@college.edu").is_ok());
        assert!(validate_email("no-at-sign.edu").is_err());
        assert!(validate_email("spaces in@mail.edu").is_err());
        assert!(validate_email("nodomain@").is_err());
    }

    #[test]
    fn test_validate_student_id() {
        assert!(validate_student_id("CS2021A17").is_ok());
        assert!(validate_student_id("cs2021a17").is_err());
        assert!(validate_student_id("CS-2021").is_err());
    }

    #[test]
    fn test_validate_length() {
        assert!(validate_length("title", "Robotics workshop", 3, 100).is_ok());
        assert!(validate_length("title", "ab", 3, 100).is_err());
        assert!(validate_length("title", &"x".repeat(101), 3, 100).is_err());
        // Leading/trailing whitespace does not count toward the minimum
        assert!(validate_length("title", "  a  ", 3, 100).is_err());
    }

    #[test]
    fn test_validate_rating() {
        for rating in 1..=5 {
            assert!(validate_rating(rating).is_ok());
        }
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(6).is_err());
    }

    #[test]
    fn test_validate_event_times() {
        let now = Utc::now();
        let starts = now + Duration::days(1);
        let ends = starts + Duration::hours(2);

        assert!(validate_event_times(starts, ends, None, now).is_ok());
        assert!(validate_event_times(now - Duration::hours(1), ends, None, now).is_err());
        assert!(validate_event_times(starts, starts, None, now).is_err());
        assert!(
            validate_event_times(starts, ends, Some(starts + Duration::hours(1)), now).is_err()
        );
        assert!(
            validate_event_times(starts, ends, Some(starts - Duration::hours(1)), now).is_ok()
        );
    }

    #[test]
    fn test_validate_max_participants() {
        assert!(validate_max_participants(None).is_ok());
        assert!(validate_max_participants(Some(1)).is_ok());
        assert!(validate_max_participants(Some(0)).is_err());
    }
}
