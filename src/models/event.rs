//! Event model
//!
//! Events carry a denormalized `stats` block that is recomputed from the
//! registration, attendance and feedback tables by the stats service. The
//! pure checks that gate registration and check-in live here so they can
//! be exercised without a database.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Check-in opens this many minutes before an event starts and closes the
/// same amount after it ends.
pub const ATTENDANCE_WINDOW_MINUTES: i64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub club_id: i64,
    pub created_by: i64,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub location: String,
    pub venue: Option<String>,
    pub category: String,
    pub status: String,
    pub max_participants: Option<i32>,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub attendance_required: bool,
    pub qr_code: Option<String>,
    pub qr_code_expiry: Option<DateTime<Utc>>,
    #[sqlx(flatten)]
    pub stats: EventStats,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Derived counters for an event, rebuilt from source rows on every
/// child mutation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
pub struct EventStats {
    pub registrations: i64,
    pub attendance: i64,
    pub feedback_count: i64,
    pub average_rating: f64,
}

impl Event {
    pub fn status(&self) -> Option<EventStatus> {
        EventStatus::parse(&self.status)
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.ends_at - self.starts_at).num_minutes()
    }

    /// Start and end of the check-in window around the event.
    pub fn attendance_window(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let margin = Duration::minutes(ATTENDANCE_WINDOW_MINUTES);
        (self.starts_at - margin, self.ends_at + margin)
    }

    /// Whether a new registration would be accepted at `now`.
    ///
    /// Capacity rejects outright: a full event never auto-waitlists.
    pub fn can_register(&self, now: DateTime<Utc>) -> bool {
        if self.status() != Some(EventStatus::Published) {
            return false;
        }
        if let Some(deadline) = self.registration_deadline {
            if now > deadline {
                return false;
            }
        }
        if let Some(max) = self.max_participants {
            if self.stats.registrations >= max as i64 {
                return false;
            }
        }
        now < self.starts_at
    }

    /// Whether attendance may be marked at `now`.
    ///
    /// Completed is accepted alongside published because a published
    /// event flips to completed the moment `ends_at` passes, while the
    /// check-in window stays open for another margin.
    pub fn can_mark_attendance(&self, now: DateTime<Utc>) -> bool {
        if !matches!(
            self.status(),
            Some(EventStatus::Published | EventStatus::Completed)
        ) {
            return false;
        }
        if !self.attendance_required {
            return false;
        }
        let (open, close) = self.attendance_window();
        now >= open && now <= close
    }

    /// Registration window seen by a prospective registrant.
    pub fn registration_window(&self, now: DateTime<Utc>) -> RegistrationWindow {
        if let Some(deadline) = self.registration_deadline {
            if now > deadline {
                return RegistrationWindow::Closed;
            }
        }
        if now >= self.starts_at {
            return RegistrationWindow::Closed;
        }
        if let Some(max) = self.max_participants {
            if self.stats.registrations >= max as i64 {
                return RegistrationWindow::Full;
            }
        }
        RegistrationWindow::Open
    }

    /// Whether a published event's end time has passed and its status
    /// should lazily flip to completed on the next load-and-save.
    pub fn is_past_end(&self, now: DateTime<Utc>) -> bool {
        self.status() == Some(EventStatus::Published) && now > self.ends_at
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: String,
    pub club_id: i64,
    pub created_by: i64,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub location: String,
    pub venue: Option<String>,
    pub category: EventCategory,
    pub max_participants: Option<i32>,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub attendance_required: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub venue: Option<String>,
    pub max_participants: Option<i32>,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub attendance_required: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Draft,
    Published,
    Completed,
    Cancelled,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Draft => "draft",
            EventStatus::Published => "published",
            EventStatus::Completed => "completed",
            EventStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "draft" => Some(EventStatus::Draft),
            "published" => Some(EventStatus::Published),
            "completed" => Some(EventStatus::Completed),
            "cancelled" => Some(EventStatus::Cancelled),
            _ => None,
        }
    }

    /// Lifecycle: draft -> published -> {completed, cancelled}.
    /// Draft events may be cancelled directly. Terminal states stay put.
    pub fn can_transition_to(&self, to: EventStatus) -> bool {
        matches!(
            (self, to),
            (EventStatus::Draft, EventStatus::Published)
                | (EventStatus::Draft, EventStatus::Cancelled)
                | (EventStatus::Published, EventStatus::Completed)
                | (EventStatus::Published, EventStatus::Cancelled)
        )
    }
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    Academic,
    Cultural,
    Sports,
    Technical,
    Social,
    Workshop,
    Seminar,
    Competition,
}

impl EventCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::Academic => "academic",
            EventCategory::Cultural => "cultural",
            EventCategory::Sports => "sports",
            EventCategory::Technical => "technical",
            EventCategory::Social => "social",
            EventCategory::Workshop => "workshop",
            EventCategory::Seminar => "seminar",
            EventCategory::Competition => "competition",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "academic" => Some(EventCategory::Academic),
            "cultural" => Some(EventCategory::Cultural),
            "sports" => Some(EventCategory::Sports),
            "technical" => Some(EventCategory::Technical),
            "social" => Some(EventCategory::Social),
            "workshop" => Some(EventCategory::Workshop),
            "seminar" => Some(EventCategory::Seminar),
            "competition" => Some(EventCategory::Competition),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationWindow {
    Open,
    Closed,
    Full,
}
