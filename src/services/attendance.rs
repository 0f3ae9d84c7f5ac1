//! Attendance service implementation
//!
//! Check-in requires an active registration and an open attendance
//! window. Attendance mutations feed both the event's counters and the
//! owning club's unique-attendee counter, so both are refreshed.

use std::collections::HashMap;

use chrono::Utc;
use tracing::info;

use crate::database::{AttendanceRepository, EventRepository, RegistrationRepository, UserRepository};
use crate::models::attendance::{Attendance, MarkAttendanceRequest};
use crate::services::event::load_event;
use crate::services::stats::StatsService;
use crate::utils::errors::{CampusEventsError, Result};
use crate::utils::validation;

/// Registration-versus-attendance summary for an event
#[derive(Debug, Clone)]
pub struct AttendanceSummary {
    pub total_registrations: i64,
    pub total_attendance: i64,
    pub attendance_rate: f64,
    pub method_breakdown: HashMap<String, i64>,
}

#[derive(Debug, Clone)]
pub struct AttendanceService {
    attendance: AttendanceRepository,
    registrations: RegistrationRepository,
    events: EventRepository,
    users: UserRepository,
    stats: StatsService,
}

impl AttendanceService {
    pub fn new(
        attendance: AttendanceRepository,
        registrations: RegistrationRepository,
        events: EventRepository,
        users: UserRepository,
        stats: StatsService,
    ) -> Self {
        Self {
            attendance,
            registrations,
            events,
            users,
            stats,
        }
    }

    /// Mark a user's attendance at an event
    pub async fn mark_attendance(&self, request: MarkAttendanceRequest) -> Result<Attendance> {
        validation::validate_optional_length("notes", request.notes.as_deref(), 500)?;

        let MarkAttendanceRequest {
            user_id,
            event_id,
            marked_by,
            method,
            notes,
        } = request;

        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(CampusEventsError::UserNotFound { user_id })?;
        self.users
            .find_by_id(marked_by)
            .await?
            .ok_or(CampusEventsError::UserNotFound { user_id: marked_by })?;

        let event = load_event(&self.events, event_id).await?;

        // Attendance requires an active registration for the pair
        let registration = self
            .registrations
            .find_by_user_and_event(user_id, event_id)
            .await?
            .filter(|r| r.is_active())
            .ok_or(CampusEventsError::NotRegistered { user_id, event_id })?;

        if !event.can_mark_attendance(Utc::now()) {
            return Err(CampusEventsError::AttendanceWindowClosed { event_id });
        }

        if self
            .attendance
            .find_by_user_and_event(user_id, event_id)
            .await?
            .is_some()
        {
            return Err(CampusEventsError::AlreadyAttended { user_id, event_id });
        }

        let attendance = self
            .attendance
            .create(
                user_id,
                event_id,
                registration.id,
                marked_by,
                method.as_str(),
                notes,
            )
            .await?;
        info!(
            user_id = user_id,
            event_id = event_id,
            method = %method,
            "Attendance marked"
        );

        self.stats.refresh_event_stats(event_id).await;
        self.stats.refresh_club_stats(event.club_id).await;

        Ok(attendance)
    }

    /// Remove an attendance record
    pub async fn remove_attendance(&self, attendance_id: i64) -> Result<()> {
        let attendance = self
            .attendance
            .find_by_id(attendance_id)
            .await?
            .ok_or(CampusEventsError::AttendanceNotFound { attendance_id })?;

        let event = load_event(&self.events, attendance.event_id).await?;

        self.attendance.delete(attendance.id).await?;
        info!(
            user_id = attendance.user_id,
            event_id = attendance.event_id,
            "Attendance record removed"
        );

        self.stats.refresh_event_stats(attendance.event_id).await;
        self.stats.refresh_club_stats(event.club_id).await;

        Ok(())
    }

    /// Get the attendance record for a (user, event) pair
    pub async fn get(&self, user_id: i64, event_id: i64) -> Result<Option<Attendance>> {
        self.attendance.find_by_user_and_event(user_id, event_id).await
    }

    /// List an event's attendance records
    pub async fn list_for_event(&self, event_id: i64) -> Result<Vec<Attendance>> {
        load_event(&self.events, event_id).await?;
        self.attendance.find_by_event(event_id).await
    }

    /// Registration-versus-attendance summary for an event
    pub async fn event_summary(&self, event_id: i64) -> Result<AttendanceSummary> {
        load_event(&self.events, event_id).await?;

        let total_registrations = self.registrations.count_registered(event_id).await?;
        let total_attendance = self.attendance.count_for_event(event_id).await?;
        let method_breakdown: HashMap<String, i64> = self
            .attendance
            .method_breakdown(event_id)
            .await?
            .into_iter()
            .collect();

        let attendance_rate = if total_registrations > 0 {
            (total_attendance as f64 / total_registrations as f64) * 100.0
        } else {
            0.0
        };

        Ok(AttendanceSummary {
            total_registrations,
            total_attendance,
            attendance_rate,
            method_breakdown,
        })
    }
}
