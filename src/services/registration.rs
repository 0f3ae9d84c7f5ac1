//! Registration service implementation
//!
//! Write-path orchestrator for event registrations: prerequisite checks
//! run before the write, and the event's derived stats are refreshed
//! right after a committed mutation.

use chrono::Utc;
use tracing::info;

use crate::database::{EventRepository, RegistrationRepository, UserRepository};
use crate::models::event::RegistrationWindow;
use crate::models::registration::{CreateRegistrationRequest, Registration};
use crate::services::event::load_event;
use crate::services::stats::StatsService;
use crate::utils::errors::{CampusEventsError, Result};

#[derive(Debug, Clone)]
pub struct RegistrationService {
    registrations: RegistrationRepository,
    events: EventRepository,
    users: UserRepository,
    stats: StatsService,
}

impl RegistrationService {
    pub fn new(
        registrations: RegistrationRepository,
        events: EventRepository,
        users: UserRepository,
        stats: StatsService,
    ) -> Self {
        Self {
            registrations,
            events,
            users,
            stats,
        }
    }

    /// Register a user for an event.
    ///
    /// A full event rejects the registration outright; capacity never
    /// auto-waitlists.
    pub async fn register(&self, user_id: i64, event_id: i64) -> Result<Registration> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(CampusEventsError::UserNotFound { user_id })?;
        if !user.is_active {
            return Err(CampusEventsError::Validation(
                "inactive users cannot register for events".to_string(),
            ));
        }

        let event = load_event(&self.events, event_id).await?;

        // One registration row per (user, event), whatever its status
        if self
            .registrations
            .find_by_user_and_event(user_id, event_id)
            .await?
            .is_some()
        {
            return Err(CampusEventsError::AlreadyRegistered { user_id, event_id });
        }

        let now = Utc::now();
        if !event.can_register(now) {
            return Err(match event.registration_window(now) {
                RegistrationWindow::Full => CampusEventsError::EventFull { event_id },
                _ => CampusEventsError::RegistrationClosed {
                    event_id,
                    reason: "event is not open for registration".to_string(),
                },
            });
        }

        let registration = self
            .registrations
            .create(CreateRegistrationRequest {
                user_id,
                event_id,
                status: None,
            })
            .await?;
        info!(user_id = user_id, event_id = event_id, "User registered for event");

        self.stats.refresh_event_stats(event_id).await;

        Ok(registration)
    }

    /// Cancel a registration before the event starts. Stamps the
    /// cancellation timestamp and optional reason; the transition is
    /// one-way.
    pub async fn cancel(
        &self,
        user_id: i64,
        event_id: i64,
        reason: Option<String>,
    ) -> Result<Registration> {
        let registration = self
            .registrations
            .find_by_user_and_event(user_id, event_id)
            .await?
            .ok_or(CampusEventsError::RegistrationNotFound { user_id, event_id })?;

        if !registration.is_active() {
            return Err(CampusEventsError::InvalidStateTransition {
                from: registration.status.clone(),
                to: "cancelled".to_string(),
            });
        }

        let event = load_event(&self.events, event_id).await?;
        if Utc::now() >= event.starts_at {
            return Err(CampusEventsError::Validation(
                "registrations cannot be cancelled after the event has started".to_string(),
            ));
        }

        let cancelled = self.registrations.cancel(registration.id, reason).await?;
        info!(user_id = user_id, event_id = event_id, "Registration cancelled");

        self.stats.refresh_event_stats(event_id).await;

        Ok(cancelled)
    }

    /// Remove a registration row entirely (administrative cleanup)
    pub async fn remove(&self, user_id: i64, event_id: i64) -> Result<()> {
        let registration = self
            .registrations
            .find_by_user_and_event(user_id, event_id)
            .await?
            .ok_or(CampusEventsError::RegistrationNotFound { user_id, event_id })?;

        self.registrations.delete(registration.id).await?;
        info!(user_id = user_id, event_id = event_id, "Registration removed");

        self.stats.refresh_event_stats(event_id).await;

        Ok(())
    }

    /// Get the registration for a (user, event) pair
    pub async fn get(&self, user_id: i64, event_id: i64) -> Result<Registration> {
        self.registrations
            .find_by_user_and_event(user_id, event_id)
            .await?
            .ok_or(CampusEventsError::RegistrationNotFound { user_id, event_id })
    }

    /// List an event's registrations
    pub async fn list_for_event(&self, event_id: i64) -> Result<Vec<Registration>> {
        load_event(&self.events, event_id).await?;
        self.registrations.find_by_event(event_id).await
    }

    /// List a user's registrations
    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<Registration>> {
        self.registrations.find_by_user(user_id).await
    }
}
