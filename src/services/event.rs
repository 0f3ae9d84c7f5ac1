//! Event service implementation
//!
//! Owns the event lifecycle: creation with field validation, the
//! draft -> published -> {completed, cancelled} state machine, lazy
//! auto-completion of past events, and check-in token issuance. Every
//! mutation that can change a club's event count refreshes the club's
//! derived stats afterwards.

use chrono::{Duration, Utc};
use tracing::{debug, info};

use crate::config::settings::Settings;
use crate::database::{ClubRepository, EventRepository, UserRepository};
use crate::models::event::{CreateEventRequest, Event, EventStatus, UpdateEventRequest};
use crate::services::stats::StatsService;
use crate::utils::errors::{CampusEventsError, Result};
use crate::utils::helpers::generate_random_string;
use crate::utils::validation;

/// Load an event, lazily flipping a published event whose end time has
/// passed to `completed`. There is no background timer; completion is
/// applied on the next load after the event ends.
pub(crate) async fn load_event(events: &EventRepository, event_id: i64) -> Result<Event> {
    let event = events
        .find_by_id(event_id)
        .await?
        .ok_or(CampusEventsError::EventNotFound { event_id })?;

    if event.is_past_end(Utc::now()) {
        let completed = events.update_status(event.id, EventStatus::Completed).await?;
        debug!(event_id = event_id, "Event auto-completed on load");
        return Ok(completed);
    }

    Ok(event)
}

#[derive(Debug, Clone)]
pub struct EventService {
    events: EventRepository,
    clubs: ClubRepository,
    users: UserRepository,
    stats: StatsService,
    settings: Settings,
}

impl EventService {
    pub fn new(
        events: EventRepository,
        clubs: ClubRepository,
        users: UserRepository,
        stats: StatsService,
        settings: Settings,
    ) -> Self {
        Self {
            events,
            clubs,
            users,
            stats,
            settings,
        }
    }

    /// Create a new draft event
    pub async fn create_event(&self, request: CreateEventRequest) -> Result<Event> {
        validation::validate_length("title", &request.title, 3, 100)?;
        validation::validate_length("description", &request.description, 10, 2000)?;
        validation::validate_length("location", &request.location, 1, 200)?;
        validation::validate_optional_length("venue", request.venue.as_deref(), 100)?;
        validation::validate_event_times(
            request.starts_at,
            request.ends_at,
            request.registration_deadline,
            Utc::now(),
        )?;
        validation::validate_max_participants(request.max_participants)?;

        let club_id = request.club_id;
        self.clubs
            .find_by_id(club_id)
            .await?
            .ok_or(CampusEventsError::ClubNotFound { club_id })?;
        let creator_id = request.created_by;
        self.users
            .find_by_id(creator_id)
            .await?
            .ok_or(CampusEventsError::UserNotFound { user_id: creator_id })?;

        let event = self.events.create(request).await?;
        info!(
            event_id = event.id,
            club_id = club_id,
            user_id = creator_id,
            "Event created"
        );

        self.stats.refresh_club_stats(club_id).await;

        Ok(event)
    }

    /// Get an event by ID, applying lazy completion
    pub async fn get_event(&self, event_id: i64) -> Result<Event> {
        load_event(&self.events, event_id).await
    }

    /// Update an event's editable fields
    pub async fn update_event(&self, event_id: i64, request: UpdateEventRequest) -> Result<Event> {
        let event = load_event(&self.events, event_id).await?;

        match event.status() {
            Some(EventStatus::Draft) | Some(EventStatus::Published) => {}
            _ => {
                return Err(CampusEventsError::Validation(format!(
                    "cannot edit an event in the {} state",
                    event.status
                )))
            }
        }

        if let Some(ref title) = request.title {
            validation::validate_length("title", title, 3, 100)?;
        }
        if let Some(ref description) = request.description {
            validation::validate_length("description", description, 10, 2000)?;
        }
        if let Some(ref location) = request.location {
            validation::validate_length("location", location, 1, 200)?;
        }
        validation::validate_optional_length("venue", request.venue.as_deref(), 100)?;
        validation::validate_max_participants(request.max_participants)?;

        // Validate the merged time window, not just the changed fields
        let starts_at = request.starts_at.unwrap_or(event.starts_at);
        let ends_at = request.ends_at.unwrap_or(event.ends_at);
        if ends_at <= starts_at {
            return Err(CampusEventsError::Validation(
                "event end time must be after the start time".to_string(),
            ));
        }
        let deadline = request.registration_deadline.or(event.registration_deadline);
        if let Some(deadline) = deadline {
            if deadline > starts_at {
                return Err(CampusEventsError::Validation(
                    "registration deadline must be before the event start time".to_string(),
                ));
            }
        }

        let updated = self.events.update(event_id, request).await?;
        info!(event_id = event_id, "Event updated");

        Ok(updated)
    }

    /// Publish a draft event
    pub async fn publish_event(&self, event_id: i64) -> Result<Event> {
        self.transition(event_id, EventStatus::Published).await
    }

    /// Cancel an event. Cancelled events no longer count toward the club's
    /// event total, so the club stats are refreshed.
    pub async fn cancel_event(&self, event_id: i64) -> Result<Event> {
        let event = self.transition(event_id, EventStatus::Cancelled).await?;
        self.stats.refresh_club_stats(event.club_id).await;
        Ok(event)
    }

    /// Delete an event outright
    pub async fn delete_event(&self, event_id: i64) -> Result<()> {
        let event = load_event(&self.events, event_id).await?;

        self.events.delete(event.id).await?;
        info!(event_id = event_id, club_id = event.club_id, "Event deleted");

        self.stats.refresh_club_stats(event.club_id).await;

        Ok(())
    }

    /// Issue a fresh check-in token for a published event
    pub async fn issue_qr_code(&self, event_id: i64, ttl_minutes: i64) -> Result<Event> {
        if ttl_minutes < 1 {
            return Err(CampusEventsError::Validation(
                "check-in token lifetime must be at least 1 minute".to_string(),
            ));
        }

        let event = load_event(&self.events, event_id).await?;

        if event.status() != Some(EventStatus::Published) {
            return Err(CampusEventsError::Validation(
                "check-in tokens can only be issued for published events".to_string(),
            ));
        }

        let token = generate_random_string(32);
        let expiry = Utc::now() + Duration::minutes(ttl_minutes);
        let event = self.events.set_qr_code(event.id, &token, expiry).await?;
        info!(event_id = event_id, "Check-in token issued");

        Ok(event)
    }

    /// List published events with pagination
    pub async fn list_published(&self, limit: i64, offset: i64) -> Result<Vec<Event>> {
        let limit = self.clamp_limit(limit);
        self.events.find_published(limit, offset).await
    }

    /// List published events that have not started yet
    pub async fn list_upcoming(&self, limit: Option<i64>) -> Result<Vec<Event>> {
        let limit = self.clamp_limit(limit.unwrap_or(self.settings.pagination.default_page_size));
        self.events.find_upcoming(limit).await
    }

    /// List a club's events
    pub async fn list_by_club(&self, club_id: i64) -> Result<Vec<Event>> {
        self.clubs
            .find_by_id(club_id)
            .await?
            .ok_or(CampusEventsError::ClubNotFound { club_id })?;
        self.events.find_by_club(club_id).await
    }

    async fn transition(&self, event_id: i64, to: EventStatus) -> Result<Event> {
        let event = load_event(&self.events, event_id).await?;

        let from = event
            .status()
            .ok_or_else(|| CampusEventsError::Validation(format!(
                "event has an unknown status: {}",
                event.status
            )))?;

        if !from.can_transition_to(to) {
            return Err(CampusEventsError::InvalidStateTransition {
                from: from.to_string(),
                to: to.to_string(),
            });
        }

        let event = self.events.update_status(event.id, to).await?;
        info!(event_id = event_id, from = %from, to = %to, "Event status changed");

        Ok(event)
    }

    fn clamp_limit(&self, limit: i64) -> i64 {
        limit.clamp(1, self.settings.pagination.max_page_size)
    }
}
