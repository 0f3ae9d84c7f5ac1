//! Derived-statistics service
//!
//! Keeps the cached `stats` block on events and clubs consistent with the
//! source rows. Recomputation is always a full re-aggregation filtered by
//! the owning foreign key, never an incremental counter bump, so running
//! it any number of times yields the same result.
//!
//! The write-path services call the `refresh_*` wrappers after a committed
//! mutation: those log failures and swallow them, because the triggering
//! write has already committed and must not fail. The `recompute_*`
//! methods surface errors normally for the rebuild pass and tests.

use tracing::{debug, info};

use crate::database::{
    AttendanceRepository, ClubRepository, EventRepository, FeedbackRepository,
    RegistrationRepository, UserRepository,
};
use crate::models::club::ClubStats;
use crate::models::event::EventStats;
use crate::utils::errors::{CampusEventsError, Result};
use crate::utils::logging::log_stats_refresh;

/// Round a mean rating to one decimal place
pub fn round_to_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[derive(Debug, Clone)]
pub struct StatsService {
    clubs: ClubRepository,
    users: UserRepository,
    events: EventRepository,
    registrations: RegistrationRepository,
    attendance: AttendanceRepository,
    feedback: FeedbackRepository,
}

/// Outcome of a full stats rebuild pass
#[derive(Debug, Clone, Copy, Default)]
pub struct RebuildSummary {
    pub events: usize,
    pub clubs: usize,
}

impl StatsService {
    pub fn new(
        clubs: ClubRepository,
        users: UserRepository,
        events: EventRepository,
        registrations: RegistrationRepository,
        attendance: AttendanceRepository,
        feedback: FeedbackRepository,
    ) -> Self {
        Self {
            clubs,
            users,
            events,
            registrations,
            attendance,
            feedback,
        }
    }

    /// Re-aggregate an event's counters from the registration, attendance
    /// and feedback tables and persist them onto the event row.
    pub async fn recompute_event_stats(&self, event_id: i64) -> Result<EventStats> {
        let event = self
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(CampusEventsError::EventNotFound { event_id })?;

        let registrations = self.registrations.count_registered(event_id).await?;
        let attendance = self.attendance.count_for_event(event_id).await?;
        let (feedback_count, average) = self.feedback.aggregate_for_event(event_id).await?;

        let stats = EventStats {
            registrations,
            attendance,
            feedback_count,
            average_rating: round_to_one_decimal(average.unwrap_or(0.0)),
        };

        self.events.update_stats(event.id, &stats).await?;
        debug!(event_id = event_id, ?stats, "Event stats recomputed");

        Ok(stats)
    }

    /// Re-aggregate a club's counters from its events, admins and the
    /// attendance rows of its events, and persist them onto the club row.
    pub async fn recompute_club_stats(&self, club_id: i64) -> Result<ClubStats> {
        let club = self
            .clubs
            .find_by_id(club_id)
            .await?
            .ok_or(CampusEventsError::ClubNotFound { club_id })?;

        let total_events = self.events.count_active_for_club(club_id).await?;
        let total_members = self.users.count_club_admins(club_id).await?;
        let total_attendees = self
            .attendance
            .count_distinct_attendees_for_club(club_id)
            .await?;

        let stats = ClubStats {
            total_events,
            total_members,
            total_attendees,
        };

        self.clubs.update_stats(club.id, &stats).await?;
        debug!(club_id = club_id, ?stats, "Club stats recomputed");

        Ok(stats)
    }

    /// Best-effort refresh of an event's stats after a committed write.
    /// Failures are logged and swallowed.
    pub async fn refresh_event_stats(&self, event_id: i64) {
        match self.recompute_event_stats(event_id).await {
            Ok(_) => log_stats_refresh("event", event_id, true, None),
            Err(e) => log_stats_refresh("event", event_id, false, Some(&e.to_string())),
        }
    }

    /// Best-effort refresh of a club's stats after a committed write.
    /// Failures are logged and swallowed.
    pub async fn refresh_club_stats(&self, club_id: i64) {
        match self.recompute_club_stats(club_id).await {
            Ok(_) => log_stats_refresh("club", club_id, true, None),
            Err(e) => log_stats_refresh("club", club_id, false, Some(&e.to_string())),
        }
    }

    /// Rebuild every derived counter in the store from source rows.
    /// Backs the maintenance binary; counters are caches and can always
    /// be reconstructed this way.
    pub async fn rebuild_all(&self) -> Result<RebuildSummary> {
        let mut summary = RebuildSummary::default();

        for event_id in self.events.list_ids().await? {
            self.recompute_event_stats(event_id).await?;
            summary.events += 1;
        }

        for club_id in self.clubs.list_ids().await? {
            self.recompute_club_stats(club_id).await?;
            summary.clubs += 1;
        }

        info!(
            events = summary.events,
            clubs = summary.clubs,
            "Derived statistics rebuilt from source rows"
        );

        Ok(summary)
    }
}
