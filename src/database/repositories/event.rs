//! Event repository implementation

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::models::event::{CreateEventRequest, Event, EventStats, EventStatus, UpdateEventRequest};
use crate::utils::errors::CampusEventsError;

const EVENT_COLUMNS: &str = "id, title, description, club_id, created_by, starts_at, ends_at, \
     location, venue, category, status, max_participants, registration_deadline, \
     attendance_required, qr_code, qr_code_expiry, registrations, attendance, \
     feedback_count, average_rating, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new event (always starts as a draft)
    pub async fn create(&self, request: CreateEventRequest) -> Result<Event, CampusEventsError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            INSERT INTO events (title, description, club_id, created_by, starts_at, ends_at,
                                location, venue, category, max_participants,
                                registration_deadline, attendance_required, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(request.title)
        .bind(request.description)
        .bind(request.club_id)
        .bind(request.created_by)
        .bind(request.starts_at)
        .bind(request.ends_at)
        .bind(request.location)
        .bind(request.venue)
        .bind(request.category.as_str())
        .bind(request.max_participants)
        .bind(request.registration_deadline)
        .bind(request.attendance_required.unwrap_or(true))
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// Find event by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Event>, CampusEventsError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// Update event fields
    pub async fn update(
        &self,
        id: i64,
        request: UpdateEventRequest,
    ) -> Result<Event, CampusEventsError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            UPDATE events
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                starts_at = COALESCE($4, starts_at),
                ends_at = COALESCE($5, ends_at),
                location = COALESCE($6, location),
                venue = COALESCE($7, venue),
                max_participants = COALESCE($8, max_participants),
                registration_deadline = COALESCE($9, registration_deadline),
                attendance_required = COALESCE($10, attendance_required),
                updated_at = $11
            WHERE id = $1
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(request.title)
        .bind(request.description)
        .bind(request.starts_at)
        .bind(request.ends_at)
        .bind(request.location)
        .bind(request.venue)
        .bind(request.max_participants)
        .bind(request.registration_deadline)
        .bind(request.attendance_required)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// Move an event to a new lifecycle status
    pub async fn update_status(
        &self,
        id: i64,
        status: EventStatus,
    ) -> Result<Event, CampusEventsError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            UPDATE events
            SET status = $2, updated_at = $3
            WHERE id = $1
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status.as_str())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// Attach a check-in token to an event
    pub async fn set_qr_code(
        &self,
        id: i64,
        qr_code: &str,
        expiry: DateTime<Utc>,
    ) -> Result<Event, CampusEventsError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            UPDATE events
            SET qr_code = $2, qr_code_expiry = $3, updated_at = $4
            WHERE id = $1
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(qr_code)
        .bind(expiry)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// Persist recomputed stats onto an event
    pub async fn update_stats(
        &self,
        id: i64,
        stats: &EventStats,
    ) -> Result<(), CampusEventsError> {
        sqlx::query(
            r#"
            UPDATE events
            SET registrations = $2,
                attendance = $3,
                feedback_count = $4,
                average_rating = $5,
                updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(stats.registrations)
        .bind(stats.attendance)
        .bind(stats.feedback_count)
        .bind(stats.average_rating)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Delete event
    pub async fn delete(&self, id: i64) -> Result<(), CampusEventsError> {
        sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// List published events
    pub async fn find_published(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Event>, CampusEventsError> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE status = 'published' ORDER BY starts_at ASC LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// List published events that have not started yet
    pub async fn find_upcoming(&self, limit: i64) -> Result<Vec<Event>, CampusEventsError> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE status = 'published' AND starts_at > NOW() ORDER BY starts_at ASC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// List a club's events
    pub async fn find_by_club(&self, club_id: i64) -> Result<Vec<Event>, CampusEventsError> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE club_id = $1 ORDER BY starts_at ASC"
        ))
        .bind(club_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// List all event IDs (used by the stats rebuild pass)
    pub async fn list_ids(&self) -> Result<Vec<i64>, CampusEventsError> {
        let ids: Vec<(i64,)> = sqlx::query_as("SELECT id FROM events ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(ids.into_iter().map(|(id,)| id).collect())
    }

    /// Count a club's non-cancelled events (feeds the club event total)
    pub async fn count_active_for_club(&self, club_id: i64) -> Result<i64, CampusEventsError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM events WHERE club_id = $1 AND status <> 'cancelled'",
        )
        .bind(club_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }
}
