//! Registration repository implementation

use chrono::Utc;
use sqlx::PgPool;

use crate::models::registration::{CreateRegistrationRequest, Registration, RegistrationStatus};
use crate::utils::errors::CampusEventsError;

const REGISTRATION_COLUMNS: &str = "id, user_id, event_id, status, registered_at, cancelled_at, \
     cancellation_reason, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct RegistrationRepository {
    pool: PgPool,
}

impl RegistrationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new registration. The (user_id, event_id) unique index
    /// rejects duplicates at the storage layer.
    pub async fn create(
        &self,
        request: CreateRegistrationRequest,
    ) -> Result<Registration, CampusEventsError> {
        let registration = sqlx::query_as::<_, Registration>(&format!(
            r#"
            INSERT INTO registrations (user_id, event_id, status, registered_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {REGISTRATION_COLUMNS}
            "#
        ))
        .bind(request.user_id)
        .bind(request.event_id)
        .bind(request.status.unwrap_or(RegistrationStatus::Registered).as_str())
        .bind(Utc::now())
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(registration)
    }

    /// Find registration by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Registration>, CampusEventsError> {
        let registration = sqlx::query_as::<_, Registration>(&format!(
            "SELECT {REGISTRATION_COLUMNS} FROM registrations WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(registration)
    }

    /// Find the registration for a (user, event) pair
    pub async fn find_by_user_and_event(
        &self,
        user_id: i64,
        event_id: i64,
    ) -> Result<Option<Registration>, CampusEventsError> {
        let registration = sqlx::query_as::<_, Registration>(&format!(
            "SELECT {REGISTRATION_COLUMNS} FROM registrations WHERE user_id = $1 AND event_id = $2"
        ))
        .bind(user_id)
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(registration)
    }

    /// List an event's registrations
    pub async fn find_by_event(
        &self,
        event_id: i64,
    ) -> Result<Vec<Registration>, CampusEventsError> {
        let registrations = sqlx::query_as::<_, Registration>(&format!(
            "SELECT {REGISTRATION_COLUMNS} FROM registrations WHERE event_id = $1 ORDER BY registered_at ASC"
        ))
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(registrations)
    }

    /// List a user's registrations
    pub async fn find_by_user(&self, user_id: i64) -> Result<Vec<Registration>, CampusEventsError> {
        let registrations = sqlx::query_as::<_, Registration>(&format!(
            "SELECT {REGISTRATION_COLUMNS} FROM registrations WHERE user_id = $1 ORDER BY registered_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(registrations)
    }

    /// Cancel a registration, stamping the timestamp and optional reason
    pub async fn cancel(
        &self,
        id: i64,
        reason: Option<String>,
    ) -> Result<Registration, CampusEventsError> {
        let registration = sqlx::query_as::<_, Registration>(&format!(
            r#"
            UPDATE registrations
            SET status = 'cancelled',
                cancelled_at = $2,
                cancellation_reason = $3,
                updated_at = $4
            WHERE id = $1
            RETURNING {REGISTRATION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(Utc::now())
        .bind(reason)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(registration)
    }

    /// Delete registration
    pub async fn delete(&self, id: i64) -> Result<(), CampusEventsError> {
        sqlx::query("DELETE FROM registrations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Count an event's active registrations (feeds the event stats)
    pub async fn count_registered(&self, event_id: i64) -> Result<i64, CampusEventsError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM registrations WHERE event_id = $1 AND status = 'registered'",
        )
        .bind(event_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }
}
