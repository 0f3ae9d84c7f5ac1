//! Attendance repository implementation

use chrono::Utc;
use sqlx::PgPool;

use crate::models::attendance::Attendance;
use crate::utils::errors::CampusEventsError;

const ATTENDANCE_COLUMNS: &str =
    "id, user_id, event_id, registration_id, marked_by, method, notes, marked_at, created_at";

#[derive(Debug, Clone)]
pub struct AttendanceRepository {
    pool: PgPool,
}

impl AttendanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record an attendance. The (user_id, event_id) unique index rejects
    /// a second check-in for the same pair.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        user_id: i64,
        event_id: i64,
        registration_id: i64,
        marked_by: i64,
        method: &str,
        notes: Option<String>,
    ) -> Result<Attendance, CampusEventsError> {
        let attendance = sqlx::query_as::<_, Attendance>(&format!(
            r#"
            INSERT INTO attendance (user_id, event_id, registration_id, marked_by, method, notes, marked_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {ATTENDANCE_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(event_id)
        .bind(registration_id)
        .bind(marked_by)
        .bind(method)
        .bind(notes)
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(attendance)
    }

    /// Find attendance by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Attendance>, CampusEventsError> {
        let attendance = sqlx::query_as::<_, Attendance>(&format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(attendance)
    }

    /// Find the attendance record for a (user, event) pair
    pub async fn find_by_user_and_event(
        &self,
        user_id: i64,
        event_id: i64,
    ) -> Result<Option<Attendance>, CampusEventsError> {
        let attendance = sqlx::query_as::<_, Attendance>(&format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance WHERE user_id = $1 AND event_id = $2"
        ))
        .bind(user_id)
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(attendance)
    }

    /// List an event's attendance records
    pub async fn find_by_event(&self, event_id: i64) -> Result<Vec<Attendance>, CampusEventsError> {
        let records = sqlx::query_as::<_, Attendance>(&format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance WHERE event_id = $1 ORDER BY marked_at ASC"
        ))
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Delete attendance record
    pub async fn delete(&self, id: i64) -> Result<(), CampusEventsError> {
        sqlx::query("DELETE FROM attendance WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Count an event's attendance records (feeds the event stats)
    pub async fn count_for_event(&self, event_id: i64) -> Result<i64, CampusEventsError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM attendance WHERE event_id = $1")
            .bind(event_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    /// Count distinct attendees across a club's events (feeds the club stats)
    pub async fn count_distinct_attendees_for_club(
        &self,
        club_id: i64,
    ) -> Result<i64, CampusEventsError> {
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(DISTINCT a.user_id)
            FROM attendance a
            INNER JOIN events e ON e.id = a.event_id
            WHERE e.club_id = $1
            "#,
        )
        .bind(club_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }

    /// Per-method attendance counts for an event
    pub async fn method_breakdown(
        &self,
        event_id: i64,
    ) -> Result<Vec<(String, i64)>, CampusEventsError> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT method, COUNT(*) FROM attendance WHERE event_id = $1 GROUP BY method",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
