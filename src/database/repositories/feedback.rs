//! Feedback repository implementation

use chrono::Utc;
use sqlx::PgPool;

use crate::models::feedback::Feedback;
use crate::utils::errors::CampusEventsError;

const FEEDBACK_COLUMNS: &str = "id, user_id, event_id, attendance_id, rating, comment, \
     would_recommend, is_anonymous, submitted_at, created_at";

#[derive(Debug, Clone)]
pub struct FeedbackRepository {
    pool: PgPool,
}

impl FeedbackRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Store a feedback entry. The (user_id, event_id) unique index
    /// rejects a second submission for the same pair.
    pub async fn create(
        &self,
        user_id: i64,
        event_id: i64,
        attendance_id: i64,
        rating: i32,
        comment: Option<String>,
        would_recommend: Option<bool>,
        is_anonymous: bool,
    ) -> Result<Feedback, CampusEventsError> {
        let feedback = sqlx::query_as::<_, Feedback>(&format!(
            r#"
            INSERT INTO feedback (user_id, event_id, attendance_id, rating, comment, would_recommend, is_anonymous, submitted_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {FEEDBACK_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(event_id)
        .bind(attendance_id)
        .bind(rating)
        .bind(comment)
        .bind(would_recommend)
        .bind(is_anonymous)
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(feedback)
    }

    /// Find feedback by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Feedback>, CampusEventsError> {
        let feedback = sqlx::query_as::<_, Feedback>(&format!(
            "SELECT {FEEDBACK_COLUMNS} FROM feedback WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(feedback)
    }

    /// Find the feedback for a (user, event) pair
    pub async fn find_by_user_and_event(
        &self,
        user_id: i64,
        event_id: i64,
    ) -> Result<Option<Feedback>, CampusEventsError> {
        let feedback = sqlx::query_as::<_, Feedback>(&format!(
            "SELECT {FEEDBACK_COLUMNS} FROM feedback WHERE user_id = $1 AND event_id = $2"
        ))
        .bind(user_id)
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(feedback)
    }

    /// List an event's feedback entries
    pub async fn find_by_event(&self, event_id: i64) -> Result<Vec<Feedback>, CampusEventsError> {
        let entries = sqlx::query_as::<_, Feedback>(&format!(
            "SELECT {FEEDBACK_COLUMNS} FROM feedback WHERE event_id = $1 ORDER BY submitted_at DESC"
        ))
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Delete feedback
    pub async fn delete(&self, id: i64) -> Result<(), CampusEventsError> {
        sqlx::query("DELETE FROM feedback WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Count and average rating for an event in one aggregation pass.
    /// The average is `None` when no feedback exists.
    pub async fn aggregate_for_event(
        &self,
        event_id: i64,
    ) -> Result<(i64, Option<f64>), CampusEventsError> {
        let row: (i64, Option<f64>) = sqlx::query_as(
            "SELECT COUNT(*), AVG(rating)::float8 FROM feedback WHERE event_id = $1",
        )
        .bind(event_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// Rating histogram for an event (rating value, count)
    pub async fn rating_distribution(
        &self,
        event_id: i64,
    ) -> Result<Vec<(i32, i64)>, CampusEventsError> {
        let rows: Vec<(i32, i64)> = sqlx::query_as(
            "SELECT rating, COUNT(*) FROM feedback WHERE event_id = $1 GROUP BY rating ORDER BY rating ASC"
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
