//! Club repository implementation

use chrono::Utc;
use sqlx::PgPool;

use crate::models::club::{Club, ClubStats, CreateClubRequest, UpdateClubRequest};
use crate::utils::errors::CampusEventsError;

const CLUB_COLUMNS: &str = "id, name, description, contact_email, is_active, \
     total_events, total_members, total_attendees, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct ClubRepository {
    pool: PgPool,
}

impl ClubRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new club
    pub async fn create(&self, request: CreateClubRequest) -> Result<Club, CampusEventsError> {
        let club = sqlx::query_as::<_, Club>(&format!(
            r#"
            INSERT INTO clubs (name, description, contact_email, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {CLUB_COLUMNS}
            "#
        ))
        .bind(request.name)
        .bind(request.description)
        .bind(request.contact_email)
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(club)
    }

    /// Find club by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Club>, CampusEventsError> {
        let club = sqlx::query_as::<_, Club>(&format!(
            "SELECT {CLUB_COLUMNS} FROM clubs WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(club)
    }

    /// Find club by name
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Club>, CampusEventsError> {
        let club = sqlx::query_as::<_, Club>(&format!(
            "SELECT {CLUB_COLUMNS} FROM clubs WHERE name = $1"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(club)
    }

    /// Update club
    pub async fn update(
        &self,
        id: i64,
        request: UpdateClubRequest,
    ) -> Result<Club, CampusEventsError> {
        let club = sqlx::query_as::<_, Club>(&format!(
            r#"
            UPDATE clubs
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                contact_email = COALESCE($4, contact_email),
                is_active = COALESCE($5, is_active),
                updated_at = $6
            WHERE id = $1
            RETURNING {CLUB_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(request.name)
        .bind(request.description)
        .bind(request.contact_email)
        .bind(request.is_active)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(club)
    }

    /// Delete club
    pub async fn delete(&self, id: i64) -> Result<(), CampusEventsError> {
        sqlx::query("DELETE FROM clubs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// List active clubs with pagination
    pub async fn list_active(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Club>, CampusEventsError> {
        let clubs = sqlx::query_as::<_, Club>(&format!(
            "SELECT {CLUB_COLUMNS} FROM clubs WHERE is_active = true ORDER BY name ASC LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(clubs)
    }

    /// List all club IDs (used by the stats rebuild pass)
    pub async fn list_ids(&self) -> Result<Vec<i64>, CampusEventsError> {
        let ids: Vec<(i64,)> = sqlx::query_as("SELECT id FROM clubs ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(ids.into_iter().map(|(id,)| id).collect())
    }

    /// Persist recomputed stats onto a club
    pub async fn update_stats(
        &self,
        id: i64,
        stats: &ClubStats,
    ) -> Result<(), CampusEventsError> {
        sqlx::query(
            r#"
            UPDATE clubs
            SET total_events = $2,
                total_members = $3,
                total_attendees = $4,
                updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(stats.total_events)
        .bind(stats.total_members)
        .bind(stats.total_attendees)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
