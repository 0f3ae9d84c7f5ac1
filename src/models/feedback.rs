//! Feedback model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Feedback {
    pub id: i64,
    pub user_id: i64,
    pub event_id: i64,
    pub attendance_id: i64,
    pub rating: i32,
    pub comment: Option<String>,
    pub would_recommend: Option<bool>,
    pub is_anonymous: bool,
    pub submitted_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitFeedbackRequest {
    pub user_id: i64,
    pub event_id: i64,
    pub rating: i32,
    pub comment: Option<String>,
    pub would_recommend: Option<bool>,
    pub is_anonymous: Option<bool>,
}
