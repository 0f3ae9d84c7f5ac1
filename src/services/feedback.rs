//! Feedback service implementation
//!
//! Feedback requires a prior attendance record and may only be submitted
//! once the event has ended. Every mutation refreshes the event's
//! feedback count and average rating.

use std::collections::HashMap;

use chrono::Utc;
use tracing::info;

use crate::database::{AttendanceRepository, EventRepository, FeedbackRepository};
use crate::models::feedback::{Feedback, SubmitFeedbackRequest};
use crate::services::event::load_event;
use crate::services::stats::{round_to_one_decimal, StatsService};
use crate::utils::errors::{CampusEventsError, Result};
use crate::utils::validation;

/// Aggregated feedback figures for an event
#[derive(Debug, Clone)]
pub struct FeedbackSummary {
    pub total_feedback: i64,
    pub average_rating: f64,
    pub rating_distribution: HashMap<i32, i64>,
}

#[derive(Debug, Clone)]
pub struct FeedbackService {
    feedback: FeedbackRepository,
    attendance: AttendanceRepository,
    events: EventRepository,
    stats: StatsService,
}

impl FeedbackService {
    pub fn new(
        feedback: FeedbackRepository,
        attendance: AttendanceRepository,
        events: EventRepository,
        stats: StatsService,
    ) -> Self {
        Self {
            feedback,
            attendance,
            events,
            stats,
        }
    }

    /// Submit feedback for an attended, ended event
    pub async fn submit(&self, request: SubmitFeedbackRequest) -> Result<Feedback> {
        validation::validate_rating(request.rating)?;
        validation::validate_optional_length("comment", request.comment.as_deref(), 1000)?;

        let SubmitFeedbackRequest {
            user_id,
            event_id,
            rating,
            comment,
            would_recommend,
            is_anonymous,
        } = request;

        let event = load_event(&self.events, event_id).await?;

        // Feedback requires a prior attendance record for the pair
        let attendance = self
            .attendance
            .find_by_user_and_event(user_id, event_id)
            .await?
            .ok_or(CampusEventsError::AttendanceRequired { user_id, event_id })?;

        if Utc::now() < event.ends_at {
            return Err(CampusEventsError::EventNotEnded { event_id });
        }

        if self
            .feedback
            .find_by_user_and_event(user_id, event_id)
            .await?
            .is_some()
        {
            return Err(CampusEventsError::FeedbackAlreadySubmitted { user_id, event_id });
        }

        let feedback = self
            .feedback
            .create(
                user_id,
                event_id,
                attendance.id,
                rating,
                comment,
                would_recommend,
                is_anonymous.unwrap_or(false),
            )
            .await?;
        info!(
            user_id = user_id,
            event_id = event_id,
            rating = rating,
            "Feedback submitted"
        );

        self.stats.refresh_event_stats(event_id).await;

        Ok(feedback)
    }

    /// Delete a feedback entry
    pub async fn delete(&self, feedback_id: i64) -> Result<()> {
        let feedback = self
            .feedback
            .find_by_id(feedback_id)
            .await?
            .ok_or(CampusEventsError::FeedbackNotFound { feedback_id })?;

        self.feedback.delete(feedback.id).await?;
        info!(
            user_id = feedback.user_id,
            event_id = feedback.event_id,
            "Feedback deleted"
        );

        self.stats.refresh_event_stats(feedback.event_id).await;

        Ok(())
    }

    /// List an event's feedback entries
    pub async fn list_for_event(&self, event_id: i64) -> Result<Vec<Feedback>> {
        load_event(&self.events, event_id).await?;
        self.feedback.find_by_event(event_id).await
    }

    /// Aggregated feedback figures for an event
    pub async fn event_summary(&self, event_id: i64) -> Result<FeedbackSummary> {
        load_event(&self.events, event_id).await?;

        let (total_feedback, average) = self.feedback.aggregate_for_event(event_id).await?;
        let rating_distribution: HashMap<i32, i64> = self
            .feedback
            .rating_distribution(event_id)
            .await?
            .into_iter()
            .collect();

        Ok(FeedbackSummary {
            total_feedback,
            average_rating: round_to_one_decimal(average.unwrap_or(0.0)),
            rating_distribution,
        })
    }
}
