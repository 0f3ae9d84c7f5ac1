//! User service implementation
//!
//! Handles account creation and profile updates with schema-level
//! validation. Club admins count toward their club's member total, so any
//! mutation touching a club_admin refreshes the affected club's stats.

use tracing::info;

use crate::config::settings::Settings;
use crate::database::{ClubRepository, UserRepository};
use crate::models::user::{CreateUserRequest, UpdateUserRequest, User, UserRole};
use crate::services::stats::StatsService;
use crate::utils::errors::{CampusEventsError, Result};
use crate::utils::validation;

#[derive(Debug, Clone)]
pub struct UserService {
    users: UserRepository,
    clubs: ClubRepository,
    stats: StatsService,
    settings: Settings,
}

impl UserService {
    pub fn new(
        users: UserRepository,
        clubs: ClubRepository,
        stats: StatsService,
        settings: Settings,
    ) -> Self {
        Self {
            users,
            clubs,
            stats,
            settings,
        }
    }

    /// Create a new user account
    pub async fn create_user(&self, mut request: CreateUserRequest) -> Result<User> {
        validation::validate_email(&request.email)?;
        validation::validate_length("first name", &request.first_name, 2, 50)?;
        validation::validate_length("last name", &request.last_name, 2, 50)?;

        // Student IDs are stored uppercase
        if let Some(student_id) = request.student_id.take() {
            let student_id = student_id.trim().to_uppercase();
            validation::validate_student_id(&student_id)?;
            request.student_id = Some(student_id);
        }

        // The club_admin role requires an owning club
        if request.role == UserRole::ClubAdmin {
            let club_id = request.club_id.ok_or_else(|| {
                CampusEventsError::Validation(
                    "club admins must belong to a club".to_string(),
                )
            })?;
            self.clubs
                .find_by_id(club_id)
                .await?
                .ok_or(CampusEventsError::ClubNotFound { club_id })?;
        }

        if self.users.find_by_email(&request.email).await?.is_some() {
            return Err(CampusEventsError::Validation(format!(
                "email already registered: {}",
                request.email
            )));
        }

        let role = request.role;
        let club_id = request.club_id;
        let user = self.users.create(request).await?;
        info!(user_id = user.id, role = %role, "User created");

        if role == UserRole::ClubAdmin {
            if let Some(club_id) = club_id {
                self.stats.refresh_club_stats(club_id).await;
            }
        }

        Ok(user)
    }

    /// Get user by ID
    pub async fn get_user(&self, user_id: i64) -> Result<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(CampusEventsError::UserNotFound { user_id })
    }

    /// Get user by email
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.users.find_by_email(email).await
    }

    /// Update a user's profile. Role or club changes can move a club
    /// admin between clubs, so both the old and the new club are
    /// refreshed.
    pub async fn update_user(&self, user_id: i64, mut request: UpdateUserRequest) -> Result<User> {
        if let Some(ref first_name) = request.first_name {
            validation::validate_length("first name", first_name, 2, 50)?;
        }
        if let Some(ref last_name) = request.last_name {
            validation::validate_length("last name", last_name, 2, 50)?;
        }
        // Student IDs are stored uppercase, same as on create
        if let Some(student_id) = request.student_id.take() {
            let student_id = student_id.trim().to_uppercase();
            validation::validate_student_id(&student_id)?;
            request.student_id = Some(student_id);
        }

        let existing = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(CampusEventsError::UserNotFound { user_id })?;

        if request.role == Some(UserRole::ClubAdmin)
            && request.club_id.or(existing.club_id).is_none()
        {
            return Err(CampusEventsError::Validation(
                "club admins must belong to a club".to_string(),
            ));
        }

        let user = self.users.update(user_id, request).await?;
        info!(user_id = user_id, "User profile updated");

        let was_admin_of = existing.is_club_admin().then_some(existing.club_id).flatten();
        let is_admin_of = user.is_club_admin().then_some(user.club_id).flatten();
        if let Some(club_id) = was_admin_of {
            self.stats.refresh_club_stats(club_id).await;
        }
        if let Some(club_id) = is_admin_of.filter(|id| Some(*id) != was_admin_of) {
            self.stats.refresh_club_stats(club_id).await;
        }

        Ok(user)
    }

    /// Deactivate a user account
    pub async fn deactivate_user(&self, user_id: i64) -> Result<User> {
        let existing = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(CampusEventsError::UserNotFound { user_id })?;

        let user = self.users.set_active_status(user_id, false).await?;
        info!(user_id = user_id, "User deactivated");

        if existing.is_club_admin() {
            if let Some(club_id) = existing.club_id {
                self.stats.refresh_club_stats(club_id).await;
            }
        }

        Ok(user)
    }

    /// List users with pagination, clamped to the configured page cap
    pub async fn list_users(&self, limit: i64, offset: i64) -> Result<Vec<User>> {
        let limit = limit.clamp(1, self.settings.pagination.max_page_size);
        self.users.list(limit, offset).await
    }
}
