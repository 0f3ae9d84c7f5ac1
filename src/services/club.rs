//! Club service implementation

use tracing::info;

use crate::database::ClubRepository;
use crate::models::club::{Club, CreateClubRequest, UpdateClubRequest};
use crate::utils::errors::{CampusEventsError, Result};
use crate::utils::validation;

#[derive(Debug, Clone)]
pub struct ClubService {
    clubs: ClubRepository,
}

impl ClubService {
    pub fn new(clubs: ClubRepository) -> Self {
        Self { clubs }
    }

    /// Create a new club. Club names are unique.
    pub async fn create_club(&self, request: CreateClubRequest) -> Result<Club> {
        validation::validate_length("club name", &request.name, 2, 100)?;
        validation::validate_optional_length("description", request.description.as_deref(), 500)?;
        if let Some(ref email) = request.contact_email {
            validation::validate_email(email)?;
        }

        if self.clubs.find_by_name(&request.name).await?.is_some() {
            return Err(CampusEventsError::Validation(format!(
                "club name already taken: {}",
                request.name
            )));
        }

        let club = self.clubs.create(request).await?;
        info!(club_id = club.id, "Club created");

        Ok(club)
    }

    /// Get club by ID
    pub async fn get_club(&self, club_id: i64) -> Result<Club> {
        self.clubs
            .find_by_id(club_id)
            .await?
            .ok_or(CampusEventsError::ClubNotFound { club_id })
    }

    /// Update a club's profile
    pub async fn update_club(&self, club_id: i64, request: UpdateClubRequest) -> Result<Club> {
        if let Some(ref name) = request.name {
            validation::validate_length("club name", name, 2, 100)?;
            if let Some(existing) = self.clubs.find_by_name(name).await? {
                if existing.id != club_id {
                    return Err(CampusEventsError::Validation(format!(
                        "club name already taken: {name}"
                    )));
                }
            }
        }
        validation::validate_optional_length("description", request.description.as_deref(), 500)?;
        if let Some(ref email) = request.contact_email {
            validation::validate_email(email)?;
        }

        self.clubs
            .find_by_id(club_id)
            .await?
            .ok_or(CampusEventsError::ClubNotFound { club_id })?;

        let club = self.clubs.update(club_id, request).await?;
        info!(club_id = club_id, "Club updated");

        Ok(club)
    }

    /// List active clubs with pagination
    pub async fn list_active(&self, limit: i64, offset: i64) -> Result<Vec<Club>> {
        self.clubs.list_active(limit, offset).await
    }
}
