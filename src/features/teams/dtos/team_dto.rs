use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::teams::models::Team;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TeamResponseDto {
    pub id: Uuid,
    pub name: String,
    pub leader: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub specialization: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Team> for TeamResponseDto {
    fn from(t: Team) -> Self {
        Self {
            id: t.id,
            name: t.name,
            leader: t.leader,
            contact_email: t.contact_email,
            contact_phone: t.contact_phone,
            specialization: t.specialization,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

/// Request DTO for creating a team
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateTeamDto {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(max = 100))]
    pub leader: Option<String>,

    #[validate(email(message = "Invalid email address"))]
    pub contact_email: Option<String>,

    #[validate(length(min = 5, max = 30, message = "Phone must be 5-30 characters"))]
    pub contact_phone: Option<String>,

    /// e.g. "mains", "meters", "sewer"
    #[validate(length(max = 100))]
    pub specialization: Option<String>,
}

/// Request DTO for updating a team; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateTeamDto {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 100))]
    pub leader: Option<String>,

    #[validate(email(message = "Invalid email address"))]
    pub contact_email: Option<String>,

    #[validate(length(min = 5, max = 30, message = "Phone must be 5-30 characters"))]
    pub contact_phone: Option<String>,

    #[validate(length(max = 100))]
    pub specialization: Option<String>,
}
