use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::teams::models::{AssignmentFilter, AssignmentStatus, TeamAssignmentDetail};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TeamAssignmentResponseDto {
    pub id: Uuid,
    pub team_id: Uuid,
    pub team_name: String,
    pub zone_id: Uuid,
    pub zone_name: String,
    pub status: AssignmentStatus,
    pub notes: Option<String>,
    pub assigned_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl From<TeamAssignmentDetail> for TeamAssignmentResponseDto {
    fn from(a: TeamAssignmentDetail) -> Self {
        Self {
            id: a.id,
            team_id: a.team_id,
            team_name: a.team_name,
            zone_id: a.zone_id,
            zone_name: a.zone_name,
            status: a.status,
            notes: a.notes,
            assigned_at: a.assigned_at,
            completed_at: a.completed_at,
            updated_at: a.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateAssignmentDto {
    pub team_id: Uuid,
    pub zone_id: Uuid,
    #[validate(length(max = 2000, message = "Notes must be at most 2000 characters"))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateAssignmentStatusDto {
    pub status: AssignmentStatus,
    /// Replaces the notes when present
    #[validate(length(max = 2000, message = "Notes must be at most 2000 characters"))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct AssignmentListQuery {
    pub team_id: Option<Uuid>,
    pub zone_id: Option<Uuid>,
    /// assigned, in-progress or completed
    pub status: Option<AssignmentStatus>,
}

impl From<AssignmentListQuery> for AssignmentFilter {
    fn from(q: AssignmentListQuery) -> Self {
        Self {
            team_id: q.team_id,
            zone_id: q.zone_id,
            status: q.status,
        }
    }
}
