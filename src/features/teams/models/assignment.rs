use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

/// Assignment lifecycle matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "assignment_status", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum AssignmentStatus {
    Assigned,
    InProgress,
    Completed,
}

/// `completed_at` for an assignment entering `status` at `now`
pub fn completion_time(status: AssignmentStatus, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    match status {
        AssignmentStatus::Completed => Some(now),
        AssignmentStatus::Assigned | AssignmentStatus::InProgress => None,
    }
}

/// Assignment joined with its team and zone names
#[derive(Debug, Clone, FromRow)]
pub struct TeamAssignmentDetail {
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

#[derive(Debug, Clone, Default)]
pub struct AssignmentFilter {
    pub team_id: Option<Uuid>,
    pub zone_id: Option<Uuid>,
    pub status: Option<AssignmentStatus>,
}
