use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::auth::models::AdminRole;
use crate::features::reports::models::{ReportSeverity, ReportStatus};

// =============================================================================
// DASHBOARD
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StatusCounts {
    pub pending: i64,
    pub in_progress: i64,
    pub resolved: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SeverityCounts {
    pub minor: i64,
    pub moderate: i64,
    pub critical: i64,
}

/// Report aggregates shown on the admin dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReportStats {
    pub total: i64,
    pub by_status: StatusCounts,
    pub by_severity: SeverityCounts,
    /// Reports created in the last seven days
    pub recent: i64,
}

impl ReportStats {
    /// Fold per-status and per-severity counts into the dashboard shape
    pub fn from_counts(
        by_status: &[(ReportStatus, i64)],
        by_severity: &[(ReportSeverity, i64)],
        recent: i64,
    ) -> Self {
        let mut stats = Self {
            recent,
            ..Self::default()
        };

        for &(status, count) in by_status {
            stats.total += count;
            match status {
                ReportStatus::Pending => stats.by_status.pending += count,
                ReportStatus::InProgress => stats.by_status.in_progress += count,
                ReportStatus::Resolved => stats.by_status.resolved += count,
            }
        }
        for &(severity, count) in by_severity {
            match severity {
                ReportSeverity::Minor => stats.by_severity.minor += count,
                ReportSeverity::Moderate => stats.by_severity.moderate += count,
                ReportSeverity::Critical => stats.by_severity.critical += count,
            }
        }

        stats
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardDto {
    pub reports: ReportStats,
    pub zones: i64,
    pub teams: i64,
    /// Assignments not yet completed
    pub active_assignments: i64,
    pub generated_at: DateTime<Utc>,
}

// =============================================================================
// ADMIN USERS
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AdminUserDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub email: Option<String>,
    pub role: AdminRole,
    pub is_super_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// Grant or change a user's back-office role
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GrantRoleDto {
    pub role: AdminRole,
    /// Defaults to false
    #[serde(default)]
    pub is_super_admin: bool,
}
