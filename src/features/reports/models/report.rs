use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

/// Report status enum matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "report_status", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ReportStatus {
    Pending,
    InProgress,
    Resolved,
}

impl ReportStatus {
    pub const ALL: [ReportStatus; 3] = [
        ReportStatus::Pending,
        ReportStatus::InProgress,
        ReportStatus::Resolved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "pending",
            ReportStatus::InProgress => "in-progress",
            ReportStatus::Resolved => "resolved",
        }
    }

    /// Human readable label used in notifications
    pub fn label(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "Pending",
            ReportStatus::InProgress => "In progress",
            ReportStatus::Resolved => "Resolved",
        }
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReportStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// Leak urgency matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "report_severity", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReportSeverity {
    Minor,
    Moderate,
    Critical,
}

impl std::fmt::Display for ReportSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportSeverity::Minor => write!(f, "minor"),
            ReportSeverity::Moderate => write!(f, "moderate"),
            ReportSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Database model for report
#[derive(Debug, Clone, FromRow)]
pub struct Report {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub address: String,
    pub latitude: String,
    pub longitude: String,
    pub severity: ReportSeverity,
    pub status: ReportStatus,
    pub photos: Vec<String>,
    pub voice_note: Option<String>,
    pub anonymous: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for creating a new report, already validated
#[derive(Debug, Clone)]
pub struct CreateReport {
    pub user_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub address: String,
    pub latitude: String,
    pub longitude: String,
    pub severity: ReportSeverity,
    pub photos: Vec<String>,
    pub voice_note: Option<String>,
    pub anonymous: bool,
}

/// Optional filters for listing reports
#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    pub user_id: Option<Uuid>,
    pub status: Option<ReportStatus>,
    pub severity: Option<ReportSeverity>,
}

impl ReportFilter {
    pub fn matches(&self, report: &Report) -> bool {
        self.user_id.is_none_or(|id| report.user_id == Some(id))
            && self.status.is_none_or(|s| report.status == s)
            && self.severity.is_none_or(|s| report.severity == s)
    }
}
