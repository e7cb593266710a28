use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::AppError;
use crate::features::reports::models::{
    CreateReport, Report, ReportFilter, ReportSeverity, ReportStatus,
};
use crate::shared::validation::{validate_latitude, validate_longitude, validate_not_blank};

/// Request DTO for submitting a leak report
///
/// Required text fields default to empty so a missing field surfaces as a
/// validation message instead of a JSON rejection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateReportDto {
    #[serde(default)]
    #[validate(
        custom(function = "validate_not_blank"),
        length(max = 200, message = "Title must be at most 200 characters")
    )]
    pub title: String,

    #[serde(default)]
    #[validate(
        custom(function = "validate_not_blank"),
        length(max = 5000, message = "Description must be at most 5000 characters")
    )]
    pub description: String,

    #[serde(default)]
    #[validate(
        custom(function = "validate_not_blank"),
        length(max = 500, message = "Address must be at most 500 characters")
    )]
    pub address: String,

    /// Decimal degrees, e.g. "-6.175392"
    #[serde(default)]
    #[validate(custom(function = "validate_latitude"))]
    pub latitude: String,

    /// Decimal degrees, e.g. "106.827153"
    #[serde(default)]
    #[validate(custom(function = "validate_longitude"))]
    pub longitude: String,

    #[validate(required(message = "Severity is required"))]
    pub severity: Option<ReportSeverity>,

    /// Photo URLs or storage keys
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 10, message = "Too many photos"))]
    pub photos: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 2048, message = "Voice note reference is invalid"))]
    pub voice_note: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anonymous: Option<bool>,
}

impl CreateReportDto {
    /// Convert a validated payload, attaching `user_id` unless the report is anonymous
    pub fn into_create_report(self, user_id: Option<Uuid>) -> Result<CreateReport, AppError> {
        let severity = self.severity.ok_or_else(|| {
            AppError::Validation(vec!["severity: Severity is required".to_string()])
        })?;
        let anonymous = self.anonymous.unwrap_or(false);

        Ok(CreateReport {
            user_id: if anonymous { None } else { user_id },
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            address: self.address.trim().to_string(),
            latitude: self.latitude.trim().to_string(),
            longitude: self.longitude.trim().to_string(),
            severity,
            photos: self.photos.unwrap_or_default(),
            voice_note: self.voice_note,
            anonymous,
        })
    }
}

/// Response DTO for report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportResponseDto {
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

impl From<Report> for ReportResponseDto {
    fn from(r: Report) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            title: r.title,
            description: r.description,
            address: r.address,
            latitude: r.latitude,
            longitude: r.longitude,
            severity: r.severity,
            status: r.status,
            photos: r.photos,
            voice_note: r.voice_note,
            anonymous: r.anonymous,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Request DTO for updating report status
///
/// Kept as a string so unknown values reach the service and fail as `InvalidStatus`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateReportStatusDto {
    #[schema(example = "in-progress")]
    pub status: String,
}

/// Query filters for listing reports
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ReportListQuery {
    pub user_id: Option<Uuid>,
    /// pending, in-progress or resolved
    pub status: Option<String>,
    pub severity: Option<ReportSeverity>,
}

impl ReportListQuery {
    pub fn into_filter(self) -> Result<ReportFilter, AppError> {
        let status = self
            .status
            .map(|s| s.parse::<ReportStatus>().map_err(AppError::InvalidStatus))
            .transpose()?;

        Ok(ReportFilter {
            user_id: self.user_id,
            status,
            severity: self.severity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::validation::field_messages;
    use serde_json::json;

    fn valid_payload() -> serde_json::Value {
        json!({
            "title": "Burst main on Jl. Sudirman",
            "description": "Water spraying onto the road since 6am",
            "address": "Jl. Sudirman 12, Jakarta",
            "latitude": "-6.208763",
            "longitude": "106.845599",
            "severity": "critical"
        })
    }

    #[test]
    fn test_valid_payload_passes() {
        let dto: CreateReportDto = serde_json::from_value(valid_payload()).unwrap();
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_missing_fields_are_validation_errors() {
        let dto: CreateReportDto = serde_json::from_value(json!({})).unwrap();
        let messages = field_messages(&dto.validate().unwrap_err());

        for field in ["title", "description", "address", "latitude", "longitude", "severity"] {
            assert!(
                messages.iter().any(|m| m.starts_with(&format!("{}:", field))),
                "missing message for {field}: {messages:?}"
            );
        }
    }

    #[test]
    fn test_photo_limit() {
        let mut payload = valid_payload();
        payload["photos"] = json!(vec!["photo.jpg"; 11]);
        let dto: CreateReportDto = serde_json::from_value(payload).unwrap();
        let messages = field_messages(&dto.validate().unwrap_err());
        assert_eq!(messages, vec!["photos: Too many photos".to_string()]);
    }

    #[test]
    fn test_anonymous_drops_user() {
        let mut payload = valid_payload();
        payload["anonymous"] = json!(true);
        let dto: CreateReportDto = serde_json::from_value(payload).unwrap();

        let report = dto.into_create_report(Some(Uuid::now_v7())).unwrap();
        assert!(report.anonymous);
        assert!(report.user_id.is_none());
    }

    #[test]
    fn test_list_query_rejects_unknown_status() {
        let query = ReportListQuery {
            status: Some("closed".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            query.into_filter(),
            Err(AppError::InvalidStatus(s)) if s == "closed"
        ));
    }
}
