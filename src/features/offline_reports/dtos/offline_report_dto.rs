use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::offline_reports::models::StoredOfflineReport;
use crate::features::reports::dtos::CreateReportDto;

/// Upload of a report captured while the client was offline
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UploadOfflineReportDto {
    #[validate(nested)]
    pub payload: CreateReportDto,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StoredOfflineReportDto {
    pub id: Uuid,
    pub payload: CreateReportDto,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<StoredOfflineReport> for StoredOfflineReportDto {
    fn from(r: StoredOfflineReport) -> Self {
        Self {
            id: r.id,
            payload: r.payload.0,
            user_id: r.user_id,
            created_at: r.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::validation::field_messages;
    use serde_json::json;

    #[test]
    fn test_nested_payload_errors_are_prefixed() {
        let dto: UploadOfflineReportDto = serde_json::from_value(json!({
            "payload": {
                "title": "Hydrant leaking",
                "description": "Constant drip",
                "address": "Jl. Kebon Sirih",
                "latitude": "95",
                "longitude": "106.8",
                "severity": "minor"
            }
        }))
        .unwrap();

        let messages = field_messages(&dto.validate().unwrap_err());
        assert_eq!(
            messages,
            vec!["payload.latitude: Latitude must be a decimal between -90 and 90".to_string()]
        );
    }
}
