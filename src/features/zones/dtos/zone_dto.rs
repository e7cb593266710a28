use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::zones::models::Zone;
use crate::shared::validation::HEX_COLOR_REGEX;

pub const DEFAULT_ZONE_COLOR: &str = "#2563eb";

/// Response DTO for zone
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ZoneResponseDto {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub color: String,
    /// GeoJSON-like polygon data, stored as-is
    #[schema(value_type = Option<Object>)]
    pub boundaries: Option<serde_json::Value>,
    pub priority: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Zone> for ZoneResponseDto {
    fn from(z: Zone) -> Self {
        Self {
            id: z.id,
            name: z.name,
            description: z.description,
            color: z.color,
            boundaries: z.boundaries,
            priority: z.priority,
            created_at: z.created_at,
            updated_at: z.updated_at,
        }
    }
}

/// Request DTO for creating a zone
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateZoneDto {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,

    /// `#RRGGBB`, defaults to blue
    #[validate(regex(path = *HEX_COLOR_REGEX, message = "Color must be a #RRGGBB hex value"))]
    pub color: Option<String>,

    #[schema(value_type = Option<Object>)]
    pub boundaries: Option<serde_json::Value>,

    /// Higher values are listed first; any integer, defaults to 0
    pub priority: Option<i32>,
}

/// Request DTO for updating a zone; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateZoneDto {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,

    #[validate(regex(path = *HEX_COLOR_REGEX, message = "Color must be a #RRGGBB hex value"))]
    pub color: Option<String>,

    #[schema(value_type = Option<Object>)]
    pub boundaries: Option<serde_json::Value>,

    pub priority: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_zone_defaults_are_optional() {
        let dto: CreateZoneDto =
            serde_json::from_value(json!({ "name": "North District" })).unwrap();
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_create_zone_rejects_bad_color() {
        let dto: CreateZoneDto = serde_json::from_value(json!({
            "name": "North District",
            "color": "blue"
        }))
        .unwrap();

        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("color"));
        assert_eq!(fields.len(), 1);
    }

    #[test]
    fn test_zone_priority_accepts_any_integer() {
        for priority in [-20, 0, 500] {
            let dto: CreateZoneDto = serde_json::from_value(json!({
                "name": "North District",
                "priority": priority
            }))
            .unwrap();
            assert!(dto.validate().is_ok());

            let update = UpdateZoneDto {
                priority: Some(priority),
                ..Default::default()
            };
            assert!(update.validate().is_ok());
        }
    }

    #[test]
    fn test_update_zone_empty_name_rejected() {
        let dto = UpdateZoneDto {
            name: Some(String::new()),
            ..Default::default()
        };
        assert!(dto.validate().is_err());
    }
}
