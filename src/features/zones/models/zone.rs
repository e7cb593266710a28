use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Administrative area used to prioritize and assign field work
#[derive(Debug, Clone, FromRow)]
pub struct Zone {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub color: String,
    pub boundaries: Option<serde_json::Value>,
    pub priority: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
