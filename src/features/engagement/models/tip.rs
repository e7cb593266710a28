use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Water-saving tip shown to citizens
#[derive(Debug, Clone, FromRow)]
pub struct Tip {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
}
