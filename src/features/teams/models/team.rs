use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Field repair team
#[derive(Debug, Clone, FromRow)]
pub struct Team {
    pub id: Uuid,
    pub name: String,
    pub leader: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub specialization: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
