use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::features::engagement::models::{Achievement, Notification, Tip};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TipResponseDto {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Tip> for TipResponseDto {
    fn from(t: Tip) -> Self {
        Self {
            id: t.id,
            title: t.title,
            content: t.content,
            category: t.category,
            created_at: t.created_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct TipQuery {
    /// e.g. "household", "garden"
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AchievementResponseDto {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub earned_at: DateTime<Utc>,
}

impl From<Achievement> for AchievementResponseDto {
    fn from(a: Achievement) -> Self {
        Self {
            id: a.id,
            name: a.name,
            description: a.description,
            icon: a.icon,
            earned_at: a.earned_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NotificationResponseDto {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Notification> for NotificationResponseDto {
    fn from(n: Notification) -> Self {
        Self {
            id: n.id,
            title: n.title,
            message: n.message,
            is_read: n.is_read,
            created_at: n.created_at,
        }
    }
}
