use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::engagement::models::Achievement;

pub struct AchievementService {
    pool: PgPool,
}

impl AchievementService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Achievements earned by `user_id`, most recent first
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Achievement>> {
        sqlx::query_as::<_, Achievement>(
            r#"
            SELECT id, user_id, name, description, icon, earned_at
            FROM achievements
            WHERE user_id = $1
            ORDER BY earned_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list achievements for {}: {:?}", user_id, e);
            AppError::Database(e)
        })
    }
}
