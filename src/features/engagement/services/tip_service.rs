use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::engagement::models::Tip;

/// Service for water-saving tips
pub struct TipService {
    pool: PgPool,
}

impl TipService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List tips, newest first, optionally limited to one category
    pub async fn list(&self, category: Option<&str>) -> Result<Vec<Tip>> {
        sqlx::query_as::<_, Tip>(
            r#"
            SELECT id, title, content, category, created_at
            FROM tips
            WHERE ($1::text IS NULL OR category = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(category)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list tips: {:?}", e);
            AppError::Database(e)
        })
    }
}
