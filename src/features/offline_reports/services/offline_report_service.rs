use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::offline_reports::models::StoredOfflineReport;
use crate::features::reports::dtos::CreateReportDto;

/// Service for raw offline report uploads
pub struct OfflineReportService {
    pool: PgPool,
}

impl OfflineReportService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Store a validated payload; anonymous payloads are not attributed
    pub async fn store(
        &self,
        payload: CreateReportDto,
        user: Option<&AuthenticatedUser>,
    ) -> Result<StoredOfflineReport> {
        let user_id = if payload.anonymous.unwrap_or(false) {
            None
        } else {
            user.map(|u| u.user_id)
        };

        let stored = sqlx::query_as::<_, StoredOfflineReport>(
            r#"
            INSERT INTO offline_reports (id, payload, user_id)
            VALUES ($1, $2, $3)
            RETURNING id, payload, user_id, created_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(Json(&payload))
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to store offline report: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!("Stored offline report {}", stored.id);
        Ok(stored)
    }

    /// Page of uploads, oldest first, with the total count
    pub async fn list(&self, offset: i64, limit: i64) -> Result<(Vec<StoredOfflineReport>, i64)> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM offline_reports")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count offline reports: {:?}", e);
                AppError::Database(e)
            })?;

        let items = sqlx::query_as::<_, StoredOfflineReport>(
            r#"
            SELECT id, payload, user_id, created_at
            FROM offline_reports
            ORDER BY created_at
            OFFSET $1 LIMIT $2
            "#,
        )
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list offline reports: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((items, total))
    }

    /// Get an upload the caller is allowed to see
    pub async fn get(
        &self,
        id: Uuid,
        user: Option<&AuthenticatedUser>,
    ) -> Result<StoredOfflineReport> {
        let stored = sqlx::query_as::<_, StoredOfflineReport>(
            "SELECT id, payload, user_id, created_at FROM offline_reports WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get offline report {}: {:?}", id, e);
            AppError::Database(e)
        })?;

        stored
            .filter(|s| s.is_visible_to(user))
            .ok_or_else(|| AppError::NotFound(format!("Offline report {} not found", id)))
    }

    pub async fn delete(&self, id: Uuid, user: Option<&AuthenticatedUser>) -> Result<()> {
        self.get(id, user).await?;

        sqlx::query("DELETE FROM offline_reports WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete offline report {}: {:?}", id, e);
                AppError::Database(e)
            })?;

        tracing::info!("Deleted offline report {}", id);
        Ok(())
    }
}
