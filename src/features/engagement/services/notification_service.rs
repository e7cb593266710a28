use async_trait::async_trait;
use minijinja::context;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::engagement::models::Notification;
use crate::features::reports::models::Report;
use crate::features::reports::services::StatusNotifier;
use crate::shared::templates::{render_template, REPORT_STATUS_MESSAGE, REPORT_STATUS_TITLE};

/// Service for in-app user notifications
pub struct NotificationService {
    pool: PgPool,
}

impl NotificationService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Page of the user's notifications, newest first, with the total count
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Notification>, i64)> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count notifications: {:?}", e);
            AppError::Database(e)
        })?;

        let items = sqlx::query_as::<_, Notification>(
            r#"
            SELECT id, user_id, title, message, is_read, created_at
            FROM notifications
            WHERE user_id = $1
            ORDER BY created_at DESC
            OFFSET $2 LIMIT $3
            "#,
        )
        .bind(user_id)
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list notifications: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((items, total))
    }

    /// Mark one of the user's notifications as read
    pub async fn mark_read(&self, user_id: Uuid, id: Uuid) -> Result<Notification> {
        sqlx::query_as::<_, Notification>(
            r#"
            UPDATE notifications
            SET is_read = TRUE
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, message, is_read, created_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to mark notification {} read: {:?}", id, e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Notification {} not found", id)))
    }
}

#[async_trait]
impl StatusNotifier for NotificationService {
    /// Tell the owner of `report` that its status changed; no-op for anonymous reports
    async fn notify_status_change(&self, report: &Report) -> Result<()> {
        let Some(user_id) = report.user_id else {
            return Ok(());
        };
        let (title, message) = render_status_change(report)?;

        sqlx::query(
            r#"
            INSERT INTO notifications (id, user_id, title, message)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(user_id)
        .bind(&title)
        .bind(&message)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to store notification for {}: {:?}", user_id, e);
            AppError::Database(e)
        })?;

        Ok(())
    }
}

/// Title and message for a report status change
pub fn render_status_change(report: &Report) -> Result<(String, String)> {
    let ctx = context! {
        title => &report.title,
        address => &report.address,
        status => report.status.as_str(),
        status_label => report.status.label(),
    };

    let title = render_template(REPORT_STATUS_TITLE, ctx.clone())
        .map_err(|e| AppError::Internal(e.to_string()))?;
    let message = render_template(REPORT_STATUS_MESSAGE, ctx)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok((title, message))
}
