use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::admin::dtos::{AdminUserDto, DashboardDto, GrantRoleDto, ReportStats};
use crate::features::auth::models::{AdminRole, AdminUser};
use crate::features::reports::models::{ReportSeverity, ReportStatus};
use crate::shared::constants::RECENT_REPORTS_DAYS;

/// Service for back-office aggregates and role management
pub struct AdminService {
    pool: PgPool,
}

impl AdminService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    // DASHBOARD
    // =========================================================================

    pub async fn dashboard(&self) -> Result<DashboardDto> {
        let now = Utc::now();

        let by_status = sqlx::query_as::<_, (ReportStatus, i64)>(
            "SELECT status, COUNT(*) FROM reports GROUP BY status",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count reports by status: {:?}", e);
            AppError::Database(e)
        })?;

        let by_severity = sqlx::query_as::<_, (ReportSeverity, i64)>(
            "SELECT severity, COUNT(*) FROM reports GROUP BY severity",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count reports by severity: {:?}", e);
            AppError::Database(e)
        })?;

        let recent =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM reports WHERE created_at >= $1")
                .bind(now - Duration::days(RECENT_REPORTS_DAYS))
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to count recent reports: {:?}", e);
                    AppError::Database(e)
                })?;

        Ok(DashboardDto {
            reports: ReportStats::from_counts(&by_status, &by_severity, recent),
            zones: self.count("SELECT COUNT(*) FROM zones").await?,
            teams: self.count("SELECT COUNT(*) FROM teams").await?,
            active_assignments: self
                .count("SELECT COUNT(*) FROM team_assignments WHERE status <> 'completed'")
                .await?,
            generated_at: now,
        })
    }

    async fn count(&self, sql: &'static str) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(sql)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Dashboard count failed ({}): {:?}", sql, e);
                AppError::Database(e)
            })
    }

    // =========================================================================
    // ADMIN USERS
    // =========================================================================

    pub async fn list_admin_users(&self) -> Result<Vec<AdminUserDto>> {
        sqlx::query_as::<_, AdminUserDto>(
            r#"
            SELECT a.id, a.user_id, u.username, u.email, a.role, a.is_super_admin, a.created_at
            FROM admin_users a
            JOIN users u ON u.id = a.user_id
            ORDER BY a.is_super_admin DESC, u.username
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list admin users: {:?}", e);
            AppError::Database(e)
        })
    }

    /// Grant a role to `user_id`, replacing any existing grant
    pub async fn grant_role(&self, user_id: Uuid, dto: GrantRoleDto) -> Result<AdminUser> {
        let user_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to look up user {}: {:?}", user_id, e);
                    AppError::Database(e)
                })?;

        if !user_exists {
            return Err(AppError::NotFound(format!("User {} not found", user_id)));
        }

        let admin = sqlx::query_as::<_, AdminUser>(
            r#"
            INSERT INTO admin_users (id, user_id, role, is_super_admin)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id)
            DO UPDATE SET role = EXCLUDED.role, is_super_admin = EXCLUDED.is_super_admin
            RETURNING id, user_id, role, is_super_admin, created_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(user_id)
        .bind(dto.role)
        .bind(dto.is_super_admin)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to grant role to {}: {:?}", user_id, e);
            AppError::Database(e)
        })?;

        tracing::info!(
            "Granted role {} to user {} (super admin: {})",
            admin.role,
            admin.user_id,
            admin.is_super_admin
        );

        Ok(admin)
    }

    /// Promote the registered user `username` to super admin
    ///
    /// Returns `false` when no such user exists yet.
    pub async fn seed_super_admin(&self, username: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO admin_users (id, user_id, role, is_super_admin)
            SELECT $1, u.id, $2, TRUE
            FROM users u
            WHERE u.username = $3
            ON CONFLICT (user_id)
            DO UPDATE SET role = EXCLUDED.role, is_super_admin = TRUE
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(AdminRole::Admin)
        .bind(username)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to seed super admin {}: {:?}", username, e);
            AppError::Database(e)
        })?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn revoke_role(&self, user_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM admin_users WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to revoke role of {}: {:?}", user_id, e);
                AppError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "User {} has no admin role",
                user_id
            )));
        }

        tracing::info!("Revoked admin role of user {}", user_id);
        Ok(())
    }
}
