use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::core::config::SessionConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::{
    AuthResponseDto, LoginRequestDto, MeResponseDto, RegisterRequestDto,
};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::models::{AdminRole, User};
use crate::features::auth::{
    generate_session_token, hash_password, hash_session_token, verify_password,
};

/// PostgreSQL error code for unique constraint violations
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, FromRow)]
struct SessionUserRow {
    user_id: Uuid,
    username: String,
    role: Option<AdminRole>,
    is_super_admin: Option<bool>,
}

#[derive(Debug, FromRow)]
struct RoleRow {
    role: AdminRole,
    is_super_admin: bool,
}

/// Service for credential login and database-backed sessions
pub struct AuthService {
    pool: PgPool,
    session: SessionConfig,
}

impl AuthService {
    pub fn new(pool: PgPool, session: SessionConfig) -> Self {
        Self { pool, session }
    }

    /// Register a new user and open a session for them
    pub async fn register(&self, dto: RegisterRequestDto) -> Result<AuthResponseDto> {
        let password = dto.password;
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))??;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, password_hash, email)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, password_hash, email, points, created_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&dto.username)
        .bind(&password_hash)
        .bind(&dto.email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("Username or email already registered".to_string())
            } else {
                tracing::error!("Failed to create user: {:?}", e);
                AppError::Database(e)
            }
        })?;

        tracing::info!("Registered user {} ({})", user.username, user.id);

        self.open_session(user, None, false).await
    }

    /// Login with username and password
    pub async fn login(&self, dto: LoginRequestDto) -> Result<AuthResponseDto> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, email, points, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(&dto.username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to look up user: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(invalid_credentials)?;

        let password = dto.password;
        let stored_hash = user.password_hash.clone();
        let valid = tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
            .await
            .map_err(|e| AppError::Internal(format!("Password check task failed: {}", e)))?;

        if !valid {
            tracing::info!("Rejected login for {}", dto.username);
            return Err(invalid_credentials());
        }

        let (role, is_super_admin) = self.find_role(user.id).await?;
        self.open_session(user, role, is_super_admin).await
    }

    /// Delete the session identified by `token`
    pub async fn logout(&self, token: &str) -> Result<()> {
        let token_hash = hash_session_token(token, &self.session.secret)?;

        sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
            .bind(&token_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete session: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(())
    }

    /// Resolve a session token to the user it belongs to
    pub async fn authenticate(&self, token: &str) -> Result<AuthenticatedUser> {
        let token_hash = hash_session_token(token, &self.session.secret)?;

        let row = sqlx::query_as::<_, SessionUserRow>(
            r#"
            SELECT u.id AS user_id, u.username, a.role, a.is_super_admin
            FROM sessions s
            JOIN users u ON u.id = s.user_id
            LEFT JOIN admin_users a ON a.user_id = u.id
            WHERE s.token_hash = $1 AND s.expires_at > NOW()
            "#,
        )
        .bind(&token_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to resolve session: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::Unauthorized("Invalid or expired session".to_string()))?;

        Ok(AuthenticatedUser {
            user_id: row.user_id,
            username: row.username,
            role: row.role,
            is_super_admin: row.is_super_admin.unwrap_or(false),
        })
    }

    /// Profile of the authenticated user
    pub async fn get_current_user(&self, user: &AuthenticatedUser) -> Result<MeResponseDto> {
        let record = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, email, points, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user.user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get user: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.user_id)))?;

        Ok(MeResponseDto::from_user(
            record,
            user.role,
            user.is_super_admin,
        ))
    }

    /// Remove sessions past their expiry, returning how many were deleted
    pub async fn delete_expired_sessions(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= NOW()")
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete expired sessions: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(result.rows_affected())
    }

    async fn find_role(&self, user_id: Uuid) -> Result<(Option<AdminRole>, bool)> {
        let row = sqlx::query_as::<_, RoleRow>(
            "SELECT role, is_super_admin FROM admin_users WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get admin role: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(row
            .map(|r| (Some(r.role), r.is_super_admin))
            .unwrap_or((None, false)))
    }

    async fn open_session(
        &self,
        user: User,
        role: Option<AdminRole>,
        is_super_admin: bool,
    ) -> Result<AuthResponseDto> {
        let token = generate_session_token();
        let token_hash = hash_session_token(&token, &self.session.secret)?;
        let expires_at = session_expiry(Utc::now(), self.session.ttl)?;

        sqlx::query(
            r#"
            INSERT INTO sessions (id, user_id, token_hash, expires_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(user.id)
        .bind(&token_hash)
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create session: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(AuthResponseDto {
            access_token: token,
            token_type: "Bearer".to_string(),
            expires_at,
            user: MeResponseDto::from_user(user, role, is_super_admin),
        })
    }
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Invalid username or password".to_string())
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == UNIQUE_VIOLATION)
}

fn session_expiry(now: DateTime<Utc>, ttl: std::time::Duration) -> Result<DateTime<Utc>> {
    chrono::Duration::from_std(ttl)
        .ok()
        .and_then(|ttl| now.checked_add_signed(ttl))
        .ok_or_else(|| AppError::Internal("Session TTL out of range".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_session_expiry_adds_ttl() {
        let now = Utc::now();
        let expires = session_expiry(now, Duration::from_secs(3600)).unwrap();
        assert_eq!((expires - now).num_seconds(), 3600);
    }

    #[test]
    fn test_session_expiry_overflow() {
        let now = Utc::now();
        assert!(session_expiry(now, Duration::from_secs(u64::MAX)).is_err());
    }

    #[test]
    fn test_non_database_error_is_not_unique_violation() {
        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
    }
}
