use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::auth::models::{AdminRole, User};
use crate::shared::validation::USERNAME_REGEX;

/// Request DTO for user registration
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterRequestDto {
    #[validate(
        length(min = 3, max = 50, message = "Username must be 3-50 characters"),
        regex(
            path = *USERNAME_REGEX,
            message = "Username may only contain letters, digits and underscores"
        )
    )]
    pub username: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
}

/// Request DTO for user login
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginRequestDto {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Response DTO for authentication (register/login)
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponseDto {
    /// Opaque session token, send as `Authorization: Bearer <token>`
    pub access_token: String,
    /// Token type (always "Bearer")
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
    pub user: MeResponseDto,
}

/// Current user profile
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MeResponseDto {
    pub id: Uuid,
    pub username: String,
    pub email: Option<String>,
    pub points: i32,
    pub role: Option<AdminRole>,
    pub is_super_admin: bool,
}

impl MeResponseDto {
    pub fn from_user(user: User, role: Option<AdminRole>, is_super_admin: bool) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            points: user.points,
            role,
            is_super_admin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_rejects_bad_username() {
        let dto = RegisterRequestDto {
            username: "9 lives".to_string(),
            password: "long-enough-password".to_string(),
            email: None,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_register_accepts_without_email() {
        let dto = RegisterRequestDto {
            username: "river_watch".to_string(),
            password: "long-enough-password".to_string(),
            email: None,
        };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_register_rejects_invalid_email() {
        let dto = RegisterRequestDto {
            username: "river_watch".to_string(),
            password: "long-enough-password".to_string(),
            email: Some("not-an-email".to_string()),
        };
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }
}
