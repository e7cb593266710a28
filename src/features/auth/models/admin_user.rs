use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::shared::constants::{ROLE_ADMIN, ROLE_ANALYST, ROLE_INSPECTOR, ROLE_PLANNER};

/// Back-office role matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "admin_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AdminRole {
    Admin,
    Analyst,
    Planner,
    Inspector,
}

impl AdminRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminRole::Admin => ROLE_ADMIN,
            AdminRole::Analyst => ROLE_ANALYST,
            AdminRole::Planner => ROLE_PLANNER,
            AdminRole::Inspector => ROLE_INSPECTOR,
        }
    }
}

impl std::fmt::Display for AdminRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Side table granting a back-office role to a user
#[derive(Debug, Clone, FromRow)]
pub struct AdminUser {
    pub id: Uuid,
    pub user_id: Uuid,
    pub role: AdminRole,
    pub is_super_admin: bool,
    pub created_at: DateTime<Utc>,
}
