//! Role-based authorization guards for the back-office routes.
//!
//! Role hierarchy (from highest to lowest):
//! - super admin: flag on the admin_users row, can grant roles
//! - admin: zones, teams, assignments, report triage
//! - planner: zones and team assignments
//! - analyst / inspector: read dashboards, update report and assignment progress
//!
//! Citizens (no admin_users row) pass none of these guards.

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;
use axum::{extract::FromRequestParts, http::request::Parts};

fn authorize(
    parts: &Parts,
    allowed: fn(&AuthenticatedUser) -> bool,
    denied_message: &str,
) -> Result<AuthenticatedUser, AppError> {
    let user = parts
        .extensions
        .get::<AuthenticatedUser>()
        .ok_or_else(|| AppError::Unauthorized("User not authenticated".to_string()))?;

    if !allowed(user) {
        return Err(AppError::Forbidden(denied_message.to_string()));
    }

    Ok(user.clone())
}

/// Guard for super admin only operations (role grants).
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireSuperAdmin(user): RequireSuperAdmin) { ... }
/// ```
pub struct RequireSuperAdmin(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireSuperAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        authorize(
            parts,
            AuthenticatedUser::is_super_admin,
            "Super admin access required",
        )
        .map(RequireSuperAdmin)
    }
}

/// Guard for admin level access (super admin or admin role).
pub struct RequireAdmin(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        authorize(
            parts,
            AuthenticatedUser::has_admin_access,
            "Admin access required",
        )
        .map(RequireAdmin)
    }
}

/// Guard for planning operations (admin or planner).
pub struct RequirePlanner(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequirePlanner
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        authorize(
            parts,
            AuthenticatedUser::has_planner_access,
            "Planner access required",
        )
        .map(RequirePlanner)
    }
}

/// Guard for any back-office account.
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireStaff(user): RequireStaff) { ... }
/// ```
pub struct RequireStaff(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireStaff
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        authorize(parts, AuthenticatedUser::is_staff, "Staff access required").map(RequireStaff)
    }
}
