use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::admin::dtos::*;
use crate::features::admin::services::AdminService;
use crate::features::auth::guards::{RequireAdmin, RequireStaff, RequireSuperAdmin};
use crate::shared::types::{ApiResponse, Meta};

/// Aggregated report, zone and team numbers
#[utoipa::path(
    get,
    path = "/api/admin/dashboard",
    responses(
        (status = 200, description = "Dashboard aggregates", body = ApiResponse<DashboardDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Staff access required")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_dashboard(
    RequireStaff(_user): RequireStaff,
    State(service): State<Arc<AdminService>>,
) -> Result<Json<ApiResponse<DashboardDto>>> {
    let dashboard = service.dashboard().await?;
    Ok(Json(ApiResponse::success(Some(dashboard), None, None)))
}

/// List users holding a back-office role
#[utoipa::path(
    get,
    path = "/api/admin/admin-users",
    responses(
        (status = 200, description = "List of admin users", body = ApiResponse<Vec<AdminUserDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_admin_users(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<AdminService>>,
) -> Result<Json<ApiResponse<Vec<AdminUserDto>>>> {
    let items = service.list_admin_users().await?;
    let total = items.len() as i64;

    Ok(Json(ApiResponse::success(
        Some(items),
        None,
        Some(Meta { total }),
    )))
}

/// Grant or change a user's role (super admin only)
#[utoipa::path(
    put,
    path = "/api/admin/admin-users/{user_id}",
    params(("user_id" = Uuid, Path, description = "User ID")),
    request_body = GrantRoleDto,
    responses(
        (status = 200, description = "Role granted"),
        (status = 403, description = "Forbidden - Super admin access required"),
        (status = 404, description = "User not found")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn grant_role(
    RequireSuperAdmin(user): RequireSuperAdmin,
    State(service): State<Arc<AdminService>>,
    Path(user_id): Path<Uuid>,
    AppJson(dto): AppJson<GrantRoleDto>,
) -> Result<Json<ApiResponse<()>>> {
    let admin = service.grant_role(user_id, dto).await?;
    tracing::info!("{} granted {} to {}", user.username, admin.role, user_id);

    Ok(Json(ApiResponse::success(
        None,
        Some(format!("Role {} granted", admin.role)),
        None,
    )))
}

/// Revoke a user's role (super admin only)
#[utoipa::path(
    delete,
    path = "/api/admin/admin-users/{user_id}",
    params(("user_id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Role revoked"),
        (status = 400, description = "Cannot revoke your own role"),
        (status = 403, description = "Forbidden - Super admin access required"),
        (status = 404, description = "User has no admin role")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn revoke_role(
    RequireSuperAdmin(user): RequireSuperAdmin,
    State(service): State<Arc<AdminService>>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    if user.user_id == user_id {
        return Err(AppError::BadRequest(
            "Cannot revoke your own admin role".to_string(),
        ));
    }

    service.revoke_role(user_id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Role revoked".to_string()),
        None,
    )))
}
