use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::guards::{RequireAdmin, RequireStaff};
use crate::features::teams::dtos::{CreateTeamDto, TeamResponseDto, UpdateTeamDto};
use crate::features::teams::services::TeamService;
use crate::shared::types::{ApiResponse, Meta};

#[utoipa::path(
    get,
    path = "/api/admin/teams",
    responses(
        (status = 200, description = "List of teams", body = ApiResponse<Vec<TeamResponseDto>>),
        (status = 403, description = "Forbidden - Staff access required")
    ),
    tag = "teams",
    security(("bearer_auth" = []))
)]
pub async fn list_teams(
    RequireStaff(_user): RequireStaff,
    State(service): State<Arc<TeamService>>,
) -> Result<Json<ApiResponse<Vec<TeamResponseDto>>>> {
    let teams = service.list().await?;
    let total = teams.len() as i64;
    let dtos: Vec<TeamResponseDto> = teams.into_iter().map(|t| t.into()).collect();
    Ok(Json(ApiResponse::success(Some(dtos), None, Some(Meta { total }))))
}

#[utoipa::path(
    get,
    path = "/api/admin/teams/{id}",
    params(("id" = Uuid, Path, description = "Team ID")),
    responses(
        (status = 200, description = "Team found", body = ApiResponse<TeamResponseDto>),
        (status = 403, description = "Forbidden - Staff access required"),
        (status = 404, description = "Team not found")
    ),
    tag = "teams",
    security(("bearer_auth" = []))
)]
pub async fn get_team(
    RequireStaff(_user): RequireStaff,
    State(service): State<Arc<TeamService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<TeamResponseDto>>> {
    let team = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(team.into()), None, None)))
}

#[utoipa::path(
    post,
    path = "/api/admin/teams",
    request_body = CreateTeamDto,
    responses(
        (status = 201, description = "Team created", body = ApiResponse<TeamResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    tag = "teams",
    security(("bearer_auth" = []))
)]
pub async fn create_team(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<TeamService>>,
    AppJson(dto): AppJson<CreateTeamDto>,
) -> Result<(StatusCode, Json<ApiResponse<TeamResponseDto>>)> {
    dto.validate()?;

    let team = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(team.into()), None, None)),
    ))
}

#[utoipa::path(
    put,
    path = "/api/admin/teams/{id}",
    params(("id" = Uuid, Path, description = "Team ID")),
    request_body = UpdateTeamDto,
    responses(
        (status = 200, description = "Team updated", body = ApiResponse<TeamResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden - Admin access required"),
        (status = 404, description = "Team not found")
    ),
    tag = "teams",
    security(("bearer_auth" = []))
)]
pub async fn update_team(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<TeamService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateTeamDto>,
) -> Result<Json<ApiResponse<TeamResponseDto>>> {
    dto.validate()?;

    let team = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(team.into()), None, None)))
}

#[utoipa::path(
    delete,
    path = "/api/admin/teams/{id}",
    params(("id" = Uuid, Path, description = "Team ID")),
    responses(
        (status = 200, description = "Team deleted"),
        (status = 403, description = "Forbidden - Admin access required"),
        (status = 404, description = "Team not found")
    ),
    tag = "teams",
    security(("bearer_auth" = []))
)]
pub async fn delete_team(
    RequireAdmin(user): RequireAdmin,
    State(service): State<Arc<TeamService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    tracing::info!("Team {} deleted by {}", id, user.username);

    Ok(Json(ApiResponse::success(
        None,
        Some("Team deleted".to_string()),
        None,
    )))
}
