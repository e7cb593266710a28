use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::guards::{RequirePlanner, RequireStaff};
use crate::features::teams::dtos::{
    AssignmentListQuery, CreateAssignmentDto, TeamAssignmentResponseDto,
    UpdateAssignmentStatusDto,
};
use crate::features::teams::services::AssignmentService;
use crate::shared::types::{ApiResponse, Meta};

#[utoipa::path(
    get,
    path = "/api/admin/team-assignments",
    params(AssignmentListQuery),
    responses(
        (status = 200, description = "List of team assignments", body = ApiResponse<Vec<TeamAssignmentResponseDto>>),
        (status = 403, description = "Forbidden - Staff access required")
    ),
    tag = "teams",
    security(("bearer_auth" = []))
)]
pub async fn list_assignments(
    RequireStaff(_user): RequireStaff,
    State(service): State<Arc<AssignmentService>>,
    Query(query): Query<AssignmentListQuery>,
) -> Result<Json<ApiResponse<Vec<TeamAssignmentResponseDto>>>> {
    let assignments = service.list(&query.into()).await?;
    let total = assignments.len() as i64;
    let dtos: Vec<TeamAssignmentResponseDto> =
        assignments.into_iter().map(|a| a.into()).collect();
    Ok(Json(ApiResponse::success(Some(dtos), None, Some(Meta { total }))))
}

#[utoipa::path(
    get,
    path = "/api/admin/team-assignments/{id}",
    params(("id" = Uuid, Path, description = "Assignment ID")),
    responses(
        (status = 200, description = "Assignment found", body = ApiResponse<TeamAssignmentResponseDto>),
        (status = 403, description = "Forbidden - Staff access required"),
        (status = 404, description = "Assignment not found")
    ),
    tag = "teams",
    security(("bearer_auth" = []))
)]
pub async fn get_assignment(
    RequireStaff(_user): RequireStaff,
    State(service): State<Arc<AssignmentService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<TeamAssignmentResponseDto>>> {
    let assignment = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(assignment.into()), None, None)))
}

/// Assign a team to a zone
#[utoipa::path(
    post,
    path = "/api/admin/team-assignments",
    request_body = CreateAssignmentDto,
    responses(
        (status = 201, description = "Assignment created", body = ApiResponse<TeamAssignmentResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden - Planner access required"),
        (status = 404, description = "Team or zone not found")
    ),
    tag = "teams",
    security(("bearer_auth" = []))
)]
pub async fn create_assignment(
    RequirePlanner(_user): RequirePlanner,
    State(service): State<Arc<AssignmentService>>,
    AppJson(dto): AppJson<CreateAssignmentDto>,
) -> Result<(StatusCode, Json<ApiResponse<TeamAssignmentResponseDto>>)> {
    dto.validate()?;

    let assignment = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(assignment.into()), None, None)),
    ))
}

/// Update assignment progress; `completed` stamps `completed_at`
#[utoipa::path(
    patch,
    path = "/api/admin/team-assignments/{id}/status",
    params(("id" = Uuid, Path, description = "Assignment ID")),
    request_body = UpdateAssignmentStatusDto,
    responses(
        (status = 200, description = "Assignment updated", body = ApiResponse<TeamAssignmentResponseDto>),
        (status = 400, description = "Invalid status"),
        (status = 403, description = "Forbidden - Staff access required"),
        (status = 404, description = "Assignment not found")
    ),
    tag = "teams",
    security(("bearer_auth" = []))
)]
pub async fn update_assignment_status(
    RequireStaff(_user): RequireStaff,
    State(service): State<Arc<AssignmentService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateAssignmentStatusDto>,
) -> Result<Json<ApiResponse<TeamAssignmentResponseDto>>> {
    dto.validate()?;

    let assignment = service.update_status(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(assignment.into()), None, None)))
}

#[utoipa::path(
    delete,
    path = "/api/admin/team-assignments/{id}",
    params(("id" = Uuid, Path, description = "Assignment ID")),
    responses(
        (status = 200, description = "Assignment deleted"),
        (status = 403, description = "Forbidden - Planner access required"),
        (status = 404, description = "Assignment not found")
    ),
    tag = "teams",
    security(("bearer_auth" = []))
)]
pub async fn delete_assignment(
    RequirePlanner(_user): RequirePlanner,
    State(service): State<Arc<AssignmentService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Assignment deleted".to_string()),
        None,
    )))
}

#[cfg(test)]
mod tests {
    use crate::features::auth::models::AdminRole;
    use crate::features::teams::{routes, AssignmentService, TeamService};
    use crate::shared::test_helpers::{
        create_citizen_user, create_staff_user, unreachable_pool, with_user,
    };
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;
    use std::sync::Arc;

    fn server(role: Option<AdminRole>) -> TestServer {
        let pool = unreachable_pool();
        let app = routes::routes(
            Arc::new(TeamService::new(pool.clone())),
            Arc::new(AssignmentService::new(pool)),
        );
        let user = match role {
            Some(role) => create_staff_user(role),
            None => create_citizen_user(),
        };
        TestServer::new(with_user(app, user)).unwrap()
    }

    #[tokio::test]
    async fn test_planner_cannot_create_team() {
        server(Some(AdminRole::Planner))
            .post("/teams")
            .json(&json!({ "name": "Mains crew" }))
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_admin_team_email_is_validated() {
        let response = server(Some(AdminRole::Admin))
            .post("/teams")
            .json(&json!({ "name": "Mains crew", "contact_email": "not-an-email" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_inspector_cannot_delete_assignment() {
        server(Some(AdminRole::Inspector))
            .delete(&format!("/team-assignments/{}", uuid::Uuid::now_v7()))
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_unknown_assignment_status_is_bad_request() {
        server(Some(AdminRole::Inspector))
            .patch(&format!("/team-assignments/{}/status", uuid::Uuid::now_v7()))
            .json(&json!({ "status": "done" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_citizen_cannot_list_assignments() {
        server(None)
            .get("/team-assignments")
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }
}
