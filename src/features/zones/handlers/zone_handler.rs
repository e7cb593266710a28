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
use crate::features::auth::guards::{RequirePlanner, RequireStaff};
use crate::features::zones::dtos::{CreateZoneDto, UpdateZoneDto, ZoneResponseDto};
use crate::features::zones::services::ZoneService;
use crate::shared::types::{ApiResponse, Meta};

/// List zones, highest priority first
#[utoipa::path(
    get,
    path = "/api/admin/zones",
    responses(
        (status = 200, description = "List of zones", body = ApiResponse<Vec<ZoneResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Staff access required")
    ),
    tag = "zones",
    security(("bearer_auth" = []))
)]
pub async fn list_zones(
    RequireStaff(_user): RequireStaff,
    State(service): State<Arc<ZoneService>>,
) -> Result<Json<ApiResponse<Vec<ZoneResponseDto>>>> {
    let zones = service.list().await?;
    let total = zones.len() as i64;
    let dtos: Vec<ZoneResponseDto> = zones.into_iter().map(|z| z.into()).collect();
    Ok(Json(ApiResponse::success(Some(dtos), None, Some(Meta { total }))))
}

#[utoipa::path(
    get,
    path = "/api/admin/zones/{id}",
    params(("id" = Uuid, Path, description = "Zone ID")),
    responses(
        (status = 200, description = "Zone found", body = ApiResponse<ZoneResponseDto>),
        (status = 403, description = "Forbidden - Staff access required"),
        (status = 404, description = "Zone not found")
    ),
    tag = "zones",
    security(("bearer_auth" = []))
)]
pub async fn get_zone(
    RequireStaff(_user): RequireStaff,
    State(service): State<Arc<ZoneService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ZoneResponseDto>>> {
    let zone = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(zone.into()), None, None)))
}

#[utoipa::path(
    post,
    path = "/api/admin/zones",
    request_body = CreateZoneDto,
    responses(
        (status = 201, description = "Zone created", body = ApiResponse<ZoneResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden - Planner access required")
    ),
    tag = "zones",
    security(("bearer_auth" = []))
)]
pub async fn create_zone(
    RequirePlanner(_user): RequirePlanner,
    State(service): State<Arc<ZoneService>>,
    AppJson(dto): AppJson<CreateZoneDto>,
) -> Result<(StatusCode, Json<ApiResponse<ZoneResponseDto>>)> {
    dto.validate()?;

    let zone = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(zone.into()), None, None)),
    ))
}

#[utoipa::path(
    put,
    path = "/api/admin/zones/{id}",
    params(("id" = Uuid, Path, description = "Zone ID")),
    request_body = UpdateZoneDto,
    responses(
        (status = 200, description = "Zone updated", body = ApiResponse<ZoneResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden - Planner access required"),
        (status = 404, description = "Zone not found")
    ),
    tag = "zones",
    security(("bearer_auth" = []))
)]
pub async fn update_zone(
    RequirePlanner(_user): RequirePlanner,
    State(service): State<Arc<ZoneService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateZoneDto>,
) -> Result<Json<ApiResponse<ZoneResponseDto>>> {
    dto.validate()?;

    let zone = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(zone.into()), None, None)))
}

#[utoipa::path(
    delete,
    path = "/api/admin/zones/{id}",
    params(("id" = Uuid, Path, description = "Zone ID")),
    responses(
        (status = 200, description = "Zone deleted"),
        (status = 403, description = "Forbidden - Planner access required"),
        (status = 404, description = "Zone not found")
    ),
    tag = "zones",
    security(("bearer_auth" = []))
)]
pub async fn delete_zone(
    RequirePlanner(user): RequirePlanner,
    State(service): State<Arc<ZoneService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    tracing::info!("Zone {} deleted by {}", id, user.username);

    Ok(Json(ApiResponse::success(
        None,
        Some("Zone deleted".to_string()),
        None,
    )))
}

#[cfg(test)]
mod tests {
    use crate::features::auth::model::AuthenticatedUser;
    use crate::features::auth::models::AdminRole;
    use crate::features::zones::{routes, ZoneService};
    use crate::shared::test_helpers::{
        create_citizen_user, create_staff_user, unreachable_pool, with_user,
    };
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;
    use std::sync::Arc;

    fn server(user: AuthenticatedUser) -> TestServer {
        let service = Arc::new(ZoneService::new(unreachable_pool()));
        TestServer::new(with_user(routes::routes(service), user)).unwrap()
    }

    #[tokio::test]
    async fn test_citizen_cannot_list_zones() {
        server(create_citizen_user())
            .get("/zones")
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_analyst_cannot_create_zone() {
        server(create_staff_user(AdminRole::Analyst))
            .post("/zones")
            .json(&json!({ "name": "Harbor" }))
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_planner_invalid_color_is_rejected() {
        let response = server(create_staff_user(AdminRole::Planner))
            .post("/zones")
            .json(&json!({ "name": "Harbor", "color": "#12" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(
            body["errors"],
            json!(["color: Color must be a #RRGGBB hex value"])
        );
    }
}
