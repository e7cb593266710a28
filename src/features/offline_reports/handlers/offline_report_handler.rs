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
use crate::features::auth::guards::RequireStaff;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::offline_reports::dtos::{StoredOfflineReportDto, UploadOfflineReportDto};
use crate::features::offline_reports::services::OfflineReportService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// Upload a report payload captured offline
#[utoipa::path(
    post,
    path = "/api/offline-reports",
    request_body = UploadOfflineReportDto,
    responses(
        (status = 201, description = "Payload stored", body = ApiResponse<StoredOfflineReportDto>),
        (status = 400, description = "Validation error")
    ),
    tag = "offline-reports"
)]
pub async fn upload_offline_report(
    State(service): State<Arc<OfflineReportService>>,
    user: Option<AuthenticatedUser>,
    AppJson(dto): AppJson<UploadOfflineReportDto>,
) -> Result<(StatusCode, Json<ApiResponse<StoredOfflineReportDto>>)> {
    dto.validate()?;

    let stored = service.store(dto.payload, user.as_ref()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(stored.into()), None, None)),
    ))
}

/// List uploaded offline payloads (staff only)
#[utoipa::path(
    get,
    path = "/api/offline-reports",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Offline uploads", body = ApiResponse<Vec<StoredOfflineReportDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Staff access required")
    ),
    tag = "offline-reports",
    security(("bearer_auth" = []))
)]
pub async fn list_offline_reports(
    RequireStaff(_user): RequireStaff,
    State(service): State<Arc<OfflineReportService>>,
    Query(params): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<StoredOfflineReportDto>>>> {
    let (items, total) = service.list(params.offset(), params.limit()).await?;
    let dtos: Vec<StoredOfflineReportDto> = items.into_iter().map(|r| r.into()).collect();

    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta { total }),
    )))
}

#[utoipa::path(
    get,
    path = "/api/offline-reports/{id}",
    params(("id" = Uuid, Path, description = "Offline report ID")),
    responses(
        (status = 200, description = "Offline upload", body = ApiResponse<StoredOfflineReportDto>),
        (status = 404, description = "Offline report not found")
    ),
    tag = "offline-reports"
)]
pub async fn get_offline_report(
    State(service): State<Arc<OfflineReportService>>,
    user: Option<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<StoredOfflineReportDto>>> {
    let stored = service.get(id, user.as_ref()).await?;
    Ok(Json(ApiResponse::success(Some(stored.into()), None, None)))
}

#[utoipa::path(
    delete,
    path = "/api/offline-reports/{id}",
    params(("id" = Uuid, Path, description = "Offline report ID")),
    responses(
        (status = 200, description = "Offline upload deleted"),
        (status = 404, description = "Offline report not found")
    ),
    tag = "offline-reports"
)]
pub async fn delete_offline_report(
    State(service): State<Arc<OfflineReportService>>,
    user: Option<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id, user.as_ref()).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Offline report deleted".to_string()),
        None,
    )))
}
