use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireStaff;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::reports::dtos::{
    CreateReportDto, ReportListQuery, ReportResponseDto, UpdateReportStatusDto,
};
use crate::features::reports::services::ReportService;
use crate::shared::types::{ApiResponse, Meta};

fn to_list_response(
    reports: Vec<crate::features::reports::models::Report>,
) -> Json<ApiResponse<Vec<ReportResponseDto>>> {
    let total = reports.len() as i64;
    let dtos: Vec<ReportResponseDto> = reports.into_iter().map(Into::into).collect();
    Json(ApiResponse::success(Some(dtos), None, Some(Meta { total })))
}

/// Submit a leak report
///
/// Works with or without a session; anonymous reports never record the submitter.
#[utoipa::path(
    post,
    path = "/api/reports",
    request_body = CreateReportDto,
    responses(
        (status = 201, description = "Report created", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Validation error")
    ),
    tag = "reports"
)]
pub async fn create_report(
    State(service): State<Arc<ReportService>>,
    user: Option<AuthenticatedUser>,
    AppJson(dto): AppJson<CreateReportDto>,
) -> Result<(StatusCode, Json<ApiResponse<ReportResponseDto>>)> {
    let report = service.create(dto, user.as_ref()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(report.into()),
            Some("Report submitted".to_string()),
            None,
        )),
    ))
}

/// List reports, newest first
#[utoipa::path(
    get,
    path = "/api/reports",
    params(ReportListQuery),
    responses(
        (status = 200, description = "Reports", body = ApiResponse<Vec<ReportResponseDto>>),
        (status = 400, description = "Unknown status filter")
    ),
    tag = "reports"
)]
pub async fn list_reports(
    State(service): State<Arc<ReportService>>,
    Query(query): Query<ReportListQuery>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    let filter = query.into_filter()?;
    let reports = service.list(&filter).await?;
    Ok(to_list_response(reports))
}

/// Get report by ID
#[utoipa::path(
    get,
    path = "/api/reports/{id}",
    params(
        ("id" = Uuid, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Report found", body = ApiResponse<ReportResponseDto>),
        (status = 404, description = "Report not found")
    ),
    tag = "reports"
)]
pub async fn get_report(
    State(service): State<Arc<ReportService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    let report = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(report.into()), None, None)))
}

/// Update report status (staff only)
#[utoipa::path(
    patch,
    path = "/api/reports/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Report ID")
    ),
    request_body = UpdateReportStatusDto,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Invalid status"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Staff access required"),
        (status = 404, description = "Report not found")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn update_report_status(
    RequireStaff(user): RequireStaff,
    State(service): State<Arc<ReportService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateReportStatusDto>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    tracing::info!("{} updating report {} to {}", user.username, id, dto.status);

    let report = service.update_status(id, &dto.status).await?;
    Ok(Json(ApiResponse::success(
        Some(report.into()),
        Some("Report status updated".to_string()),
        None,
    )))
}

/// List reports submitted by the authenticated user
#[utoipa::path(
    get,
    path = "/api/user/reports",
    responses(
        (status = 200, description = "User's reports", body = ApiResponse<Vec<ReportResponseDto>>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn list_my_reports(
    user: AuthenticatedUser,
    State(service): State<Arc<ReportService>>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    let reports = service.list_by_user(user.user_id).await?;
    Ok(to_list_response(reports))
}

#[cfg(test)]
mod tests {
    use crate::features::auth::model::AuthenticatedUser;
    use crate::features::auth::models::AdminRole;
    use crate::features::reports::dtos::ReportResponseDto;
    use crate::features::reports::repositories::InMemoryReportRepository;
    use crate::features::reports::{routes, ReportService};
    use crate::shared::test_helpers::{
        create_citizen_user, create_staff_user, fake_report_payload, with_user,
    };
    use crate::shared::types::ApiResponse;
    use axum::http::StatusCode;
    use axum::Router;
    use axum_test::TestServer;
    use serde_json::json;
    use std::sync::Arc;

    fn service() -> Arc<ReportService> {
        Arc::new(ReportService::new(Arc::new(InMemoryReportRepository::new())))
    }

    fn server(service: Arc<ReportService>, user: Option<AuthenticatedUser>) -> TestServer {
        let mut app = Router::new()
            .merge(routes::public_routes(service.clone()))
            .merge(routes::optional_auth_routes(service.clone()));
        let protected = routes::protected_routes(service);
        app = match user {
            Some(user) => with_user(app.merge(protected), user),
            None => app,
        };
        TestServer::new(app).unwrap()
    }

    async fn list(server: &TestServer) -> Vec<ReportResponseDto> {
        let body: ApiResponse<Vec<ReportResponseDto>> = server.get("/api/reports").await.json();
        body.data.unwrap()
    }

    #[tokio::test]
    async fn test_create_report_anonymously() {
        let server = server(service(), None);

        let response = server.post("/api/reports").json(&fake_report_payload()).await;
        response.assert_status(StatusCode::CREATED);

        let body: ApiResponse<ReportResponseDto> = response.json();
        let report = body.data.unwrap();
        assert_eq!(report.status.as_str(), "pending");
        assert!(report.user_id.is_none());
        assert_eq!(list(&server).await.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_title_is_rejected_and_not_stored() {
        let server = server(service(), None);
        let mut payload = serde_json::to_value(fake_report_payload()).unwrap();
        payload.as_object_mut().unwrap().remove("title");

        let response = server.post("/api/reports").json(&payload).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], json!(false));
        assert!(body["errors"]
            .as_array()
            .unwrap()
            .iter()
            .any(|e| e.as_str().unwrap().starts_with("title:")));

        assert!(list(&server).await.is_empty());
    }

    #[tokio::test]
    async fn test_signed_in_report_is_attributed() {
        let user = create_citizen_user();
        let server = server(service(), Some(user.clone()));

        server
            .post("/api/reports")
            .json(&fake_report_payload())
            .await
            .assert_status(StatusCode::CREATED);

        let body: ApiResponse<Vec<ReportResponseDto>> =
            server.get("/api/user/reports").await.json();
        let mine = body.data.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].user_id, Some(user.user_id));
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let server = server(service(), None);
        for title in ["older leak", "newer leak"] {
            let mut payload = fake_report_payload();
            payload.title = title.to_string();
            server.post("/api/reports").json(&payload).await;
        }

        let titles: Vec<String> = list(&server).await.into_iter().map(|r| r.title).collect();
        assert_eq!(titles, vec!["newer leak", "older leak"]);
    }

    #[tokio::test]
    async fn test_invalid_status_leaves_report_unchanged() {
        let service = service();
        let server = server(service.clone(), Some(create_staff_user(AdminRole::Inspector)));
        let created: ApiResponse<ReportResponseDto> = server
            .post("/api/reports")
            .json(&fake_report_payload())
            .await
            .json();
        let id = created.data.unwrap().id;

        server
            .patch(&format!("/api/reports/{}/status", id))
            .json(&json!({ "status": "fixed" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        assert_eq!(service.get(id).await.unwrap().status.as_str(), "pending");

        server
            .patch(&format!("/api/reports/{}/status", id))
            .json(&json!({ "status": "resolved" }))
            .await
            .assert_status_ok();
        assert_eq!(service.get(id).await.unwrap().status.as_str(), "resolved");
    }

    #[tokio::test]
    async fn test_citizen_cannot_update_status() {
        let service = service();
        let server = server(service.clone(), Some(create_citizen_user()));
        let report = service.create(fake_report_payload(), None).await.unwrap();

        server
            .patch(&format!("/api/reports/{}/status", report.id))
            .json(&json!({ "status": "resolved" }))
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_get_unknown_report() {
        let server = server(service(), None);
        server
            .get(&format!("/api/reports/{}", uuid::Uuid::now_v7()))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
