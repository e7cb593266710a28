use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::engagement::dtos::{
    AchievementResponseDto, NotificationResponseDto, TipQuery, TipResponseDto,
};
use crate::features::engagement::services::{
    AchievementService, NotificationService, TipService,
};
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// List water-saving tips
#[utoipa::path(
    get,
    path = "/api/tips",
    params(TipQuery),
    responses(
        (status = 200, description = "List of tips", body = ApiResponse<Vec<TipResponseDto>>)
    ),
    tag = "engagement"
)]
pub async fn list_tips(
    State(service): State<Arc<TipService>>,
    Query(query): Query<TipQuery>,
) -> Result<Json<ApiResponse<Vec<TipResponseDto>>>> {
    let tips = service.list(query.category.as_deref()).await?;
    let dtos: Vec<TipResponseDto> = tips.into_iter().map(|t| t.into()).collect();
    Ok(Json(ApiResponse::success(Some(dtos), None, None)))
}

/// Achievements earned by the current user
#[utoipa::path(
    get,
    path = "/api/user/achievements",
    responses(
        (status = 200, description = "User achievements", body = ApiResponse<Vec<AchievementResponseDto>>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "engagement",
    security(("bearer_auth" = []))
)]
pub async fn list_achievements(
    user: AuthenticatedUser,
    State(service): State<Arc<AchievementService>>,
) -> Result<Json<ApiResponse<Vec<AchievementResponseDto>>>> {
    let achievements = service.list_for_user(user.user_id).await?;
    let dtos: Vec<AchievementResponseDto> = achievements.into_iter().map(|a| a.into()).collect();
    Ok(Json(ApiResponse::success(Some(dtos), None, None)))
}

/// Current user's notifications (paginated, newest first)
#[utoipa::path(
    get,
    path = "/api/user/notifications",
    params(PaginationQuery),
    responses(
        (status = 200, description = "User notifications", body = ApiResponse<Vec<NotificationResponseDto>>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "engagement",
    security(("bearer_auth" = []))
)]
pub async fn list_notifications(
    user: AuthenticatedUser,
    State(service): State<Arc<NotificationService>>,
    Query(params): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<NotificationResponseDto>>>> {
    let (items, total) = service
        .list_for_user(user.user_id, params.offset(), params.limit())
        .await?;
    let dtos: Vec<NotificationResponseDto> = items.into_iter().map(|n| n.into()).collect();

    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta { total }),
    )))
}

#[utoipa::path(
    patch,
    path = "/api/user/notifications/{id}/read",
    params(("id" = Uuid, Path, description = "Notification ID")),
    responses(
        (status = 200, description = "Notification marked read", body = ApiResponse<NotificationResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Notification not found")
    ),
    tag = "engagement",
    security(("bearer_auth" = []))
)]
pub async fn mark_notification_read(
    user: AuthenticatedUser,
    State(service): State<Arc<NotificationService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<NotificationResponseDto>>> {
    let notification = service.mark_read(user.user_id, id).await?;
    Ok(Json(ApiResponse::success(
        Some(notification.into()),
        None,
        None,
    )))
}

#[cfg(test)]
mod tests {
    use crate::features::engagement::{routes, AchievementService, NotificationService};
    use crate::shared::test_helpers::unreachable_pool;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_user_routes_require_session() {
        let pool = unreachable_pool();
        let app = routes::protected_routes(
            Arc::new(AchievementService::new(pool.clone())),
            Arc::new(NotificationService::new(pool)),
        );
        let server = TestServer::new(app).unwrap();

        server
            .get("/api/user/achievements")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
        server
            .patch(&format!("/api/user/notifications/{}/read", uuid::Uuid::now_v7()))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
