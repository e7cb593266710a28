use std::sync::Arc;

use axum::{
    routing::{get, patch},
    Router,
};

use crate::features::engagement::handlers;
use crate::features::engagement::services::{
    AchievementService, NotificationService, TipService,
};

/// Public engagement routes
pub fn public_routes(tip_service: Arc<TipService>) -> Router {
    Router::new()
        .route("/api/tips", get(handlers::list_tips))
        .with_state(tip_service)
}

/// Per-user engagement routes (auth middleware applied by caller)
pub fn protected_routes(
    achievement_service: Arc<AchievementService>,
    notification_service: Arc<NotificationService>,
) -> Router {
    let achievements = Router::new()
        .route("/api/user/achievements", get(handlers::list_achievements))
        .with_state(achievement_service);

    let notifications = Router::new()
        .route("/api/user/notifications", get(handlers::list_notifications))
        .route(
            "/api/user/notifications/{id}/read",
            patch(handlers::mark_notification_read),
        )
        .with_state(notification_service);

    achievements.merge(notifications)
}
