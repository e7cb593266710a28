use std::sync::Arc;

use axum::{
    routing::{get, put},
    Router,
};

use crate::features::admin::handlers;
use crate::features::admin::services::AdminService;

/// Dashboard and role management routes, nested under `/api/admin`
pub fn routes(admin_service: Arc<AdminService>) -> Router {
    Router::new()
        .route("/dashboard", get(handlers::get_dashboard))
        .route("/admin-users", get(handlers::list_admin_users))
        .route(
            "/admin-users/{user_id}",
            put(handlers::grant_role).delete(handlers::revoke_role),
        )
        .with_state(admin_service)
}
