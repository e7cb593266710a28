use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::features::reports::handlers;
use crate::features::reports::services::ReportService;

/// Public report routes (no authentication required)
pub fn public_routes(service: Arc<ReportService>) -> Router {
    Router::new()
        .route("/api/reports", get(handlers::list_reports))
        .route("/api/reports/{id}", get(handlers::get_report))
        .with_state(service)
}

/// Report submission, attributed when a session is present
pub fn optional_auth_routes(service: Arc<ReportService>) -> Router {
    Router::new()
        .route("/api/reports", post(handlers::create_report))
        .with_state(service)
}

/// Routes that require a session (auth middleware applied by caller)
pub fn protected_routes(service: Arc<ReportService>) -> Router {
    Router::new()
        .route(
            "/api/reports/{id}/status",
            patch(handlers::update_report_status),
        )
        .route("/api/user/reports", get(handlers::list_my_reports))
        .with_state(service)
}
