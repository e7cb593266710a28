use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::offline_reports::handlers;
use crate::features::offline_reports::services::OfflineReportService;

/// Upload and per-entry routes, attributed when a session is present
pub fn optional_auth_routes(service: Arc<OfflineReportService>) -> Router {
    Router::new()
        .route("/api/offline-reports", post(handlers::upload_offline_report))
        .route(
            "/api/offline-reports/{id}",
            get(handlers::get_offline_report).delete(handlers::delete_offline_report),
        )
        .with_state(service)
}

/// Staff listing (auth middleware applied by caller)
pub fn protected_routes(service: Arc<OfflineReportService>) -> Router {
    Router::new()
        .route("/api/offline-reports", get(handlers::list_offline_reports))
        .with_state(service)
}
