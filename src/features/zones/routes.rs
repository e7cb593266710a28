use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::zones::handlers;
use crate::features::zones::services::ZoneService;

/// Zone routes, nested under `/api/admin` by the caller
///
/// Reads need a staff role, writes need planner access.
pub fn routes(service: Arc<ZoneService>) -> Router {
    Router::new()
        .route(
            "/zones",
            get(handlers::list_zones).post(handlers::create_zone),
        )
        .route(
            "/zones/{id}",
            get(handlers::get_zone)
                .put(handlers::update_zone)
                .delete(handlers::delete_zone),
        )
        .with_state(service)
}
