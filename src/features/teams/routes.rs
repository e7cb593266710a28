use std::sync::Arc;

use axum::{
    routing::{get, patch},
    Router,
};

use crate::features::teams::handlers;
use crate::features::teams::services::{AssignmentService, TeamService};

/// Team and assignment routes, nested under `/api/admin` by the caller
pub fn routes(
    team_service: Arc<TeamService>,
    assignment_service: Arc<AssignmentService>,
) -> Router {
    let teams = Router::new()
        .route(
            "/teams",
            get(handlers::list_teams).post(handlers::create_team),
        )
        .route(
            "/teams/{id}",
            get(handlers::get_team)
                .put(handlers::update_team)
                .delete(handlers::delete_team),
        )
        .with_state(team_service);

    let assignments = Router::new()
        .route(
            "/team-assignments",
            get(handlers::list_assignments).post(handlers::create_assignment),
        )
        .route(
            "/team-assignments/{id}",
            get(handlers::get_assignment).delete(handlers::delete_assignment),
        )
        .route(
            "/team-assignments/{id}/status",
            patch(handlers::update_assignment_status),
        )
        .with_state(assignment_service);

    teams.merge(assignments)
}
