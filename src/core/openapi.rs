use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::admin::{dtos as admin_dtos, handlers as admin_handlers};
use crate::features::auth;
use crate::features::engagement::{dtos as engagement_dtos, handlers as engagement_handlers};
use crate::features::offline_reports::{
    dtos as offline_reports_dtos, handlers as offline_reports_handlers,
};
use crate::features::reports::{
    dtos as reports_dtos, handlers as reports_handlers, models as reports_models,
};
use crate::features::teams::{
    dtos as teams_dtos, handlers as teams_handlers, models as teams_models,
};
use crate::features::zones::{dtos as zones_dtos, handlers as zones_handlers};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handlers::register,
        auth::handlers::login,
        auth::handlers::logout,
        auth::handlers::get_me,
        // Reports
        reports_handlers::create_report,
        reports_handlers::list_reports,
        reports_handlers::get_report,
        reports_handlers::update_report_status,
        reports_handlers::list_my_reports,
        // Offline uploads
        offline_reports_handlers::upload_offline_report,
        offline_reports_handlers::list_offline_reports,
        offline_reports_handlers::get_offline_report,
        offline_reports_handlers::delete_offline_report,
        // Zones
        zones_handlers::list_zones,
        zones_handlers::get_zone,
        zones_handlers::create_zone,
        zones_handlers::update_zone,
        zones_handlers::delete_zone,
        // Teams and assignments
        teams_handlers::list_teams,
        teams_handlers::get_team,
        teams_handlers::create_team,
        teams_handlers::update_team,
        teams_handlers::delete_team,
        teams_handlers::list_assignments,
        teams_handlers::get_assignment,
        teams_handlers::create_assignment,
        teams_handlers::update_assignment_status,
        teams_handlers::delete_assignment,
        // Admin
        admin_handlers::get_dashboard,
        admin_handlers::list_admin_users,
        admin_handlers::grant_role,
        admin_handlers::revoke_role,
        // Engagement
        engagement_handlers::list_tips,
        engagement_handlers::list_achievements,
        engagement_handlers::list_notifications,
        engagement_handlers::mark_notification_read,
    ),
    components(
        schemas(
            Meta,
            // Auth
            auth::dtos::RegisterRequestDto,
            auth::dtos::LoginRequestDto,
            auth::dtos::AuthResponseDto,
            auth::dtos::MeResponseDto,
            auth::model::AuthenticatedUser,
            auth::models::AdminRole,
            ApiResponse<auth::dtos::AuthResponseDto>,
            ApiResponse<auth::dtos::MeResponseDto>,
            // Reports
            reports_models::ReportStatus,
            reports_models::ReportSeverity,
            reports_dtos::CreateReportDto,
            reports_dtos::ReportResponseDto,
            reports_dtos::UpdateReportStatusDto,
            ApiResponse<reports_dtos::ReportResponseDto>,
            ApiResponse<Vec<reports_dtos::ReportResponseDto>>,
            // Offline uploads
            offline_reports_dtos::UploadOfflineReportDto,
            offline_reports_dtos::StoredOfflineReportDto,
            ApiResponse<offline_reports_dtos::StoredOfflineReportDto>,
            ApiResponse<Vec<offline_reports_dtos::StoredOfflineReportDto>>,
            // Zones
            zones_dtos::CreateZoneDto,
            zones_dtos::UpdateZoneDto,
            zones_dtos::ZoneResponseDto,
            ApiResponse<zones_dtos::ZoneResponseDto>,
            ApiResponse<Vec<zones_dtos::ZoneResponseDto>>,
            // Teams and assignments
            teams_models::AssignmentStatus,
            teams_dtos::CreateTeamDto,
            teams_dtos::UpdateTeamDto,
            teams_dtos::TeamResponseDto,
            teams_dtos::CreateAssignmentDto,
            teams_dtos::UpdateAssignmentStatusDto,
            teams_dtos::TeamAssignmentResponseDto,
            ApiResponse<teams_dtos::TeamResponseDto>,
            ApiResponse<Vec<teams_dtos::TeamResponseDto>>,
            ApiResponse<teams_dtos::TeamAssignmentResponseDto>,
            ApiResponse<Vec<teams_dtos::TeamAssignmentResponseDto>>,
            // Admin
            admin_dtos::StatusCounts,
            admin_dtos::SeverityCounts,
            admin_dtos::ReportStats,
            admin_dtos::DashboardDto,
            admin_dtos::AdminUserDto,
            admin_dtos::GrantRoleDto,
            ApiResponse<admin_dtos::DashboardDto>,
            ApiResponse<Vec<admin_dtos::AdminUserDto>>,
            // Engagement
            engagement_dtos::TipResponseDto,
            engagement_dtos::AchievementResponseDto,
            engagement_dtos::NotificationResponseDto,
            ApiResponse<Vec<engagement_dtos::TipResponseDto>>,
            ApiResponse<Vec<engagement_dtos::AchievementResponseDto>>,
            ApiResponse<engagement_dtos::NotificationResponseDto>,
            ApiResponse<Vec<engagement_dtos::NotificationResponseDto>>,
        )
    ),
    tags(
        (name = "auth", description = "Registration, login and sessions"),
        (name = "reports", description = "Citizen leak reports"),
        (name = "offline-reports", description = "Reports uploaded after being captured offline"),
        (name = "zones", description = "Service zones (back office)"),
        (name = "teams", description = "Field teams and zone assignments (back office)"),
        (name = "admin", description = "Dashboard and back-office account management"),
        (name = "engagement", description = "Tips, achievements and notifications"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Leakwatch API",
        version = "0.1.0",
        description = "API documentation for Leakwatch",
    )
)]
pub struct ApiDoc;

/// Adds the bearer session token scheme to the OpenAPI doc
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("session token")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_feature_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/reports",
            "/api/reports/{id}/status",
            "/api/offline-reports",
            "/api/admin/zones",
            "/api/admin/team-assignments/{id}/status",
            "/api/admin/dashboard",
            "/api/user/notifications",
            "/api/tips",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }

    #[test]
    fn test_bearer_scheme_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.unwrap();
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }

    #[test]
    fn test_info_modifier_overrides() {
        let mut doc = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Ops".to_string(),
            version: "9".to_string(),
            description: "internal".to_string(),
        }
        .modify(&mut doc);
        assert_eq!(doc.info.title, "Ops");
        assert_eq!(doc.info.description.as_deref(), Some("internal"));
    }
}
