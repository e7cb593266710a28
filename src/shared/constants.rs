/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// ROLE CONSTANTS
// =============================================================================

/// Full back-office access: zones, teams, assignments, admin grants
pub const ROLE_ADMIN: &str = "admin";

/// Read-only access to dashboards and report triage
pub const ROLE_ANALYST: &str = "analyst";

/// Manages zones and schedules team assignments
pub const ROLE_PLANNER: &str = "planner";

/// Field inspector, updates report and assignment progress
pub const ROLE_INSPECTOR: &str = "inspector";

// =============================================================================
// DASHBOARD
// =============================================================================

/// Window used by the admin dashboard for "recent" reports
pub const RECENT_REPORTS_DAYS: i64 = 7;
