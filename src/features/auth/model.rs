use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::auth::models::AdminRole;

/// Identity attached to a request by the session middleware
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub username: String,
    /// Back-office role, absent for citizens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<AdminRole>,
    pub is_super_admin: bool,
}

impl AuthenticatedUser {
    /// Check if user holds a specific back-office role
    pub fn has_role(&self, role: AdminRole) -> bool {
        self.role == Some(role)
    }

    pub fn is_super_admin(&self) -> bool {
        self.is_super_admin
    }

    /// Any back-office account (admin, analyst, planner, inspector or super admin)
    pub fn is_staff(&self) -> bool {
        self.is_super_admin || self.role.is_some()
    }

    pub fn has_admin_access(&self) -> bool {
        self.is_super_admin || self.has_role(AdminRole::Admin)
    }

    /// Zone and assignment planning (admin or planner)
    pub fn has_planner_access(&self) -> bool {
        self.has_admin_access() || self.has_role(AdminRole::Planner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Option<AdminRole>, is_super_admin: bool) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: Uuid::now_v7(),
            username: "tester".to_string(),
            role,
            is_super_admin,
        }
    }

    #[test]
    fn test_citizen_has_no_back_office_access() {
        let citizen = user(None, false);
        assert!(!citizen.is_staff());
        assert!(!citizen.has_planner_access());
        assert!(!citizen.has_admin_access());
    }

    #[test]
    fn test_role_hierarchy() {
        let inspector = user(Some(AdminRole::Inspector), false);
        assert!(inspector.is_staff());
        assert!(!inspector.has_planner_access());

        let planner = user(Some(AdminRole::Planner), false);
        assert!(planner.has_planner_access());
        assert!(!planner.has_admin_access());

        let admin = user(Some(AdminRole::Admin), false);
        assert!(admin.has_planner_access());
        assert!(admin.has_admin_access());
        assert!(!admin.is_super_admin());
    }

    #[test]
    fn test_super_admin_without_role_row() {
        let root = user(None, true);
        assert!(root.is_staff());
        assert!(root.has_admin_access());
        assert!(root.has_planner_access());
    }
}
