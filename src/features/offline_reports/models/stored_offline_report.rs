use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::features::auth::model::AuthenticatedUser;
use crate::features::reports::dtos::CreateReportDto;

/// Raw report payload uploaded by a client that captured it offline
#[derive(Debug, Clone, FromRow)]
pub struct StoredOfflineReport {
    pub id: Uuid,
    pub payload: Json<CreateReportDto>,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl StoredOfflineReport {
    /// Unowned uploads are reachable by id alone; owned ones by their owner or staff
    pub fn is_visible_to(&self, user: Option<&AuthenticatedUser>) -> bool {
        match (self.user_id, user) {
            (None, _) => true,
            (Some(_), Some(user)) if user.is_staff() => true,
            (Some(owner), Some(user)) => owner == user.user_id,
            (Some(_), None) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::models::AdminRole;
    use crate::shared::test_helpers::{
        create_citizen_user, create_staff_user, fake_report_payload,
    };

    fn stored(user_id: Option<Uuid>) -> StoredOfflineReport {
        StoredOfflineReport {
            id: Uuid::now_v7(),
            payload: Json(fake_report_payload()),
            user_id,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_unowned_upload_is_visible_to_anyone() {
        let upload = stored(None);
        assert!(upload.is_visible_to(None));
        assert!(upload.is_visible_to(Some(&create_citizen_user())));
    }

    #[test]
    fn test_owned_upload_visibility() {
        let owner = create_citizen_user();
        let upload = stored(Some(owner.user_id));

        assert!(upload.is_visible_to(Some(&owner)));
        assert!(upload.is_visible_to(Some(&create_staff_user(AdminRole::Inspector))));
        assert!(!upload.is_visible_to(Some(&create_citizen_user())));
        assert!(!upload.is_visible_to(None));
    }
}
