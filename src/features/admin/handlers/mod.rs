pub mod admin_handlers;

pub use admin_handlers::{
    __path_get_dashboard, __path_grant_role, __path_list_admin_users, __path_revoke_role,
    get_dashboard, grant_role, list_admin_users, revoke_role,
};
