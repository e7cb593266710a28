mod admin_user;
mod user;

pub use admin_user::{AdminRole, AdminUser};
pub use user::User;
