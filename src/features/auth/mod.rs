mod password;

pub mod dtos;
pub mod guards;
pub mod handlers;
pub mod model;
pub mod models;
pub mod routes;
pub mod services;
pub mod workers;

pub use password::{generate_session_token, hash_password, hash_session_token, verify_password};
pub use services::AuthService;
pub use workers::SessionCleanupWorker;
