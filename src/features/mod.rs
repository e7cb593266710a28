pub mod admin;
pub mod auth;
pub mod engagement;
pub mod offline_reports;
pub mod reports;
pub mod teams;
pub mod zones;
