mod assignment_service;
mod team_service;

pub use assignment_service::AssignmentService;
pub use team_service::TeamService;
