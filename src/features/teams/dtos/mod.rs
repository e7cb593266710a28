mod assignment_dto;
mod team_dto;

pub use assignment_dto::*;
pub use team_dto::*;
