mod assignment;
mod team;

pub use assignment::{completion_time, AssignmentFilter, AssignmentStatus, TeamAssignmentDetail};
pub use team::Team;
