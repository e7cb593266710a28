pub mod assignment_handler;
pub mod team_handler;

pub use assignment_handler::{
    __path_create_assignment, __path_delete_assignment, __path_get_assignment,
    __path_list_assignments, __path_update_assignment_status, create_assignment,
    delete_assignment, get_assignment, list_assignments, update_assignment_status,
};
pub use team_handler::{
    __path_create_team, __path_delete_team, __path_get_team, __path_list_teams,
    __path_update_team, create_team, delete_team, get_team, list_teams, update_team,
};
