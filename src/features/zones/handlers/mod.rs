pub mod zone_handler;

pub use zone_handler::{
    __path_create_zone, __path_delete_zone, __path_get_zone, __path_list_zones,
    __path_update_zone, create_zone, delete_zone, get_zone, list_zones, update_zone,
};
