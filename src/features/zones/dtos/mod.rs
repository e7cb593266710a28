mod zone_dto;

pub use zone_dto::*;
