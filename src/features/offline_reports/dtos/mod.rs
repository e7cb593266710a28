mod offline_report_dto;

pub use offline_report_dto::*;
