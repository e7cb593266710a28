pub mod offline_report_handler;

pub use offline_report_handler::{
    __path_delete_offline_report, __path_get_offline_report, __path_list_offline_reports,
    __path_upload_offline_report, delete_offline_report, get_offline_report,
    list_offline_reports, upload_offline_report,
};
