mod offline_report_service;

pub use offline_report_service::OfflineReportService;
