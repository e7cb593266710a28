mod report_service;
mod status_notifier;

pub use report_service::ReportService;
pub use status_notifier::StatusNotifier;
