mod report;

pub use report::{CreateReport, Report, ReportFilter, ReportSeverity, ReportStatus};
