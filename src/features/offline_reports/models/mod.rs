mod stored_offline_report;

pub use stored_offline_report::StoredOfflineReport;
