mod memory;
mod postgres;

pub use memory::InMemoryReportRepository;
pub use postgres::PgReportRepository;

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::reports::models::{CreateReport, Report, ReportFilter, ReportStatus};

/// Persistence seam for leak reports
#[async_trait]
pub trait ReportRepository: Send + Sync {
    async fn create(&self, report: CreateReport) -> Result<Report>;

    /// Reports matching `filter`, newest first
    async fn list(&self, filter: &ReportFilter) -> Result<Vec<Report>>;

    async fn get(&self, id: Uuid) -> Result<Option<Report>>;

    /// Returns `None` when no report has this id
    async fn update_status(&self, id: Uuid, status: ReportStatus) -> Result<Option<Report>>;
}
