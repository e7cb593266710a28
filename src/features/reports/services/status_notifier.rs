use async_trait::async_trait;

use crate::core::error::Result;
use crate::features::reports::models::Report;

/// Told about every report that changed status
#[async_trait]
pub trait StatusNotifier: Send + Sync {
    async fn notify_status_change(&self, report: &Report) -> Result<()>;
}
