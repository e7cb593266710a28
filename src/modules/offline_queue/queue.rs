use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;

use super::{
    Connectivity, LocalQueueStore, OfflineReport, QueueError, QueuedEntry, ReportSubmitter,
};
use crate::features::reports::dtos::CreateReportDto;

/// Result of one flush of the queue
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncSummary {
    pub attempted: usize,
    pub synced: usize,
    pub failed: usize,
}

/// Whether a submitted report reached the server in the same call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Delivered,
    Queued,
}

pub struct OfflineQueue {
    store: Arc<dyn LocalQueueStore>,
    submitter: Arc<dyn ReportSubmitter>,
    connectivity: Connectivity,
    /// Serializes sync passes so an entry is never submitted twice concurrently
    sync_lock: Mutex<()>,
}

impl OfflineQueue {
    pub fn new(
        store: Arc<dyn LocalQueueStore>,
        submitter: Arc<dyn ReportSubmitter>,
        connectivity: Connectivity,
    ) -> Self {
        Self {
            store,
            submitter,
            connectivity,
            sync_lock: Mutex::new(()),
        }
    }

    pub fn connectivity(&self) -> &Connectivity {
        &self.connectivity
    }

    /// Persist `report` locally; storage failures are returned to the caller
    pub async fn save_offline_report(
        &self,
        report: CreateReportDto,
    ) -> Result<OfflineReport, QueueError> {
        let entry = self.store.enqueue(&report).await.map_err(|e| {
            tracing::error!(
                "Failed to queue report in {} store: {}",
                self.store.backend_tag(),
                e
            );
            e
        })?;

        tracing::debug!("Queued offline report #{}", entry.id);
        Ok(entry)
    }

    pub async fn count_pending(&self) -> Result<u64, QueueError> {
        self.store.count().await
    }

    /// Forward every queued entry, oldest first, one at a time
    ///
    /// A failed entry stays queued and does not stop the pass.
    pub async fn sync_pending(&self) -> Result<SyncSummary, QueueError> {
        let _guard = self.sync_lock.lock().await;

        let entries = self.store.list().await?;
        let mut summary = SyncSummary::default();

        for entry in entries {
            summary.attempted += 1;

            let entry = match entry {
                QueuedEntry::Ready(entry) => entry,
                QueuedEntry::Undecodable { id, reason } => {
                    tracing::warn!("Skipping unreadable offline report #{}: {}", id, reason);
                    summary.failed += 1;
                    continue;
                }
            };

            match self.submitter.submit(&entry.report).await {
                Ok(created) => match self.store.remove(entry.id).await {
                    Ok(()) => {
                        tracing::debug!("Synced offline report #{} as {}", entry.id, created.id);
                        summary.synced += 1;
                    }
                    Err(e) => {
                        tracing::warn!(
                            "Offline report #{} delivered as {} but not removed: {}",
                            entry.id,
                            created.id,
                            e
                        );
                        summary.failed += 1;
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to sync offline report #{}: {}", entry.id, e);
                    summary.failed += 1;
                }
            }
        }

        if summary.attempted > 0 {
            tracing::info!(
                "Offline sync finished: {} attempted, {} synced, {} failed",
                summary.attempted,
                summary.synced,
                summary.failed
            );
        }

        Ok(summary)
    }

    /// Save locally, then flush right away when online
    ///
    /// Only the local save can fail the call. Once the report is queued, sync
    /// problems are logged and the outcome is `Queued`.
    pub async fn submit(&self, report: CreateReportDto) -> Result<SubmitOutcome, QueueError> {
        let entry = self.save_offline_report(report).await?;

        if !self.connectivity.is_online() {
            return Ok(SubmitOutcome::Queued);
        }

        if let Err(e) = self.sync_pending().await {
            tracing::warn!("Offline report #{} queued, sync failed: {}", entry.id, e);
            return Ok(SubmitOutcome::Queued);
        }

        match self.store.list().await {
            Ok(pending) if pending.iter().any(|p| p.id() == entry.id) => Ok(SubmitOutcome::Queued),
            Ok(_) => Ok(SubmitOutcome::Delivered),
            Err(e) => {
                tracing::warn!("Could not confirm delivery of offline report #{}: {}", entry.id, e);
                Ok(SubmitOutcome::Queued)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reports::dtos::ReportResponseDto;
    use crate::features::reports::models::{ReportSeverity, ReportStatus};
    use crate::modules::offline_queue::{MemoryQueueStore, SqliteQueueStore};
    use crate::shared::test_helpers::fake_report_payload;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio_test::{assert_err, assert_ok};
    use uuid::Uuid;

    /// Accepts every report except the ones whose title is listed in `reject`
    #[derive(Default)]
    struct ScriptedSubmitter {
        reject: HashSet<String>,
        calls: AtomicUsize,
        delivered: std::sync::Mutex<Vec<String>>,
    }

    impl ScriptedSubmitter {
        fn rejecting(titles: &[&str]) -> Self {
            Self {
                reject: titles.iter().map(|t| t.to_string()).collect(),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl ReportSubmitter for ScriptedSubmitter {
        async fn submit(
            &self,
            report: &CreateReportDto,
        ) -> Result<ReportResponseDto, QueueError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.reject.contains(&report.title) {
                return Err(QueueError::Rejected {
                    status: 503,
                    message: "maintenance".to_string(),
                });
            }
            self.delivered.lock().unwrap().push(report.title.clone());

            let now = Utc::now();
            Ok(ReportResponseDto {
                id: Uuid::now_v7(),
                user_id: None,
                title: report.title.clone(),
                description: report.description.clone(),
                address: report.address.clone(),
                latitude: report.latitude.clone(),
                longitude: report.longitude.clone(),
                severity: report.severity.unwrap_or(ReportSeverity::Minor),
                status: ReportStatus::Pending,
                photos: report.photos.clone().unwrap_or_default(),
                voice_note: report.voice_note.clone(),
                anonymous: report.anonymous.unwrap_or(false),
                created_at: now,
                updated_at: now,
            })
        }
    }

    fn titled(title: &str) -> CreateReportDto {
        CreateReportDto {
            title: title.to_string(),
            ..fake_report_payload()
        }
    }

    fn queue(
        store: Arc<dyn LocalQueueStore>,
        submitter: Arc<ScriptedSubmitter>,
        online: bool,
    ) -> OfflineQueue {
        OfflineQueue::new(store, submitter, Connectivity::new(online))
    }

    #[tokio::test]
    async fn test_each_offline_save_adds_one_pending() {
        let submitter = Arc::new(ScriptedSubmitter::default());
        let queue = queue(Arc::new(MemoryQueueStore::new()), submitter.clone(), false);

        for expected in 1..=3 {
            assert_eq!(
                queue.submit(fake_report_payload()).await.unwrap(),
                SubmitOutcome::Queued
            );
            assert_eq!(queue.count_pending().await.unwrap(), expected);
        }
        assert_eq!(submitter.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_later_entries() {
        let submitter = Arc::new(ScriptedSubmitter::rejecting(&["second"]));
        let queue = queue(Arc::new(MemoryQueueStore::new()), submitter.clone(), false);
        for title in ["first", "second", "third"] {
            queue.save_offline_report(titled(title)).await.unwrap();
        }

        let summary = assert_ok!(queue.sync_pending().await);
        assert_eq!(
            summary,
            SyncSummary {
                attempted: 3,
                synced: 2,
                failed: 1
            }
        );
        assert_eq!(
            *submitter.delivered.lock().unwrap(),
            vec!["first".to_string(), "third".to_string()]
        );

        let remaining = queue.store.list().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert!(matches!(&remaining[0], QueuedEntry::Ready(entry) if entry.report.title == "second"));
    }

    #[tokio::test]
    async fn test_empty_sync_makes_no_calls() {
        let submitter = Arc::new(ScriptedSubmitter::default());
        let queue = queue(Arc::new(MemoryQueueStore::new()), submitter.clone(), true);

        let summary = assert_ok!(queue.sync_pending().await);
        assert_eq!(summary, SyncSummary::default());
        assert_eq!(submitter.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_storage_failure_propagates() {
        let submitter = Arc::new(ScriptedSubmitter::default());
        let queue = queue(
            Arc::new(MemoryQueueStore::with_capacity(0)),
            submitter.clone(),
            true,
        );

        let err = assert_err!(queue.submit(fake_report_payload()).await);
        assert!(matches!(err, QueueError::StorageUnavailable(_)));
        assert_eq!(submitter.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_online_submit_is_delivered_immediately() {
        let submitter = Arc::new(ScriptedSubmitter::default());
        let queue = queue(Arc::new(MemoryQueueStore::new()), submitter.clone(), true);

        assert_eq!(
            queue.submit(titled("burst pipe")).await.unwrap(),
            SubmitOutcome::Delivered
        );
        assert_eq!(queue.count_pending().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_online_submit_rejected_stays_queued() {
        let submitter = Arc::new(ScriptedSubmitter::rejecting(&["burst pipe"]));
        let queue = queue(Arc::new(MemoryQueueStore::new()), submitter, true);

        assert_eq!(
            queue.submit(titled("burst pipe")).await.unwrap(),
            SubmitOutcome::Queued
        );
        assert_eq!(queue.count_pending().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_passes_submit_each_entry_once() {
        let submitter = Arc::new(ScriptedSubmitter::default());
        let queue = Arc::new(queue(
            Arc::new(MemoryQueueStore::new()),
            submitter.clone(),
            true,
        ));
        for title in ["a", "b", "c"] {
            queue.save_offline_report(titled(title)).await.unwrap();
        }

        let (first, second) = tokio::join!(queue.sync_pending(), queue.sync_pending());
        assert_eq!(first.unwrap().synced + second.unwrap().synced, 3);
        assert_eq!(submitter.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_unreadable_entry_does_not_block_the_rest() {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let store = Arc::new(SqliteQueueStore::from_pool(pool.clone()).await.unwrap());
        sqlx::query("INSERT INTO offline_reports (payload, created_at) VALUES (?, ?)")
            .bind(r#"{"title":1}"#)
            .bind(Utc::now())
            .execute(&pool)
            .await
            .unwrap();

        let submitter = Arc::new(ScriptedSubmitter::default());
        let queue = queue(store, submitter.clone(), false);
        queue.save_offline_report(titled("valve leak")).await.unwrap();

        let summary = assert_ok!(queue.sync_pending().await);
        assert_eq!(
            summary,
            SyncSummary {
                attempted: 2,
                synced: 1,
                failed: 1
            }
        );
        assert_eq!(
            *submitter.delivered.lock().unwrap(),
            vec!["valve leak".to_string()]
        );
        assert_eq!(queue.count_pending().await.unwrap(), 1);

        queue.connectivity().set_online(true);
        assert_eq!(
            queue.submit(titled("hydrant")).await.unwrap(),
            SubmitOutcome::Delivered
        );
        assert_eq!(queue.count_pending().await.unwrap(), 1);
    }

    /// Saves fine but cannot read its entries back
    #[derive(Default)]
    struct UnlistableStore {
        inner: MemoryQueueStore,
    }

    #[async_trait]
    impl LocalQueueStore for UnlistableStore {
        fn backend_tag(&self) -> &'static str {
            "unlistable"
        }

        async fn enqueue(&self, report: &CreateReportDto) -> Result<OfflineReport, QueueError> {
            self.inner.enqueue(report).await
        }

        async fn list(&self) -> Result<Vec<QueuedEntry>, QueueError> {
            Err(QueueError::StorageUnavailable("disk I/O error".to_string()))
        }

        async fn remove(&self, id: i64) -> Result<(), QueueError> {
            self.inner.remove(id).await
        }

        async fn count(&self) -> Result<u64, QueueError> {
            self.inner.count().await
        }
    }

    #[tokio::test]
    async fn test_saved_report_is_queued_when_sync_fails() {
        let submitter = Arc::new(ScriptedSubmitter::default());
        let queue = queue(Arc::new(UnlistableStore::default()), submitter.clone(), true);

        assert_eq!(
            queue.submit(fake_report_payload()).await.unwrap(),
            SubmitOutcome::Queued
        );
        assert_eq!(queue.count_pending().await.unwrap(), 1);
        assert_eq!(submitter.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_auto_sync_started_online_flushes_leftovers() {
        let store = Arc::new(MemoryQueueStore::new());
        for title in ["left over", "from last run"] {
            store.enqueue(&titled(title)).await.unwrap();
        }

        let submitter = Arc::new(ScriptedSubmitter::default());
        let queue = Arc::new(queue(store, submitter.clone(), true));
        let auto_sync = crate::modules::offline_queue::spawn_auto_sync(queue.clone());

        tokio::time::timeout(std::time::Duration::from_secs(5), async {
            while queue.count_pending().await.unwrap() > 0 {
                tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("leftover entries flushed on start");

        assert_eq!(
            *submitter.delivered.lock().unwrap(),
            vec!["left over".to_string(), "from last run".to_string()]
        );
        auto_sync.abort();
    }
}

#[cfg(test)]
mod end_to_end {
    use super::*;
    use crate::features::reports::models::ReportFilter;
    use crate::features::reports::{routes, InMemoryReportRepository, ReportService};
    use crate::modules::offline_queue::{spawn_auto_sync, HttpReportSubmitter, SqliteQueueStore};
    use crate::shared::test_helpers::fake_report_payload;
    use axum::Router;
    use sqlx::sqlite::SqlitePoolOptions;
    use std::time::Duration;

    async fn serve_reports(service: Arc<ReportService>) -> String {
        let app = Router::new()
            .merge(routes::public_routes(service.clone()))
            .merge(routes::optional_auth_routes(service));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    async fn sqlite_store() -> Arc<SqliteQueueStore> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        Arc::new(SqliteQueueStore::from_pool(pool).await.unwrap())
    }

    #[tokio::test]
    async fn test_offline_submission_reaches_server_after_reconnect() {
        let reports = Arc::new(ReportService::new(Arc::new(InMemoryReportRepository::new())));
        let base_url = serve_reports(reports.clone()).await;

        let connectivity = Connectivity::new(false);
        let queue = Arc::new(OfflineQueue::new(
            sqlite_store().await,
            Arc::new(HttpReportSubmitter::new(&base_url)),
            connectivity.clone(),
        ));
        let auto_sync = spawn_auto_sync(queue.clone());

        let payload = CreateReportDto {
            title: "Main burst under bridge".to_string(),
            ..fake_report_payload()
        };
        assert_eq!(
            queue.submit(payload).await.unwrap(),
            SubmitOutcome::Queued
        );
        assert_eq!(queue.count_pending().await.unwrap(), 1);
        assert!(reports
            .list(&ReportFilter::default())
            .await
            .unwrap()
            .is_empty());

        connectivity.set_online(true);

        tokio::time::timeout(Duration::from_secs(5), async {
            while queue.count_pending().await.unwrap() > 0 {
                tokio::time::sleep(Duration::from_millis(20)).await;
            }
        })
        .await
        .expect("queue drained after reconnect");

        let stored = reports.list(&ReportFilter::default()).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].title, "Main burst under bridge");

        auto_sync.abort();
    }

    #[tokio::test]
    async fn test_server_validation_failure_keeps_entry() {
        let reports = Arc::new(ReportService::new(Arc::new(InMemoryReportRepository::new())));
        let base_url = serve_reports(reports.clone()).await;

        let queue = OfflineQueue::new(
            Arc::new(crate::modules::offline_queue::MemoryQueueStore::new()),
            Arc::new(HttpReportSubmitter::new(&base_url)),
            Connectivity::new(false),
        );
        let mut invalid = fake_report_payload();
        invalid.latitude = "north".to_string();
        queue.save_offline_report(invalid).await.unwrap();

        let summary = queue.sync_pending().await.unwrap();
        assert_eq!(summary.failed, 1);
        assert_eq!(queue.count_pending().await.unwrap(), 1);
    }
}
