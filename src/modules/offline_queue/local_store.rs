use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use super::QueueError;
use crate::features::reports::dtos::CreateReportDto;

/// A report submission waiting for connectivity
#[derive(Debug, Clone, PartialEq)]
pub struct OfflineReport {
    /// Local, auto-incremented; unrelated to the server-side report id
    pub id: i64,
    pub report: CreateReportDto,
    pub created_at: DateTime<Utc>,
}

/// An entry as read back from the store
///
/// Payloads are decoded one by one so a single bad row never hides the others.
#[derive(Debug, Clone, PartialEq)]
pub enum QueuedEntry {
    Ready(OfflineReport),
    /// The stored payload no longer decodes into a report
    Undecodable { id: i64, reason: String },
}

impl QueuedEntry {
    pub fn id(&self) -> i64 {
        match self {
            QueuedEntry::Ready(entry) => entry.id,
            QueuedEntry::Undecodable { id, .. } => *id,
        }
    }
}

/// Durable buffer the offline queue writes through
#[async_trait]
pub trait LocalQueueStore: Send + Sync {
    fn backend_tag(&self) -> &'static str;

    async fn enqueue(&self, report: &CreateReportDto) -> Result<OfflineReport, QueueError>;

    /// All entries, oldest first
    async fn list(&self) -> Result<Vec<QueuedEntry>, QueueError>;

    async fn remove(&self, id: i64) -> Result<(), QueueError>;

    async fn count(&self) -> Result<u64, QueueError>;
}

#[derive(Default)]
struct MemoryState {
    last_id: i64,
    entries: BTreeMap<i64, OfflineReport>,
}

/// Volatile store; `capacity` models a device that runs out of quota
#[derive(Default)]
pub struct MemoryQueueStore {
    state: Mutex<MemoryState>,
    capacity: Option<usize>,
}

impl MemoryQueueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: Mutex::new(MemoryState::default()),
            capacity: Some(capacity),
        }
    }
}

#[async_trait]
impl LocalQueueStore for MemoryQueueStore {
    fn backend_tag(&self) -> &'static str {
        "memory"
    }

    async fn enqueue(&self, report: &CreateReportDto) -> Result<OfflineReport, QueueError> {
        let mut state = self.state.lock().await;
        if let Some(capacity) = self.capacity {
            if state.entries.len() >= capacity {
                return Err(QueueError::StorageUnavailable(format!(
                    "queue is full ({} entries)",
                    capacity
                )));
            }
        }

        state.last_id += 1;
        let entry = OfflineReport {
            id: state.last_id,
            report: report.clone(),
            created_at: Utc::now(),
        };
        state.entries.insert(entry.id, entry.clone());
        Ok(entry)
    }

    async fn list(&self) -> Result<Vec<QueuedEntry>, QueueError> {
        Ok(self
            .state
            .lock()
            .await
            .entries
            .values()
            .cloned()
            .map(QueuedEntry::Ready)
            .collect())
    }

    async fn remove(&self, id: i64) -> Result<(), QueueError> {
        self.state.lock().await.entries.remove(&id);
        Ok(())
    }

    async fn count(&self) -> Result<u64, QueueError> {
        Ok(self.state.lock().await.entries.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::fake_report_payload;
    use tokio_test::{assert_err, assert_ok};

    #[tokio::test]
    async fn test_ids_increase_and_list_is_oldest_first() {
        let store = MemoryQueueStore::new();
        let first = assert_ok!(store.enqueue(&fake_report_payload()).await);
        let second = assert_ok!(store.enqueue(&fake_report_payload()).await);
        assert!(second.id > first.id);

        let ids: Vec<i64> = store.list().await.unwrap().iter().map(QueuedEntry::id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_remove() {
        let store = MemoryQueueStore::new();
        let first = store.enqueue(&fake_report_payload()).await.unwrap();
        store.remove(first.id).await.unwrap();

        let next = store.enqueue(&fake_report_payload()).await.unwrap();
        assert!(next.id > first.id);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_capacity_exhaustion() {
        let store = MemoryQueueStore::with_capacity(1);
        assert_ok!(store.enqueue(&fake_report_payload()).await);

        let err = assert_err!(store.enqueue(&fake_report_payload()).await);
        assert!(matches!(err, QueueError::StorageUnavailable(_)));
        assert_eq!(store.count().await.unwrap(), 1);
    }
}
