use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;

use super::{LocalQueueStore, OfflineReport, QueueError, QueuedEntry};
use crate::features::reports::dtos::CreateReportDto;

#[derive(Debug, FromRow)]
struct QueueRow {
    id: i64,
    payload: String,
    created_at: DateTime<Utc>,
}

impl QueueRow {
    fn into_entry(self) -> QueuedEntry {
        match serde_json::from_str(&self.payload) {
            Ok(report) => QueuedEntry::Ready(OfflineReport {
                id: self.id,
                report,
                created_at: self.created_at,
            }),
            Err(e) => {
                tracing::warn!("Offline report #{} has an unreadable payload: {}", self.id, e);
                QueuedEntry::Undecodable {
                    id: self.id,
                    reason: e.to_string(),
                }
            }
        }
    }
}

/// Durable queue in a local SQLite database
pub struct SqliteQueueStore {
    pool: SqlitePool,
}

impl SqliteQueueStore {
    /// Open (creating if needed) the database at `url`, e.g. `sqlite://queue.db`
    pub async fn connect(url: &str) -> Result<Self, QueueError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        Self::from_pool(pool).await
    }

    /// Use an existing pool, creating the queue table if missing
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, QueueError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS offline_reports (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                payload TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl LocalQueueStore for SqliteQueueStore {
    fn backend_tag(&self) -> &'static str {
        "sqlite"
    }

    async fn enqueue(&self, report: &CreateReportDto) -> Result<OfflineReport, QueueError> {
        let payload = serde_json::to_string(report)?;
        let created_at = Utc::now();

        let id = sqlx::query("INSERT INTO offline_reports (payload, created_at) VALUES (?, ?)")
            .bind(&payload)
            .bind(created_at)
            .execute(&self.pool)
            .await?
            .last_insert_rowid();

        Ok(OfflineReport {
            id,
            report: report.clone(),
            created_at,
        })
    }

    async fn list(&self) -> Result<Vec<QueuedEntry>, QueueError> {
        let rows = sqlx::query_as::<_, QueueRow>(
            "SELECT id, payload, created_at FROM offline_reports ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(QueueRow::into_entry).collect())
    }

    async fn remove(&self, id: i64) -> Result<(), QueueError> {
        sqlx::query("DELETE FROM offline_reports WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn count(&self) -> Result<u64, QueueError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM offline_reports")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::fake_report_payload;

    async fn store() -> SqliteQueueStore {
        // a single connection that never idles out keeps the in-memory database alive
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        SqliteQueueStore::from_pool(pool).await.unwrap()
    }

    #[tokio::test]
    async fn test_round_trips_full_payload() {
        let store = store().await;
        let mut payload = fake_report_payload();
        payload.photos = Some(vec!["https://cdn.example/leak-1.jpg".to_string()]);
        payload.anonymous = Some(true);

        let saved = store.enqueue(&payload).await.unwrap();
        let listed = store.list().await.unwrap();

        assert_eq!(listed.len(), 1);
        let QueuedEntry::Ready(entry) = &listed[0] else {
            panic!("expected a decoded entry");
        };
        assert_eq!(entry.id, saved.id);
        assert_eq!(entry.report, payload);
    }

    #[tokio::test]
    async fn test_autoincrement_never_reuses_ids() {
        let store = store().await;
        let first = store.enqueue(&fake_report_payload()).await.unwrap();
        let second = store.enqueue(&fake_report_payload()).await.unwrap();
        store.remove(second.id).await.unwrap();

        let third = store.enqueue(&fake_report_payload()).await.unwrap();
        assert!(third.id > second.id);

        let ids: Vec<i64> = store.list().await.unwrap().iter().map(QueuedEntry::id).collect();
        assert_eq!(ids, vec![first.id, third.id]);
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_corrupt_payload_does_not_hide_other_entries() {
        let store = store().await;
        sqlx::query("INSERT INTO offline_reports (payload, created_at) VALUES (?, ?)")
            .bind(r#"{"title":1}"#)
            .bind(Utc::now())
            .execute(&store.pool)
            .await
            .unwrap();
        let valid = store.enqueue(&fake_report_payload()).await.unwrap();

        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert!(matches!(listed[0], QueuedEntry::Undecodable { .. }));
        assert!(matches!(&listed[1], QueuedEntry::Ready(entry) if entry.id == valid.id));
    }
}
