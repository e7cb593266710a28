use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::ReportRepository;
use crate::core::error::Result;
use crate::features::reports::models::{CreateReport, Report, ReportFilter, ReportStatus};

/// Process-local report store, for tests and database-less runs
#[derive(Default)]
pub struct InMemoryReportRepository {
    reports: Mutex<Vec<Report>>,
}

impl InMemoryReportRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReportRepository for InMemoryReportRepository {
    async fn create(&self, report: CreateReport) -> Result<Report> {
        let now = Utc::now();
        let stored = Report {
            id: Uuid::now_v7(),
            user_id: report.user_id,
            title: report.title,
            description: report.description,
            address: report.address,
            latitude: report.latitude,
            longitude: report.longitude,
            severity: report.severity,
            status: ReportStatus::Pending,
            photos: report.photos,
            voice_note: report.voice_note,
            anonymous: report.anonymous,
            created_at: now,
            updated_at: now,
        };

        self.reports.lock().await.push(stored.clone());
        Ok(stored)
    }

    async fn list(&self, filter: &ReportFilter) -> Result<Vec<Report>> {
        let reports = self.reports.lock().await;
        // reverse insertion order breaks timestamp ties
        let mut matching: Vec<Report> = reports
            .iter()
            .rev()
            .filter(|report| filter.matches(report))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Report>> {
        let reports = self.reports.lock().await;
        Ok(reports.iter().find(|report| report.id == id).cloned())
    }

    async fn update_status(&self, id: Uuid, status: ReportStatus) -> Result<Option<Report>> {
        let mut reports = self.reports.lock().await;
        Ok(reports.iter_mut().find(|report| report.id == id).map(|report| {
            report.status = status;
            report.updated_at = Utc::now();
            report.clone()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reports::models::ReportSeverity;

    fn leak(title: &str, user_id: Option<Uuid>, severity: ReportSeverity) -> CreateReport {
        CreateReport {
            user_id,
            title: title.to_string(),
            description: "Water pooling near the curb".to_string(),
            address: "Jl. Merdeka 1".to_string(),
            latitude: "-6.175392".to_string(),
            longitude: "106.827153".to_string(),
            severity,
            photos: vec![],
            voice_note: None,
            anonymous: user_id.is_none(),
        }
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let repo = InMemoryReportRepository::new();
        for title in ["first", "second", "third"] {
            repo.create(leak(title, None, ReportSeverity::Minor))
                .await
                .unwrap();
        }

        let titles: Vec<String> = repo
            .list(&ReportFilter::default())
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(titles, vec!["third", "second", "first"]);
    }

    #[tokio::test]
    async fn test_list_applies_filters() {
        let repo = InMemoryReportRepository::new();
        let owner = Uuid::now_v7();
        repo.create(leak("mine", Some(owner), ReportSeverity::Critical))
            .await
            .unwrap();
        let other = repo
            .create(leak("other", None, ReportSeverity::Critical))
            .await
            .unwrap();
        repo.update_status(other.id, ReportStatus::Resolved)
            .await
            .unwrap();

        let mine = repo
            .list(&ReportFilter {
                user_id: Some(owner),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].title, "mine");

        let resolved = repo
            .list(&ReportFilter {
                status: Some(ReportStatus::Resolved),
                severity: Some(ReportSeverity::Critical),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].id, other.id);
    }

    #[tokio::test]
    async fn test_update_status_unknown_id() {
        let repo = InMemoryReportRepository::new();
        let updated = repo
            .update_status(Uuid::now_v7(), ReportStatus::Resolved)
            .await
            .unwrap();
        assert!(updated.is_none());
    }
}
