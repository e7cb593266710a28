use std::sync::Arc;

use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::reports::dtos::CreateReportDto;
use crate::features::reports::models::{Report, ReportFilter, ReportStatus};
use crate::features::reports::repositories::ReportRepository;
use crate::features::reports::services::StatusNotifier;
use validator::Validate;

/// Service for report operations
pub struct ReportService {
    repository: Arc<dyn ReportRepository>,
    notifier: Option<Arc<dyn StatusNotifier>>,
}

impl ReportService {
    pub fn new(repository: Arc<dyn ReportRepository>) -> Self {
        Self {
            repository,
            notifier: None,
        }
    }

    /// Notify report owners when their report changes status
    pub fn with_notifications(mut self, notifier: Arc<dyn StatusNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Validate and persist a new report with status `pending`
    pub async fn create(
        &self,
        dto: CreateReportDto,
        user: Option<&AuthenticatedUser>,
    ) -> Result<Report> {
        dto.validate()?;

        let data = dto.into_create_report(user.map(|u| u.user_id))?;
        let report = self.repository.create(data).await?;

        tracing::info!(
            "Created report {} ({}, {})",
            report.id,
            report.severity,
            if report.anonymous { "anonymous" } else { "attributed" }
        );

        Ok(report)
    }

    /// List reports, newest first
    pub async fn list(&self, filter: &ReportFilter) -> Result<Vec<Report>> {
        self.repository.list(filter).await
    }

    /// Reports submitted by `user_id`, newest first
    pub async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Report>> {
        let filter = ReportFilter {
            user_id: Some(user_id),
            ..Default::default()
        };
        self.repository.list(&filter).await
    }

    /// Get report by ID
    pub async fn get(&self, id: Uuid) -> Result<Report> {
        self.repository
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))
    }

    /// Move a report to `status`
    ///
    /// The status string is parsed before the store is touched, so an unknown
    /// value never mutates the report.
    pub async fn update_status(&self, id: Uuid, status: &str) -> Result<Report> {
        let status: ReportStatus = status.parse().map_err(AppError::InvalidStatus)?;

        let report = self
            .repository
            .update_status(id, status)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))?;

        tracing::info!("Report {} moved to {}", report.id, report.status);

        // best-effort, anonymous reports have nobody to tell
        if let (Some(notifier), Some(_)) = (&self.notifier, report.user_id) {
            if let Err(e) = notifier.notify_status_change(&report).await {
                tracing::warn!(
                    "Failed to notify owner of report {} about status change: {:?}",
                    report.id,
                    e
                );
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reports::repositories::InMemoryReportRepository;
    use crate::shared::test_helpers::{create_citizen_user, fake_report_payload};
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn service() -> ReportService {
        ReportService::new(Arc::new(InMemoryReportRepository::new()))
    }

    /// Records notified report ids, optionally failing every call
    #[derive(Default)]
    struct RecordingNotifier {
        notified: Mutex<Vec<(Uuid, ReportStatus)>>,
        fail: bool,
    }

    #[async_trait]
    impl StatusNotifier for RecordingNotifier {
        async fn notify_status_change(&self, report: &Report) -> Result<()> {
            self.notified
                .lock()
                .unwrap()
                .push((report.id, report.status));
            if self.fail {
                return Err(AppError::Internal("notification store offline".to_string()));
            }
            Ok(())
        }
    }

    fn notifying_service(notifier: Arc<RecordingNotifier>) -> ReportService {
        service().with_notifications(notifier)
    }

    #[tokio::test]
    async fn test_create_without_title_persists_nothing() {
        let service = service();
        let mut dto = fake_report_payload();
        dto.title = String::new();

        let err = service.create(dto, None).await.unwrap_err();
        match err {
            AppError::Validation(messages) => {
                assert!(messages.iter().any(|m| m.starts_with("title:")));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert!(service.list(&ReportFilter::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_starts_pending_and_keeps_owner() {
        let service = service();
        let user = create_citizen_user();

        let report = service
            .create(fake_report_payload(), Some(&user))
            .await
            .unwrap();

        assert_eq!(report.status, ReportStatus::Pending);
        assert_eq!(report.user_id, Some(user.user_id));
        assert_eq!(service.list_by_user(user.user_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_status_does_not_mutate() {
        let service = service();
        let report = service.create(fake_report_payload(), None).await.unwrap();

        let err = service
            .update_status(report.id, "in_progress")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidStatus(ref s) if s == "in_progress"));

        let stored = service.get(report.id).await.unwrap();
        assert_eq!(stored.status, ReportStatus::Pending);
        assert_eq!(stored.updated_at, report.updated_at);
    }

    #[tokio::test]
    async fn test_update_status_unknown_report() {
        let err = service()
            .update_status(Uuid::now_v7(), "resolved")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_status_moves_report() {
        let service = service();
        let report = service.create(fake_report_payload(), None).await.unwrap();

        let updated = service
            .update_status(report.id, "in-progress")
            .await
            .unwrap();
        assert_eq!(updated.status, ReportStatus::InProgress);
        assert_eq!(
            service.get(report.id).await.unwrap().status,
            ReportStatus::InProgress
        );
    }

    #[tokio::test]
    async fn test_status_change_notifies_owner() {
        let notifier = Arc::new(RecordingNotifier::default());
        let service = notifying_service(notifier.clone());
        let user = create_citizen_user();
        let report = service
            .create(fake_report_payload(), Some(&user))
            .await
            .unwrap();

        service.update_status(report.id, "resolved").await.unwrap();

        assert_eq!(
            *notifier.notified.lock().unwrap(),
            vec![(report.id, ReportStatus::Resolved)]
        );
    }

    #[tokio::test]
    async fn test_anonymous_report_status_change_notifies_nobody() {
        let notifier = Arc::new(RecordingNotifier::default());
        let service = notifying_service(notifier.clone());
        let report = service.create(fake_report_payload(), None).await.unwrap();

        service.update_status(report.id, "in-progress").await.unwrap();

        assert!(notifier.notified.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_notification_failure_does_not_fail_update() {
        let notifier = Arc::new(RecordingNotifier {
            fail: true,
            ..Default::default()
        });
        let service = notifying_service(notifier.clone());
        let user = create_citizen_user();
        let report = service
            .create(fake_report_payload(), Some(&user))
            .await
            .unwrap();

        let updated = service.update_status(report.id, "resolved").await.unwrap();

        assert_eq!(updated.status, ReportStatus::Resolved);
        assert_eq!(
            service.get(report.id).await.unwrap().status,
            ReportStatus::Resolved
        );
        assert_eq!(notifier.notified.lock().unwrap().len(), 1);
    }
}
