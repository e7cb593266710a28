use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::ReportRepository;
use crate::core::error::{AppError, Result};
use crate::features::reports::models::{CreateReport, Report, ReportFilter, ReportStatus};

const REPORT_COLUMNS: &str = "id, user_id, title, description, address, latitude, longitude, \
     severity, status, photos, voice_note, anonymous, created_at, updated_at";

pub struct PgReportRepository {
    pool: PgPool,
}

impl PgReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReportRepository for PgReportRepository {
    async fn create(&self, report: CreateReport) -> Result<Report> {
        let sql = format!(
            r#"
            INSERT INTO reports (id, user_id, title, description, address, latitude, longitude,
                                 severity, status, photos, voice_note, anonymous)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'pending', $9, $10, $11)
            RETURNING {REPORT_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Report>(&sql)
            .bind(Uuid::now_v7())
            .bind(report.user_id)
            .bind(&report.title)
            .bind(&report.description)
            .bind(&report.address)
            .bind(&report.latitude)
            .bind(&report.longitude)
            .bind(report.severity)
            .bind(&report.photos)
            .bind(&report.voice_note)
            .bind(report.anonymous)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create report: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn list(&self, filter: &ReportFilter) -> Result<Vec<Report>> {
        let sql = format!(
            r#"
            SELECT {REPORT_COLUMNS}
            FROM reports
            WHERE ($1::uuid IS NULL OR user_id = $1)
              AND ($2::report_status IS NULL OR status = $2)
              AND ($3::report_severity IS NULL OR severity = $3)
            ORDER BY created_at DESC, id DESC
            "#
        );

        sqlx::query_as::<_, Report>(&sql)
            .bind(filter.user_id)
            .bind(filter.status)
            .bind(filter.severity)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list reports: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn get(&self, id: Uuid) -> Result<Option<Report>> {
        let sql = format!("SELECT {REPORT_COLUMNS} FROM reports WHERE id = $1");

        sqlx::query_as::<_, Report>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch report {}: {:?}", id, e);
                AppError::Database(e)
            })
    }

    async fn update_status(&self, id: Uuid, status: ReportStatus) -> Result<Option<Report>> {
        let sql = format!(
            r#"
            UPDATE reports
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {REPORT_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Report>(&sql)
            .bind(id)
            .bind(status)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update status of report {}: {:?}", id, e);
                AppError::Database(e)
            })
    }
}
