use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::teams::dtos::{CreateAssignmentDto, UpdateAssignmentStatusDto};
use crate::features::teams::models::{
    completion_time, AssignmentFilter, AssignmentStatus, TeamAssignmentDetail,
};

const DETAIL_SELECT: &str = r#"
    SELECT a.id, a.team_id, t.name AS team_name, a.zone_id, z.name AS zone_name,
           a.status, a.notes, a.assigned_at, a.completed_at, a.updated_at
    FROM team_assignments a
    JOIN teams t ON t.id = a.team_id
    JOIN zones z ON z.id = a.zone_id
"#;

/// Service for team-to-zone assignments
pub struct AssignmentService {
    pool: PgPool,
}

impl AssignmentService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List assignments, most recent first
    pub async fn list(&self, filter: &AssignmentFilter) -> Result<Vec<TeamAssignmentDetail>> {
        sqlx::query_as::<_, TeamAssignmentDetail>(&format!(
            r#"
            {DETAIL_SELECT}
            WHERE ($1::uuid IS NULL OR a.team_id = $1)
              AND ($2::uuid IS NULL OR a.zone_id = $2)
              AND ($3::assignment_status IS NULL OR a.status = $3)
            ORDER BY a.assigned_at DESC
            "#
        ))
        .bind(filter.team_id)
        .bind(filter.zone_id)
        .bind(filter.status)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list team assignments: {:?}", e);
            AppError::Database(e)
        })
    }

    pub async fn get(&self, id: Uuid) -> Result<TeamAssignmentDetail> {
        sqlx::query_as::<_, TeamAssignmentDetail>(&format!("{DETAIL_SELECT} WHERE a.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get team assignment {}: {:?}", id, e);
                AppError::Database(e)
            })?
            .ok_or_else(|| assignment_not_found(id))
    }

    /// Assign a team to a zone; both must exist
    pub async fn create(&self, dto: CreateAssignmentDto) -> Result<TeamAssignmentDetail> {
        if !self.exists("teams", dto.team_id).await? {
            return Err(AppError::NotFound(format!("Team {} not found", dto.team_id)));
        }
        if !self.exists("zones", dto.zone_id).await? {
            return Err(AppError::NotFound(format!("Zone {} not found", dto.zone_id)));
        }

        let id = Uuid::now_v7();
        sqlx::query(
            r#"
            INSERT INTO team_assignments (id, team_id, zone_id, status, notes)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(id)
        .bind(dto.team_id)
        .bind(dto.zone_id)
        .bind(AssignmentStatus::Assigned)
        .bind(&dto.notes)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create team assignment: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!(
            "Assigned team {} to zone {} ({})",
            dto.team_id,
            dto.zone_id,
            id
        );

        self.get(id).await
    }

    /// Move an assignment through its lifecycle
    pub async fn update_status(
        &self,
        id: Uuid,
        dto: UpdateAssignmentStatusDto,
    ) -> Result<TeamAssignmentDetail> {
        let result = sqlx::query(
            r#"
            UPDATE team_assignments
            SET status = $2,
                completed_at = $3,
                notes = COALESCE($4, notes),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(dto.status)
        .bind(completion_time(dto.status, Utc::now()))
        .bind(&dto.notes)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update team assignment {}: {:?}", id, e);
            AppError::Database(e)
        })?;

        if result.rows_affected() == 0 {
            return Err(assignment_not_found(id));
        }

        self.get(id).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM team_assignments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete team assignment {}: {:?}", id, e);
                AppError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(assignment_not_found(id));
        }
        Ok(())
    }

    /// `table` is always one of our own literals
    async fn exists(&self, table: &'static str, id: Uuid) -> Result<bool> {
        sqlx::query_scalar::<_, bool>(&format!(
            "SELECT EXISTS(SELECT 1 FROM {table} WHERE id = $1)"
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to look up {} {}: {:?}", table, id, e);
            AppError::Database(e)
        })
    }
}

fn assignment_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Team assignment {} not found", id))
}
