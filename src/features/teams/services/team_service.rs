use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::teams::dtos::{CreateTeamDto, UpdateTeamDto};
use crate::features::teams::models::Team;

const TEAM_COLUMNS: &str = "id, name, leader, contact_email, contact_phone, specialization, \
     created_at, updated_at";

/// Service for field team operations
pub struct TeamService {
    pool: PgPool,
}

impl TeamService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Team>> {
        sqlx::query_as::<_, Team>(&format!("SELECT {TEAM_COLUMNS} FROM teams ORDER BY name"))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list teams: {:?}", e);
                AppError::Database(e)
            })
    }

    pub async fn get(&self, id: Uuid) -> Result<Team> {
        sqlx::query_as::<_, Team>(&format!("SELECT {TEAM_COLUMNS} FROM teams WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get team {}: {:?}", id, e);
                AppError::Database(e)
            })?
            .ok_or_else(|| team_not_found(id))
    }

    pub async fn create(&self, dto: CreateTeamDto) -> Result<Team> {
        let team = sqlx::query_as::<_, Team>(&format!(
            r#"
            INSERT INTO teams (id, name, leader, contact_email, contact_phone, specialization)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {TEAM_COLUMNS}
            "#
        ))
        .bind(Uuid::now_v7())
        .bind(&dto.name)
        .bind(&dto.leader)
        .bind(&dto.contact_email)
        .bind(&dto.contact_phone)
        .bind(&dto.specialization)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create team: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!("Created team {} ({})", team.name, team.id);
        Ok(team)
    }

    pub async fn update(&self, id: Uuid, dto: UpdateTeamDto) -> Result<Team> {
        sqlx::query_as::<_, Team>(&format!(
            r#"
            UPDATE teams
            SET name = COALESCE($2, name),
                leader = COALESCE($3, leader),
                contact_email = COALESCE($4, contact_email),
                contact_phone = COALESCE($5, contact_phone),
                specialization = COALESCE($6, specialization),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {TEAM_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&dto.name)
        .bind(&dto.leader)
        .bind(&dto.contact_email)
        .bind(&dto.contact_phone)
        .bind(&dto.specialization)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update team {}: {:?}", id, e);
            AppError::Database(e)
        })?
        .ok_or_else(|| team_not_found(id))
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete team {}: {:?}", id, e);
                AppError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(team_not_found(id));
        }

        tracing::info!("Deleted team {}", id);
        Ok(())
    }
}

fn team_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Team {} not found", id))
}
