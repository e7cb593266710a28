use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::zones::dtos::{CreateZoneDto, UpdateZoneDto, DEFAULT_ZONE_COLOR};
use crate::features::zones::models::Zone;

const ZONE_COLUMNS: &str =
    "id, name, description, color, boundaries, priority, created_at, updated_at";

/// Service for zone operations
pub struct ZoneService {
    pool: PgPool,
}

impl ZoneService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all zones, highest priority first
    pub async fn list(&self) -> Result<Vec<Zone>> {
        sqlx::query_as::<_, Zone>(&format!(
            "SELECT {ZONE_COLUMNS} FROM zones ORDER BY priority DESC, name"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list zones: {:?}", e);
            AppError::Database(e)
        })
    }

    /// Get zone by ID
    pub async fn get(&self, id: Uuid) -> Result<Zone> {
        sqlx::query_as::<_, Zone>(&format!("SELECT {ZONE_COLUMNS} FROM zones WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get zone {}: {:?}", id, e);
                AppError::Database(e)
            })?
            .ok_or_else(|| zone_not_found(id))
    }

    pub async fn create(&self, dto: CreateZoneDto) -> Result<Zone> {
        let zone = sqlx::query_as::<_, Zone>(&format!(
            r#"
            INSERT INTO zones (id, name, description, color, boundaries, priority)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {ZONE_COLUMNS}
            "#
        ))
        .bind(Uuid::now_v7())
        .bind(&dto.name)
        .bind(&dto.description)
        .bind(dto.color.as_deref().unwrap_or(DEFAULT_ZONE_COLOR))
        .bind(&dto.boundaries)
        .bind(dto.priority.unwrap_or(0))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create zone: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!("Created zone {} ({})", zone.name, zone.id);
        Ok(zone)
    }

    pub async fn update(&self, id: Uuid, dto: UpdateZoneDto) -> Result<Zone> {
        sqlx::query_as::<_, Zone>(&format!(
            r#"
            UPDATE zones
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                color = COALESCE($4, color),
                boundaries = COALESCE($5, boundaries),
                priority = COALESCE($6, priority),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {ZONE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&dto.name)
        .bind(&dto.description)
        .bind(&dto.color)
        .bind(&dto.boundaries)
        .bind(dto.priority)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update zone {}: {:?}", id, e);
            AppError::Database(e)
        })?
        .ok_or_else(|| zone_not_found(id))
    }

    /// Delete a zone and, by cascade, its team assignments
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM zones WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete zone {}: {:?}", id, e);
                AppError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(zone_not_found(id));
        }

        tracing::info!("Deleted zone {}", id);
        Ok(())
    }
}

fn zone_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Zone {} not found", id))
}
