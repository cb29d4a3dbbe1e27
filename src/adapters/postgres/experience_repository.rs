//! PostgreSQL implementation of ExperienceRepository and ExperienceReader.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, ExperienceId, MemorialId, Timestamp};
use crate::domain::wakeroom::WakeRoomExperience;
use crate::ports::{ExperienceFilter, ExperienceReader, ExperienceRepository};

use super::license_repository::corrupt;

pub struct PostgresExperienceRepository {
    pool: PgPool,
}

impl PostgresExperienceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const EXPERIENCE_COLUMNS: &str = r#"
    id, title, description, experience_type, status, memorial_id,
    qr_code_required, qr_code_data, nfc_enabled, nfc_data,
    duration_minutes, is_immersive, requires_headset, spatial_audio,
    is_featured, created_at, updated_at
"#;

#[derive(Debug, sqlx::FromRow)]
struct ExperienceRow {
    id: Uuid,
    title: String,
    description: String,
    experience_type: String,
    status: String,
    memorial_id: Option<Uuid>,
    qr_code_required: bool,
    qr_code_data: String,
    nfc_enabled: bool,
    nfc_data: String,
    duration_minutes: i32,
    is_immersive: bool,
    requires_headset: bool,
    spatial_audio: bool,
    is_featured: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ExperienceRow> for WakeRoomExperience {
    type Error = DomainError;

    fn try_from(row: ExperienceRow) -> Result<Self, Self::Error> {
        Ok(WakeRoomExperience {
            id: ExperienceId::from_uuid(row.id),
            title: row.title,
            description: row.description,
            experience_type: row.experience_type.parse().map_err(corrupt)?,
            status: row.status.parse().map_err(corrupt)?,
            memorial_id: row.memorial_id.map(MemorialId::from_uuid),
            qr_code_required: row.qr_code_required,
            qr_code_data: row.qr_code_data,
            nfc_enabled: row.nfc_enabled,
            nfc_data: row.nfc_data,
            duration_minutes: u32::try_from(row.duration_minutes)
                .map_err(|_| corrupt("negative duration_minutes"))?,
            is_immersive: row.is_immersive,
            requires_headset: row.requires_headset,
            spatial_audio: row.spatial_audio,
            is_featured: row.is_featured,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

#[async_trait]
impl ExperienceRepository for PostgresExperienceRepository {
    async fn save(&self, experience: &WakeRoomExperience) -> Result<(), DomainError> {
        let duration = i32::try_from(experience.duration_minutes)
            .map_err(|_| DomainError::validation("duration_minutes", "too large"))?;

        sqlx::query(
            r#"
            INSERT INTO wakeroom_experiences (
                id, title, description, experience_type, status, memorial_id,
                qr_code_required, qr_code_data, nfc_enabled, nfc_data,
                duration_minutes, is_immersive, requires_headset, spatial_audio,
                is_featured, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            "#,
        )
        .bind(experience.id.as_uuid())
        .bind(&experience.title)
        .bind(&experience.description)
        .bind(experience.experience_type.as_str())
        .bind(experience.status.as_str())
        .bind(experience.memorial_id.map(|m| *m.as_uuid()))
        .bind(experience.qr_code_required)
        .bind(&experience.qr_code_data)
        .bind(experience.nfc_enabled)
        .bind(&experience.nfc_data)
        .bind(duration)
        .bind(experience.is_immersive)
        .bind(experience.requires_headset)
        .bind(experience.spatial_audio)
        .bind(experience.is_featured)
        .bind(experience.created_at.as_datetime())
        .bind(experience.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.is_unique_violation() {
                    return DomainError::new(
                        ErrorCode::ValidationFailed,
                        format!("Experience {} already exists", experience.id),
                    );
                }
            }
            DomainError::database("Failed to save experience", e)
        })?;

        Ok(())
    }

    async fn find_by_id(&self, id: &ExperienceId) -> Result<Option<WakeRoomExperience>, DomainError> {
        let query = format!("SELECT {} FROM wakeroom_experiences WHERE id = $1", EXPERIENCE_COLUMNS);
        let row: Option<ExperienceRow> = sqlx::query_as(&query)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to find experience", e))?;

        row.map(WakeRoomExperience::try_from).transpose()
    }
}

#[async_trait]
impl ExperienceReader for PostgresExperienceRepository {
    async fn list(&self, filter: &ExperienceFilter) -> Result<Vec<WakeRoomExperience>, DomainError> {
        let query = format!(
            "SELECT {} FROM wakeroom_experiences \
             WHERE ($1::text IS NULL OR status = $1) \
               AND ($2::text IS NULL OR experience_type = $2) \
               AND ($3::boolean IS NULL OR is_featured = $3) \
             ORDER BY created_at DESC",
            EXPERIENCE_COLUMNS
        );
        let rows: Vec<ExperienceRow> = sqlx::query_as(&query)
            .bind(filter.status.map(|s| s.as_str()))
            .bind(filter.experience_type.map(|t| t.as_str()))
            .bind(filter.is_featured)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to list experiences", e))?;

        rows.into_iter().map(WakeRoomExperience::try_from).collect()
    }
}
