//! PostgreSQL implementation of SessionRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{
    DomainError, ExperienceId, MemorialId, Rating, SessionId, Timestamp, UserId,
};
use crate::domain::wakeroom::{DeviceInfo, WakeRoomSession};
use crate::ports::SessionRepository;

use super::license_repository::corrupt;

pub struct PostgresSessionRepository {
    pool: PgPool,
}

impl PostgresSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub(super) const SESSION_COLUMNS: &str = r#"
    id, user_id, experience_id, memorial_id, start_time, end_time, duration_seconds,
    interactions_count, completed_milestones, user_feedback, rating,
    device_type, browser_info, ip_address
"#;

#[derive(Debug, sqlx::FromRow)]
pub(super) struct SessionRow {
    id: Uuid,
    user_id: String,
    experience_id: Uuid,
    memorial_id: Option<Uuid>,
    start_time: DateTime<Utc>,
    end_time: Option<DateTime<Utc>>,
    duration_seconds: Option<i64>,
    interactions_count: i32,
    completed_milestones: Vec<String>,
    user_feedback: String,
    rating: Option<i16>,
    device_type: String,
    browser_info: String,
    ip_address: Option<String>,
}

impl TryFrom<SessionRow> for WakeRoomSession {
    type Error = DomainError;

    fn try_from(row: SessionRow) -> Result<Self, Self::Error> {
        let duration_seconds = row
            .duration_seconds
            .map(|d| u64::try_from(d).map_err(|_| corrupt("negative duration_seconds")))
            .transpose()?;
        let interactions_count =
            u32::try_from(row.interactions_count).map_err(|_| corrupt("negative interactions_count"))?;
        let rating = row
            .rating
            .map(|r| Rating::try_from_int(i64::from(r)))
            .transpose()
            .map_err(corrupt)?;
        let ip_address = row
            .ip_address
            .map(|ip| ip.parse().map_err(corrupt))
            .transpose()?;

        Ok(WakeRoomSession::reconstitute(
            SessionId::from_uuid(row.id),
            UserId::new(row.user_id).map_err(corrupt)?,
            ExperienceId::from_uuid(row.experience_id),
            row.memorial_id.map(MemorialId::from_uuid),
            Timestamp::from_datetime(row.start_time),
            row.end_time.map(Timestamp::from_datetime),
            duration_seconds,
            interactions_count,
            row.completed_milestones,
            row.user_feedback,
            rating,
            DeviceInfo {
                device_type: row.device_type,
                browser_info: row.browser_info,
                ip_address,
            },
        ))
    }
}

fn duration_column(session: &WakeRoomSession) -> Result<Option<i64>, DomainError> {
    session
        .duration_seconds()
        .map(|d| i64::try_from(d).map_err(|_| DomainError::validation("duration_seconds", "too large")))
        .transpose()
}

fn interactions_column(session: &WakeRoomSession) -> Result<i32, DomainError> {
    i32::try_from(session.interactions_count())
        .map_err(|_| DomainError::validation("interactions_count", "too large"))
}

#[async_trait]
impl SessionRepository for PostgresSessionRepository {
    async fn save(&self, session: &WakeRoomSession) -> Result<(), DomainError> {
        let query = format!(
            "INSERT INTO wakeroom_sessions ({}) VALUES \
             ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
            SESSION_COLUMNS
        );

        sqlx::query(&query)
            .bind(session.id().as_uuid())
            .bind(session.user_id().as_str())
            .bind(session.experience_id().as_uuid())
            .bind(session.memorial_id().map(|m| *m.as_uuid()))
            .bind(session.start_time().as_datetime())
            .bind(session.end_time().map(|t| *t.as_datetime()))
            .bind(duration_column(session)?)
            .bind(interactions_column(session)?)
            .bind(session.completed_milestones())
            .bind(session.user_feedback())
            .bind(session.rating().map(|r| i16::from(r.value())))
            .bind(&session.device().device_type)
            .bind(&session.device().browser_info)
            .bind(session.device().ip_address.map(|ip| ip.to_string()))
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to save session", e))?;

        Ok(())
    }

    async fn update_if_active(&self, session: &WakeRoomSession) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE wakeroom_sessions SET
                end_time = $2,
                duration_seconds = $3,
                interactions_count = $4,
                completed_milestones = $5,
                user_feedback = $6,
                rating = $7
            WHERE id = $1 AND end_time IS NULL
            "#,
        )
        .bind(session.id().as_uuid())
        .bind(session.end_time().map(|t| *t.as_datetime()))
        .bind(duration_column(session)?)
        .bind(interactions_column(session)?)
        .bind(session.completed_milestones())
        .bind(session.user_feedback())
        .bind(session.rating().map(|r| i16::from(r.value())))
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to end session", e))?;

        Ok(result.rows_affected() == 1)
    }

    async fn find_by_id(&self, id: &SessionId) -> Result<Option<WakeRoomSession>, DomainError> {
        let query = format!("SELECT {} FROM wakeroom_sessions WHERE id = $1", SESSION_COLUMNS);
        let row: Option<SessionRow> = sqlx::query_as(&query)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to find session", e))?;

        row.map(WakeRoomSession::try_from).transpose()
    }
}
