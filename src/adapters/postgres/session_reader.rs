//! PostgreSQL implementation of SessionReader.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, SessionId, UserId};
use crate::domain::wakeroom::WakeRoomSession;
use crate::ports::{SessionReader, SessionStatistics, SessionView};

use super::session_repository::{SessionRow, SESSION_COLUMNS};

pub struct PostgresSessionReader {
    pool: PgPool,
}

impl PostgresSessionReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SessionStatsRow {
    total: i64,
    active: i64,
    completed: i64,
    average_duration: Option<i64>,
}

#[async_trait]
impl SessionReader for PostgresSessionReader {
    async fn get(&self, id: &SessionId) -> Result<Option<SessionView>, DomainError> {
        let query = format!("SELECT {} FROM wakeroom_sessions WHERE id = $1", SESSION_COLUMNS);
        let row: Option<SessionRow> = sqlx::query_as(&query)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to load session", e))?;

        let session = row.map(WakeRoomSession::try_from).transpose()?;
        Ok(session.as_ref().map(SessionView::from))
    }

    async fn statistics(&self) -> Result<SessionStatistics, DomainError> {
        // ROUND on numeric is half away from zero; durations are
        // non-negative so this only differs from banker's rounding on ties.
        let row: SessionStatsRow = sqlx::query_as(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE end_time IS NULL) AS active,
                COUNT(*) FILTER (WHERE end_time IS NOT NULL) AS completed,
                ROUND(AVG(duration_seconds))::BIGINT AS average_duration
            FROM wakeroom_sessions
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to get session statistics", e))?;

        Ok(SessionStatistics {
            total_sessions: row.total as u64,
            active_sessions: row.active as u64,
            completed_sessions: row.completed as u64,
            average_duration_seconds: row.average_duration.map(|d| d.max(0) as u64),
        })
    }

    async fn sessions_for_user(&self, user_id: &UserId) -> Result<Vec<SessionView>, DomainError> {
        let query = format!(
            "SELECT {} FROM wakeroom_sessions WHERE user_id = $1 ORDER BY start_time DESC",
            SESSION_COLUMNS
        );
        let rows: Vec<SessionRow> = sqlx::query_as(&query)
            .bind(user_id.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to load session history", e))?;

        rows.into_iter()
            .map(|row| WakeRoomSession::try_from(row).map(|s| SessionView::from(&s)))
            .collect()
    }
}
