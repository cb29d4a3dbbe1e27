//! EndSessionHandler - Command handler for finishing a WakeRoom session.

use std::sync::Arc;

use crate::application::handlers::publish_committed;
use crate::domain::foundation::{EventId, SessionId, Timestamp, UserId};
use crate::domain::wakeroom::{SessionEnded, SessionOutcome, WakeRoomError, WakeRoomSession};
use crate::ports::{EventPublisher, SessionRepository};

#[derive(Debug, Clone)]
pub struct EndSessionCommand {
    pub session_id: SessionId,
    pub user_id: UserId,
    pub outcome: Option<SessionOutcome>,
}

#[derive(Debug, Clone)]
pub struct EndSessionResult {
    pub session: WakeRoomSession,
    pub event: SessionEnded,
}

/// Ends a session exactly once.
///
/// Sessions belonging to someone else are reported as not found.
pub struct EndSessionHandler {
    repository: Arc<dyn SessionRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl EndSessionHandler {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repository,
            event_publisher,
        }
    }

    pub async fn handle(&self, cmd: EndSessionCommand) -> Result<EndSessionResult, WakeRoomError> {
        let mut session = self
            .repository
            .find_by_id(&cmd.session_id)
            .await?
            .filter(|s| s.is_owned_by(&cmd.user_id))
            .ok_or_else(|| WakeRoomError::session_not_found(cmd.session_id))?;

        let now = Timestamp::now();
        if let Err(e) = session.end(cmd.outcome, now) {
            tracing::warn!(session_id = %cmd.session_id, "End refused, session already ended");
            return Err(e);
        }

        if !self.repository.update_if_active(&session).await? {
            tracing::warn!(session_id = %cmd.session_id, "End lost to a concurrent end");
            return Err(WakeRoomError::already_ended(cmd.session_id));
        }

        let duration_seconds = session.duration_seconds().unwrap_or_default();
        tracing::info!(
            session_id = %cmd.session_id,
            user_id = %cmd.user_id,
            duration_seconds,
            "WakeRoom session ended"
        );

        let event = SessionEnded {
            event_id: EventId::new(),
            session_id: cmd.session_id,
            user_id: cmd.user_id.clone(),
            experience_id: *session.experience_id(),
            duration_seconds,
            interactions_count: session.interactions_count(),
            rating: session.rating(),
            ended_at: now,
        };
        publish_committed(self.event_publisher.as_ref(), &event, &cmd.user_id).await;

        Ok(EndSessionResult { session, event })
    }
}
