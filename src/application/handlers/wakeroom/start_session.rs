//! StartSessionHandler - Command handler for beginning a WakeRoom session.

use std::sync::Arc;

use crate::application::handlers::publish_committed;
use crate::domain::foundation::{EventId, ExperienceId, MemorialId, Timestamp, UserId};
use crate::domain::wakeroom::{DeviceInfo, SessionStarted, WakeRoomError, WakeRoomSession};
use crate::ports::{EventPublisher, ExperienceRepository, SessionRepository};

#[derive(Debug, Clone)]
pub struct StartSessionCommand {
    pub user_id: UserId,
    pub experience_id: ExperienceId,
    /// Defaults to the experience's own memorial.
    pub memorial_id: Option<MemorialId>,
    pub device: DeviceInfo,
}

#[derive(Debug, Clone)]
pub struct StartSessionResult {
    pub session: WakeRoomSession,
    pub event: SessionStarted,
}

pub struct StartSessionHandler {
    experiences: Arc<dyn ExperienceRepository>,
    sessions: Arc<dyn SessionRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl StartSessionHandler {
    pub fn new(
        experiences: Arc<dyn ExperienceRepository>,
        sessions: Arc<dyn SessionRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            experiences,
            sessions,
            event_publisher,
        }
    }

    pub async fn handle(&self, cmd: StartSessionCommand) -> Result<StartSessionResult, WakeRoomError> {
        let experience = self
            .experiences
            .find_by_id(&cmd.experience_id)
            .await?
            .ok_or_else(|| WakeRoomError::experience_not_found(cmd.experience_id))?;

        let now = Timestamp::now();
        let session = WakeRoomSession::start(
            cmd.user_id.clone(),
            experience.id,
            cmd.memorial_id.or(experience.memorial_id),
            cmd.device,
            now,
        );

        self.sessions.save(&session).await.map_err(|e| {
            tracing::error!(error = %e, experience_id = %experience.id, "Failed to save session");
            WakeRoomError::from(e)
        })?;

        tracing::info!(
            session_id = %session.id(),
            experience_id = %experience.id,
            user_id = %cmd.user_id,
            "WakeRoom session started"
        );

        let event = SessionStarted {
            event_id: EventId::new(),
            session_id: *session.id(),
            user_id: cmd.user_id.clone(),
            experience_id: experience.id,
            memorial_id: session.memorial_id().copied(),
            started_at: now,
        };
        publish_committed(self.event_publisher.as_ref(), &event, &cmd.user_id).await;

        Ok(StartSessionResult { session, event })
    }
}
