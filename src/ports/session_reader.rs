//! WakeRoom session reader port (read side / CQRS queries).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    DomainError, ExperienceId, MemorialId, Rating, SessionId, Timestamp, UserId,
};
use crate::domain::wakeroom::WakeRoomSession;

#[async_trait]
pub trait SessionReader: Send + Sync {
    async fn get(&self, id: &SessionId) -> Result<Option<SessionView>, DomainError>;

    async fn statistics(&self) -> Result<SessionStatistics, DomainError>;

    /// A user's sessions, newest start first.
    async fn sessions_for_user(&self, user_id: &UserId) -> Result<Vec<SessionView>, DomainError>;
}

/// Presentation view of one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionView {
    pub id: SessionId,
    pub user_id: UserId,
    pub experience_id: ExperienceId,
    pub memorial_id: Option<MemorialId>,
    pub start_time: Timestamp,
    pub end_time: Option<Timestamp>,
    pub duration_seconds: Option<u64>,
    pub duration_display: String,
    pub is_active: bool,
    pub interactions_count: u32,
    pub completed_milestones: Vec<String>,
    pub user_feedback: String,
    pub rating: Option<Rating>,
    pub device_type: String,
}

impl From<&WakeRoomSession> for SessionView {
    fn from(session: &WakeRoomSession) -> Self {
        Self {
            id: *session.id(),
            user_id: session.user_id().clone(),
            experience_id: *session.experience_id(),
            memorial_id: session.memorial_id().copied(),
            start_time: *session.start_time(),
            end_time: session.end_time().copied(),
            duration_seconds: session.duration_seconds(),
            duration_display: session.duration_display(),
            is_active: session.is_active(),
            interactions_count: session.interactions_count(),
            completed_milestones: session.completed_milestones().to_vec(),
            user_feedback: session.user_feedback().to_string(),
            rating: session.rating(),
            device_type: session.device().device_type.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStatistics {
    pub total_sessions: u64,
    pub active_sessions: u64,
    pub completed_sessions: u64,

    /// Mean whole-second duration of ended sessions.
    pub average_duration_seconds: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::wakeroom::DeviceInfo;

    #[test]
    fn session_reader_is_object_safe() {
        fn _accepts_dyn(_reader: &dyn SessionReader) {}
    }

    #[test]
    fn view_reflects_active_flag() {
        let now = Timestamp::now();
        let mut session = WakeRoomSession::start(
            UserId::new("u1").unwrap(),
            ExperienceId::new(),
            None,
            DeviceInfo::default(),
            now,
        );
        assert!(SessionView::from(&session).is_active);

        session.end(None, now.plus_secs(61)).unwrap();
        let view = SessionView::from(&session);
        assert!(!view.is_active);
        assert_eq!(view.duration_display, "1m 1s");
    }
}
