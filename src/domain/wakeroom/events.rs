//! WakeRoom domain events.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    domain_event, EventId, ExperienceId, MemorialId, Rating, SessionId, Timestamp, UserId,
};

use super::ExperienceType;

// ════════════════════════════════════════════════════════════════════════════
// ExperienceCreated
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperienceCreated {
    pub event_id: EventId,
    pub experience_id: ExperienceId,
    pub title: String,
    pub experience_type: ExperienceType,
    pub created_at: Timestamp,
}

domain_event!(
    ExperienceCreated,
    event_type = "wakeroom.experience_created.v1",
    schema_version = 1,
    aggregate_id = experience_id,
    aggregate_type = "WakeRoomExperience",
    occurred_at = created_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// SessionStarted
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStarted {
    pub event_id: EventId,
    pub session_id: SessionId,
    pub user_id: UserId,
    pub experience_id: ExperienceId,
    pub memorial_id: Option<MemorialId>,
    pub started_at: Timestamp,
}

domain_event!(
    SessionStarted,
    event_type = "wakeroom.session_started.v1",
    schema_version = 1,
    aggregate_id = session_id,
    aggregate_type = "WakeRoomSession",
    occurred_at = started_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// SessionEnded
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEnded {
    pub event_id: EventId,
    pub session_id: SessionId,
    pub user_id: UserId,
    pub experience_id: ExperienceId,
    pub duration_seconds: u64,
    pub interactions_count: u32,
    pub rating: Option<Rating>,
    pub ended_at: Timestamp,
}

domain_event!(
    SessionEnded,
    event_type = "wakeroom.session_ended.v1",
    schema_version = 1,
    aggregate_id = session_id,
    aggregate_type = "WakeRoomSession",
    occurred_at = ended_at,
    event_id = event_id
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::DomainEvent;

    #[test]
    fn session_events_share_aggregate_type() {
        let session_id = SessionId::new();
        let started = SessionStarted {
            event_id: EventId::new(),
            session_id,
            user_id: UserId::new("u").unwrap(),
            experience_id: ExperienceId::new(),
            memorial_id: None,
            started_at: Timestamp::now(),
        };
        let ended = SessionEnded {
            event_id: EventId::new(),
            session_id,
            user_id: UserId::new("u").unwrap(),
            experience_id: ExperienceId::new(),
            duration_seconds: 42,
            interactions_count: 3,
            rating: Some(Rating::Good),
            ended_at: Timestamp::now(),
        };

        assert_eq!(started.aggregate_type(), ended.aggregate_type());
        assert_eq!(started.aggregate_id(), ended.aggregate_id());
        assert_eq!(ended.event_type(), "wakeroom.session_ended.v1");
    }
}
