//! In-memory WakeRoom experiences and sessions.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{
    div_round_half_even, DomainError, ErrorCode, ExperienceId, SessionId, UserId,
};
use crate::domain::wakeroom::{WakeRoomExperience, WakeRoomSession};
use crate::ports::{
    ExperienceFilter, ExperienceReader, ExperienceRepository, SessionReader, SessionRepository,
    SessionStatistics, SessionView,
};

/// In-memory WakeRoom storage.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWakeRoomStore {
    experiences: Arc<RwLock<HashMap<ExperienceId, WakeRoomExperience>>>,
    sessions: Arc<RwLock<HashMap<SessionId, WakeRoomSession>>>,
}

impl InMemoryWakeRoomStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl ExperienceRepository for InMemoryWakeRoomStore {
    async fn save(&self, experience: &WakeRoomExperience) -> Result<(), DomainError> {
        let mut experiences = self.experiences.write().await;
        if experiences.contains_key(&experience.id) {
            return Err(DomainError::new(
                ErrorCode::ValidationFailed,
                format!("Experience {} already exists", experience.id),
            ));
        }
        experiences.insert(experience.id, experience.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &ExperienceId) -> Result<Option<WakeRoomExperience>, DomainError> {
        Ok(self.experiences.read().await.get(id).cloned())
    }
}

#[async_trait]
impl ExperienceReader for InMemoryWakeRoomStore {
    async fn list(&self, filter: &ExperienceFilter) -> Result<Vec<WakeRoomExperience>, DomainError> {
        let experiences = self.experiences.read().await;
        let mut matching: Vec<WakeRoomExperience> =
            experiences.values().filter(|e| filter.matches(e)).cloned().collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }
}

#[async_trait]
impl SessionRepository for InMemoryWakeRoomStore {
    async fn save(&self, session: &WakeRoomSession) -> Result<(), DomainError> {
        if !self.experiences.read().await.contains_key(session.experience_id()) {
            return Err(DomainError::new(
                ErrorCode::ExperienceNotFound,
                format!("Experience not found: {}", session.experience_id()),
            ));
        }
        self.sessions
            .write()
            .await
            .insert(*session.id(), session.clone());
        Ok(())
    }

    async fn update_if_active(&self, session: &WakeRoomSession) -> Result<bool, DomainError> {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(session.id()) {
            Some(stored) if stored.is_active() => {
                *stored = session.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn find_by_id(&self, id: &SessionId) -> Result<Option<WakeRoomSession>, DomainError> {
        Ok(self.sessions.read().await.get(id).cloned())
    }
}

#[async_trait]
impl SessionReader for InMemoryWakeRoomStore {
    async fn get(&self, id: &SessionId) -> Result<Option<SessionView>, DomainError> {
        Ok(self.sessions.read().await.get(id).map(SessionView::from))
    }

    async fn statistics(&self) -> Result<SessionStatistics, DomainError> {
        let sessions = self.sessions.read().await;
        let total = sessions.len() as u64;
        let active = sessions.values().filter(|s| s.is_active()).count() as u64;

        let durations: Vec<u64> = sessions.values().filter_map(|s| s.duration_seconds()).collect();
        let average_duration_seconds = if durations.is_empty() {
            None
        } else {
            let sum: i128 = durations.iter().map(|&d| i128::from(d)).sum();
            let avg = div_round_half_even(sum, durations.len() as i128);
            u64::try_from(avg).ok()
        };

        Ok(SessionStatistics {
            total_sessions: total,
            active_sessions: active,
            completed_sessions: total - active,
            average_duration_seconds,
        })
    }

    async fn sessions_for_user(&self, user_id: &UserId) -> Result<Vec<SessionView>, DomainError> {
        let sessions = self.sessions.read().await;
        let mut mine: Vec<&WakeRoomSession> =
            sessions.values().filter(|s| s.user_id() == user_id).collect();
        mine.sort_by(|a, b| b.start_time().cmp(a.start_time()));
        Ok(mine.into_iter().map(SessionView::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Timestamp;
    use crate::domain::wakeroom::{DeviceInfo, ExperienceStatus, ExperienceType};

    async fn store_with_experience() -> (InMemoryWakeRoomStore, ExperienceId) {
        let store = InMemoryWakeRoomStore::new();
        let exp = WakeRoomExperience::new("Lantern Walk", ExperienceType::VirtualReality, Timestamp::now())
            .unwrap();
        ExperienceRepository::save(&store, &exp).await.unwrap();
        (store, exp.id)
    }

    fn session_for(experience_id: ExperienceId, now: Timestamp) -> WakeRoomSession {
        WakeRoomSession::start(
            UserId::new("visitor").unwrap(),
            experience_id,
            None,
            DeviceInfo::default(),
            now,
        )
    }

    #[tokio::test]
    async fn session_for_unknown_experience_is_rejected() {
        let store = InMemoryWakeRoomStore::new();
        let session = session_for(ExperienceId::new(), Timestamp::now());

        let err = SessionRepository::save(&store, &session).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::ExperienceNotFound);
    }

    #[tokio::test]
    async fn only_first_end_is_persisted() {
        let (store, exp_id) = store_with_experience().await;
        let start = Timestamp::now();
        let session = session_for(exp_id, start);
        SessionRepository::save(&store, &session).await.unwrap();

        let mut first = session.clone();
        first.end(None, start.plus_secs(10)).unwrap();
        let mut second = session.clone();
        second.end(None, start.plus_secs(90)).unwrap();

        assert!(store.update_if_active(&first).await.unwrap());
        assert!(!store.update_if_active(&second).await.unwrap());

        let stored = SessionRepository::find_by_id(&store, session.id())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.duration_seconds(), Some(10));
    }

    #[tokio::test]
    async fn statistics_average_ended_sessions_only() {
        let (store, exp_id) = store_with_experience().await;
        let start = Timestamp::now();
        for secs in [Some(10), Some(21), None] {
            let mut session = session_for(exp_id, start);
            SessionRepository::save(&store, &session).await.unwrap();
            if let Some(secs) = secs {
                session.end(None, start.plus_secs(secs)).unwrap();
                store.update_if_active(&session).await.unwrap();
            }
        }

        let stats = store.statistics().await.unwrap();

        assert_eq!(stats.total_sessions, 3);
        assert_eq!(stats.active_sessions, 1);
        assert_eq!(stats.completed_sessions, 2);
        // 15.5 rounds to the even neighbour
        assert_eq!(stats.average_duration_seconds, Some(16));
    }

    #[tokio::test]
    async fn experience_list_is_filtered_and_newest_first() {
        let store = InMemoryWakeRoomStore::new();
        let base = Timestamp::now();
        for (offset, title, kind, status, featured) in [
            (0, "Garden", ExperienceType::AugmentedReality, ExperienceStatus::Active, false),
            (60, "Lantern Walk", ExperienceType::VirtualReality, ExperienceStatus::Active, true),
            (120, "Harbour", ExperienceType::VirtualReality, ExperienceStatus::Draft, true),
        ] {
            let created = base.plus_secs(offset);
            let mut exp = WakeRoomExperience::new(title, kind, created).unwrap();
            exp.created_at = created;
            exp.status = status;
            exp.is_featured = featured;
            ExperienceRepository::save(&store, &exp).await.unwrap();
        }

        let titles = |list: Vec<WakeRoomExperience>| -> Vec<String> {
            list.into_iter().map(|e| e.title).collect()
        };

        let all = store.list(&ExperienceFilter::default()).await.unwrap();
        assert_eq!(titles(all), ["Harbour", "Lantern Walk", "Garden"]);

        let featured_active = ExperienceFilter {
            status: Some(ExperienceStatus::Active),
            is_featured: Some(true),
            ..Default::default()
        };
        assert_eq!(titles(store.list(&featured_active).await.unwrap()), ["Lantern Walk"]);

        let vr = ExperienceFilter {
            experience_type: Some(ExperienceType::VirtualReality),
            ..Default::default()
        };
        assert_eq!(titles(store.list(&vr).await.unwrap()), ["Harbour", "Lantern Walk"]);
    }

    #[tokio::test]
    async fn session_history_is_per_user_and_newest_first() {
        let (store, exp_id) = store_with_experience().await;
        let start = Timestamp::now();
        let mut ids = Vec::new();
        for offset in [0, 300, 120] {
            let session = session_for(exp_id, start.plus_secs(offset));
            SessionRepository::save(&store, &session).await.unwrap();
            ids.push((offset, *session.id()));
        }
        let stranger = WakeRoomSession::start(
            UserId::new("stranger").unwrap(),
            exp_id,
            None,
            DeviceInfo::default(),
            start.plus_secs(600),
        );
        SessionRepository::save(&store, &stranger).await.unwrap();

        let history = store
            .sessions_for_user(&UserId::new("visitor").unwrap())
            .await
            .unwrap();

        ids.sort_by(|a, b| b.0.cmp(&a.0));
        let expected: Vec<SessionId> = ids.into_iter().map(|(_, id)| id).collect();
        let got: Vec<SessionId> = history.iter().map(|v| v.id).collect();
        assert_eq!(got, expected);
    }
}
