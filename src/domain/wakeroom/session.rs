//! WakeRoom session aggregate.
//!
//! One user's timed run through an experience. A session starts active
//! and ends exactly once; ending fixes `duration_seconds` for good.

use serde::{Deserialize, Serialize};
use std::net::IpAddr;

use crate::domain::foundation::{
    ExperienceId, MemorialId, Rating, SessionId, Timestamp, UserId,
};

use super::WakeRoomError;

/// Client details captured when a session starts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub device_type: String,
    pub browser_info: String,
    pub ip_address: Option<IpAddr>,
}

/// Final figures a client may report when ending a session.
///
/// Absent fields keep whatever the session already holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionOutcome {
    pub interactions_count: Option<u32>,
    pub completed_milestones: Option<Vec<String>>,
    pub user_feedback: Option<String>,
    pub rating: Option<Rating>,
}

/// WakeRoom session aggregate.
///
/// # Invariants
///
/// - `duration_seconds` is `Some` exactly when `end_time` is `Some`
/// - `duration_seconds` is the whole seconds between start and end
/// - `end_time`, once set, never changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WakeRoomSession {
    id: SessionId,
    user_id: UserId,
    experience_id: ExperienceId,
    memorial_id: Option<MemorialId>,
    start_time: Timestamp,
    end_time: Option<Timestamp>,
    duration_seconds: Option<u64>,
    interactions_count: u32,
    completed_milestones: Vec<String>,
    user_feedback: String,
    rating: Option<Rating>,
    device: DeviceInfo,
}

impl WakeRoomSession {
    /// Starts a session at `now`.
    pub fn start(
        user_id: UserId,
        experience_id: ExperienceId,
        memorial_id: Option<MemorialId>,
        device: DeviceInfo,
        now: Timestamp,
    ) -> Self {
        Self {
            id: SessionId::new(),
            user_id,
            experience_id,
            memorial_id,
            start_time: now,
            end_time: None,
            duration_seconds: None,
            interactions_count: 0,
            completed_milestones: Vec::new(),
            user_feedback: String::new(),
            rating: None,
            device,
        }
    }

    /// Rebuilds a session from storage without re-running validation.
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: SessionId,
        user_id: UserId,
        experience_id: ExperienceId,
        memorial_id: Option<MemorialId>,
        start_time: Timestamp,
        end_time: Option<Timestamp>,
        duration_seconds: Option<u64>,
        interactions_count: u32,
        completed_milestones: Vec<String>,
        user_feedback: String,
        rating: Option<Rating>,
        device: DeviceInfo,
    ) -> Self {
        Self {
            id,
            user_id,
            experience_id,
            memorial_id,
            start_time,
            end_time,
            duration_seconds,
            interactions_count,
            completed_milestones,
            user_feedback,
            rating,
            device,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn experience_id(&self) -> &ExperienceId {
        &self.experience_id
    }

    pub fn memorial_id(&self) -> Option<&MemorialId> {
        self.memorial_id.as_ref()
    }

    pub fn start_time(&self) -> &Timestamp {
        &self.start_time
    }

    pub fn end_time(&self) -> Option<&Timestamp> {
        self.end_time.as_ref()
    }

    pub fn duration_seconds(&self) -> Option<u64> {
        self.duration_seconds
    }

    pub fn interactions_count(&self) -> u32 {
        self.interactions_count
    }

    pub fn completed_milestones(&self) -> &[String] {
        &self.completed_milestones
    }

    pub fn user_feedback(&self) -> &str {
        &self.user_feedback
    }

    pub fn rating(&self) -> Option<Rating> {
        self.rating
    }

    pub fn device(&self) -> &DeviceInfo {
        &self.device
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// True until `end` has succeeded once.
    pub fn is_active(&self) -> bool {
        self.end_time.is_none()
    }

    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.user_id == user_id
    }

    /// Ends the session at `now`, merging any reported outcome first.
    ///
    /// # Errors
    ///
    /// `AlreadyEnded` if the session was ended before; nothing changes.
    pub fn end(&mut self, outcome: Option<SessionOutcome>, now: Timestamp) -> Result<(), WakeRoomError> {
        if !self.is_active() {
            return Err(WakeRoomError::already_ended(self.id));
        }

        if let Some(outcome) = outcome {
            self.merge_outcome(outcome);
        }
        self.end_time = Some(now);
        self.duration_seconds = Some(now.whole_seconds_since(&self.start_time));
        Ok(())
    }

    /// `"{m}m {s}s"` once ended, `"Active"` before.
    pub fn duration_display(&self) -> String {
        match self.duration_seconds {
            Some(secs) => format!("{}m {}s", secs / 60, secs % 60),
            None => "Active".to_string(),
        }
    }

    fn merge_outcome(&mut self, outcome: SessionOutcome) {
        if let Some(count) = outcome.interactions_count {
            self.interactions_count = count;
        }
        if let Some(milestones) = outcome.completed_milestones {
            self.completed_milestones = milestones;
        }
        if let Some(feedback) = outcome.user_feedback {
            self.user_feedback = feedback;
        }
        if let Some(rating) = outcome.rating {
            self.rating = Some(rating);
        }
    }
}
