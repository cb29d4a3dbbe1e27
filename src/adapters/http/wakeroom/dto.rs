//! HTTP DTOs for WakeRoom endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ExperienceId, MemorialId, Rating, Timestamp};
use crate::domain::wakeroom::{
    ExperienceStatus, ExperienceType, SessionOutcome, WakeRoomError, WakeRoomExperience,
    WakeRoomSession,
};
use crate::ports::{ExperienceFilter, SessionStatistics, SessionView};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
pub struct CreateExperienceRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub experience_type: Option<ExperienceType>,
    #[serde(default)]
    pub status: Option<ExperienceStatus>,
    #[serde(default)]
    pub memorial_id: Option<MemorialId>,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub qr_code_required: Option<bool>,
    #[serde(default)]
    pub qr_code_data: Option<String>,
    #[serde(default)]
    pub nfc_data: Option<String>,
    #[serde(default)]
    pub requires_headset: bool,
    #[serde(default)]
    pub spatial_audio: Option<bool>,
    #[serde(default)]
    pub is_featured: bool,
}

/// Query string for `GET /wakeroom/experiences`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExperienceListParams {
    pub status: Option<String>,
    pub experience_type: Option<String>,
    pub is_featured: Option<String>,
}

impl ExperienceListParams {
    pub fn into_filter(self) -> Result<ExperienceFilter, WakeRoomError> {
        let status = self
            .status
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<ExperienceStatus>())
            .transpose()?;
        let experience_type = self
            .experience_type
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<ExperienceType>())
            .transpose()?;
        let is_featured = match self.is_featured.as_deref() {
            None | Some("") => None,
            Some("true") => Some(true),
            Some("false") => Some(false),
            Some(other) => {
                return Err(WakeRoomError::validation(
                    "is_featured",
                    format!("'{}' is not true or false", other),
                ))
            }
        };
        Ok(ExperienceFilter {
            status,
            experience_type,
            is_featured,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StartSessionRequest {
    pub experience_id: ExperienceId,
    #[serde(default)]
    pub memorial_id: Option<MemorialId>,
    #[serde(default)]
    pub device_type: String,
    #[serde(default)]
    pub browser_info: String,
    #[serde(default)]
    pub ip_address: Option<String>,
}

/// Body of `POST /sessions/:id/end`. Every field is optional; an empty
/// body ends the session with nothing reported.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EndSessionRequest {
    #[serde(default)]
    pub interactions_count: Option<u32>,
    #[serde(default)]
    pub completed_milestones: Option<Vec<String>>,
    #[serde(default)]
    pub user_feedback: Option<String>,
    /// Raw so that an out-of-range value reports as a rating error.
    #[serde(default)]
    pub rating: Option<i64>,
}

impl EndSessionRequest {
    pub fn into_outcome(self) -> Result<SessionOutcome, WakeRoomError> {
        let rating = self.rating.map(Rating::try_from_int).transpose()?;
        Ok(SessionOutcome {
            interactions_count: self.interactions_count,
            completed_milestones: self.completed_milestones,
            user_feedback: self.user_feedback,
            rating,
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

fn rfc3339(ts: &Timestamp) -> String {
    ts.as_datetime().to_rfc3339()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperienceResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub experience_type: ExperienceType,
    pub experience_type_display: String,
    pub status: ExperienceStatus,
    pub is_available: bool,
    pub memorial_id: Option<String>,
    pub qr_code_required: bool,
    pub qr_code_data: String,
    pub nfc_enabled: bool,
    pub duration_minutes: u32,
    pub duration_display: String,
    pub is_immersive: bool,
    pub requires_headset: bool,
    pub spatial_audio: bool,
    pub is_featured: bool,
    pub technology_requirements: Vec<String>,
    pub created_at: String,
}

impl From<&WakeRoomExperience> for ExperienceResponse {
    fn from(e: &WakeRoomExperience) -> Self {
        Self {
            id: e.id.to_string(),
            title: e.title.clone(),
            description: e.description.clone(),
            experience_type: e.experience_type,
            experience_type_display: e.experience_type.display_name().to_string(),
            status: e.status,
            is_available: e.is_available(),
            memorial_id: e.memorial_id.map(|m| m.to_string()),
            qr_code_required: e.qr_code_required,
            qr_code_data: e.qr_code_data.clone(),
            nfc_enabled: e.nfc_enabled,
            duration_minutes: e.duration_minutes,
            duration_display: e.duration_display(),
            is_immersive: e.is_immersive,
            requires_headset: e.requires_headset,
            spatial_audio: e.spatial_audio,
            is_featured: e.is_featured,
            technology_requirements: e
                .technology_requirements()
                .into_iter()
                .map(String::from)
                .collect(),
            created_at: rfc3339(&e.created_at),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub id: String,
    pub user_id: String,
    pub experience_id: String,
    pub memorial_id: Option<String>,
    pub start_time: String,
    pub end_time: Option<String>,
    pub duration_seconds: Option<u64>,
    pub duration_display: String,
    pub is_active: bool,
    pub interactions_count: u32,
    pub completed_milestones: Vec<String>,
    pub user_feedback: String,
    pub rating: Option<u8>,
    pub rating_label: Option<String>,
    pub device_type: String,
}

impl From<SessionView> for SessionResponse {
    fn from(v: SessionView) -> Self {
        Self {
            id: v.id.to_string(),
            user_id: v.user_id.to_string(),
            experience_id: v.experience_id.to_string(),
            memorial_id: v.memorial_id.map(|m| m.to_string()),
            start_time: rfc3339(&v.start_time),
            end_time: v.end_time.as_ref().map(rfc3339),
            duration_seconds: v.duration_seconds,
            duration_display: v.duration_display,
            is_active: v.is_active,
            interactions_count: v.interactions_count,
            completed_milestones: v.completed_milestones,
            user_feedback: v.user_feedback,
            rating: v.rating.map(|r| r.value()),
            rating_label: v.rating.map(|r| r.label().to_string()),
            device_type: v.device_type,
        }
    }
}

impl From<&WakeRoomSession> for SessionResponse {
    fn from(session: &WakeRoomSession) -> Self {
        SessionView::from(session).into()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStatisticsResponse {
    pub total_sessions: u64,
    pub active_sessions: u64,
    pub completed_sessions: u64,
    pub average_duration_seconds: Option<u64>,
}

impl From<SessionStatistics> for SessionStatisticsResponse {
    fn from(s: SessionStatistics) -> Self {
        Self {
            total_sessions: s.total_sessions,
            active_sessions: s.active_sessions,
            completed_sessions: s.completed_sessions,
            average_duration_seconds: s.average_duration_seconds,
        }
    }
}
