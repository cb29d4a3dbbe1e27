//! WakeRoom experience catalogue entry.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{ExperienceId, MemorialId, Timestamp, ValidationError};

/// Default running time of an experience in minutes.
pub const DEFAULT_DURATION_MINUTES: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExperienceType {
    #[serde(rename = "AR")]
    AugmentedReality,
    #[serde(rename = "VR")]
    VirtualReality,
    #[serde(rename = "360")]
    Panoramic,
    #[serde(rename = "INTERACTIVE")]
    Interactive,
    #[serde(rename = "AUDIO")]
    Audio,
}

impl ExperienceType {
    pub const ALL: [ExperienceType; 5] = [
        ExperienceType::AugmentedReality,
        ExperienceType::VirtualReality,
        ExperienceType::Panoramic,
        ExperienceType::Interactive,
        ExperienceType::Audio,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceType::AugmentedReality => "AR",
            ExperienceType::VirtualReality => "VR",
            ExperienceType::Panoramic => "360",
            ExperienceType::Interactive => "INTERACTIVE",
            ExperienceType::Audio => "AUDIO",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ExperienceType::AugmentedReality => "Augmented Reality",
            ExperienceType::VirtualReality => "Virtual Reality",
            ExperienceType::Panoramic => "360° Experience",
            ExperienceType::Interactive => "Interactive Experience",
            ExperienceType::Audio => "Audio Experience",
        }
    }
}

impl FromStr for ExperienceType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExperienceType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                ValidationError::invalid_format("experience_type", format!("unknown type '{}'", s))
            })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceStatus {
    #[default]
    Draft,
    Active,
    Maintenance,
    Archived,
}

impl ExperienceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceStatus::Draft => "draft",
            ExperienceStatus::Active => "active",
            ExperienceStatus::Maintenance => "maintenance",
            ExperienceStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for ExperienceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExperienceStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(ExperienceStatus::Draft),
            "active" => Ok(ExperienceStatus::Active),
            "maintenance" => Ok(ExperienceStatus::Maintenance),
            "archived" => Ok(ExperienceStatus::Archived),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown experience status '{}'", other),
            )),
        }
    }
}

/// An AR/VR/interactive content item that sessions are run against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WakeRoomExperience {
    pub id: ExperienceId,
    pub title: String,
    pub description: String,
    pub experience_type: ExperienceType,
    pub status: ExperienceStatus,
    pub memorial_id: Option<MemorialId>,

    pub qr_code_required: bool,

    /// Deep link encoded in the printed QR code. Filled by `normalize`
    /// when left blank on an experience that requires a QR code.
    pub qr_code_data: String,

    pub nfc_enabled: bool,
    pub nfc_data: String,

    pub duration_minutes: u32,
    pub is_immersive: bool,
    pub requires_headset: bool,
    pub spatial_audio: bool,
    pub is_featured: bool,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl WakeRoomExperience {
    /// Creates a draft experience with default settings.
    pub fn new(
        title: impl Into<String>,
        experience_type: ExperienceType,
        now: Timestamp,
    ) -> Result<Self, ValidationError> {
        let title = title.into().trim().to_string();
        if title.is_empty() {
            return Err(ValidationError::empty_field("title"));
        }
        let mut experience = Self {
            id: ExperienceId::new(),
            title,
            description: String::new(),
            experience_type,
            status: ExperienceStatus::Draft,
            memorial_id: None,
            qr_code_required: true,
            qr_code_data: String::new(),
            nfc_enabled: false,
            nfc_data: String::new(),
            duration_minutes: DEFAULT_DURATION_MINUTES,
            is_immersive: true,
            requires_headset: false,
            spatial_audio: true,
            is_featured: false,
            created_at: now,
            updated_at: now,
        };
        experience.normalize(now);
        Ok(experience)
    }

    /// Pre-persist step: defaults the QR deep link and stamps `updated_at`.
    pub fn normalize(&mut self, now: Timestamp) {
        if self.qr_code_required && self.qr_code_data.trim().is_empty() {
            self.qr_code_data = format!("/wakeroom/experience/{}", self.id);
        }
        self.updated_at = now;
    }

    /// Only active experiences can be launched from the catalogue.
    pub fn is_available(&self) -> bool {
        self.status == ExperienceStatus::Active
    }

    /// Human-readable running time, e.g. `45 minutes`, `2 hours`, `1h 30m`.
    pub fn duration_display(&self) -> String {
        let minutes = self.duration_minutes;
        if minutes < 60 {
            let unit = if minutes == 1 { "minute" } else { "minutes" };
            return format!("{} {}", minutes, unit);
        }
        let (hours, rest) = (minutes / 60, minutes % 60);
        match (hours, rest) {
            (1, 0) => "1 hour".to_string(),
            (h, 0) => format!("{} hours", h),
            (h, m) => format!("{}h {}m", h, m),
        }
    }

    /// Equipment a visitor needs to run the experience.
    pub fn technology_requirements(&self) -> Vec<&'static str> {
        let mut requirements = Vec::new();
        if self.requires_headset {
            requirements.push("VR Headset");
        }
        if self.spatial_audio {
            requirements.push("Spatial Audio Headphones");
        }
        if self.nfc_enabled {
            requirements.push("NFC-enabled Device");
        }
        if self.qr_code_required {
            requirements.push("QR Code Scanner");
        }
        requirements
    }
}
