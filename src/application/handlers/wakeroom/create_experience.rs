//! CreateExperienceHandler - Admin command adding a WakeRoom experience.

use std::sync::Arc;

use crate::application::handlers::publish_committed;
use crate::domain::foundation::{EventId, MemorialId, Timestamp, UserId};
use crate::domain::wakeroom::{
    ExperienceCreated, ExperienceStatus, ExperienceType, WakeRoomError, WakeRoomExperience,
};
use crate::ports::{EventPublisher, ExperienceRepository};

#[derive(Debug, Clone, Default)]
pub struct CreateExperienceCommand {
    pub title: String,
    pub description: String,
    pub experience_type: Option<ExperienceType>,
    pub status: Option<ExperienceStatus>,
    pub memorial_id: Option<MemorialId>,
    pub duration_minutes: Option<u32>,
    /// Defaults to true.
    pub qr_code_required: Option<bool>,
    pub qr_code_data: Option<String>,
    pub nfc_data: Option<String>,
    pub requires_headset: bool,
    /// Defaults to true.
    pub spatial_audio: Option<bool>,
    pub is_featured: bool,
}

pub struct CreateExperienceHandler {
    repository: Arc<dyn ExperienceRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl CreateExperienceHandler {
    pub fn new(
        repository: Arc<dyn ExperienceRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repository,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateExperienceCommand,
        created_by: &UserId,
    ) -> Result<WakeRoomExperience, WakeRoomError> {
        let now = Timestamp::now();
        let experience_type = cmd.experience_type.unwrap_or(ExperienceType::AugmentedReality);

        let mut experience = WakeRoomExperience::new(cmd.title, experience_type, now)?;
        experience.description = cmd.description;
        experience.status = cmd.status.unwrap_or_default();
        experience.memorial_id = cmd.memorial_id;
        if let Some(minutes) = cmd.duration_minutes {
            experience.duration_minutes = minutes;
        }
        if let Some(required) = cmd.qr_code_required {
            experience.qr_code_required = required;
        }
        // Blank unless given; normalize derives the link if a QR code is required.
        experience.qr_code_data = cmd.qr_code_data.unwrap_or_default();
        if let Some(nfc) = cmd.nfc_data {
            experience.nfc_enabled = !nfc.trim().is_empty();
            experience.nfc_data = nfc;
        }
        experience.requires_headset = cmd.requires_headset;
        if let Some(spatial_audio) = cmd.spatial_audio {
            experience.spatial_audio = spatial_audio;
        }
        experience.is_featured = cmd.is_featured;
        experience.normalize(now);

        self.repository.save(&experience).await?;

        tracing::info!(
            experience_id = %experience.id,
            experience_type = experience.experience_type.as_str(),
            created_by = %created_by,
            "WakeRoom experience created"
        );

        let event = ExperienceCreated {
            event_id: EventId::new(),
            experience_id: experience.id,
            title: experience.title.clone(),
            experience_type: experience.experience_type,
            created_at: now,
        };
        publish_committed(self.event_publisher.as_ref(), &event, created_by).await;

        Ok(experience)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::events::InMemoryEventBus;
    use crate::adapters::memory::InMemoryWakeRoomStore;

    fn admin() -> UserId {
        UserId::new("admin").unwrap()
    }

    #[tokio::test]
    async fn creates_experience_with_default_qr_link() {
        let store = Arc::new(InMemoryWakeRoomStore::new());
        let bus = Arc::new(InMemoryEventBus::new());
        let handler = CreateExperienceHandler::new(store.clone(), bus.clone());

        let exp = handler
            .handle(
                CreateExperienceCommand {
                    title: "Garden".into(),
                    experience_type: Some(ExperienceType::VirtualReality),
                    status: Some(ExperienceStatus::Active),
                    requires_headset: true,
                    ..Default::default()
                },
                &admin(),
            )
            .await
            .unwrap();

        assert_eq!(exp.qr_code_data, format!("/wakeroom/experience/{}", exp.id));
        assert!(exp.spatial_audio);
        assert_eq!(
            exp.technology_requirements(),
            vec!["VR Headset", "Spatial Audio Headphones", "QR Code Scanner"]
        );
        assert!(exp.is_available());
        assert!(ExperienceRepository::find_by_id(store.as_ref(), &exp.id)
            .await
            .unwrap()
            .is_some());
        assert!(bus.has_event("wakeroom.experience_created.v1"));
    }

    #[tokio::test]
    async fn experience_without_qr_code_gets_no_link() {
        let handler = CreateExperienceHandler::new(
            Arc::new(InMemoryWakeRoomStore::new()),
            Arc::new(InMemoryEventBus::new()),
        );

        let exp = handler
            .handle(
                CreateExperienceCommand {
                    title: "Quiet Hour".into(),
                    experience_type: Some(ExperienceType::Audio),
                    qr_code_required: Some(false),
                    spatial_audio: Some(false),
                    ..Default::default()
                },
                &admin(),
            )
            .await
            .unwrap();

        assert!(!exp.qr_code_required);
        assert!(exp.qr_code_data.is_empty());
        assert!(exp.technology_requirements().is_empty());
    }

    #[tokio::test]
    async fn blank_title_is_rejected() {
        let handler = CreateExperienceHandler::new(
            Arc::new(InMemoryWakeRoomStore::new()),
            Arc::new(InMemoryEventBus::new()),
        );

        let err = handler
            .handle(CreateExperienceCommand::default(), &admin())
            .await
            .unwrap_err();

        assert!(matches!(err, WakeRoomError::ValidationFailed { ref field, .. } if field == "title"));
    }
}
