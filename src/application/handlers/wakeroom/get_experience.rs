//! GetExperienceHandler - Query handler for one experience.

use std::sync::Arc;

use crate::domain::foundation::ExperienceId;
use crate::domain::wakeroom::{WakeRoomError, WakeRoomExperience};
use crate::ports::ExperienceRepository;

pub struct GetExperienceHandler {
    repository: Arc<dyn ExperienceRepository>,
}

impl GetExperienceHandler {
    pub fn new(repository: Arc<dyn ExperienceRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, id: ExperienceId) -> Result<WakeRoomExperience, WakeRoomError> {
        self.repository
            .find_by_id(&id)
            .await?
            .ok_or_else(|| WakeRoomError::experience_not_found(id))
    }
}
