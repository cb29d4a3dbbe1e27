//! WakeRoom experience repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ExperienceId};
use crate::domain::wakeroom::WakeRoomExperience;

#[async_trait]
pub trait ExperienceRepository: Send + Sync {
    async fn save(&self, experience: &WakeRoomExperience) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &ExperienceId) -> Result<Option<WakeRoomExperience>, DomainError>;
}
