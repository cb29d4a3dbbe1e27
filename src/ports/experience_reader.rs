//! WakeRoom experience reader port (catalogue queries).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::DomainError;
use crate::domain::wakeroom::{ExperienceStatus, ExperienceType, WakeRoomExperience};

#[async_trait]
pub trait ExperienceReader: Send + Sync {
    /// Experiences matching `filter`, newest first.
    async fn list(&self, filter: &ExperienceFilter) -> Result<Vec<WakeRoomExperience>, DomainError>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceFilter {
    pub status: Option<ExperienceStatus>,
    pub experience_type: Option<ExperienceType>,
    pub is_featured: Option<bool>,
}

impl ExperienceFilter {
    pub fn matches(&self, experience: &WakeRoomExperience) -> bool {
        self.status.map_or(true, |s| experience.status == s)
            && self.experience_type.map_or(true, |t| experience.experience_type == t)
            && self.is_featured.map_or(true, |f| experience.is_featured == f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Timestamp;

    #[test]
    fn experience_reader_is_object_safe() {
        fn _accepts_dyn(_reader: &dyn ExperienceReader) {}
    }

    #[test]
    fn filter_combines_every_given_field() {
        let mut exp =
            WakeRoomExperience::new("Lantern Walk", ExperienceType::VirtualReality, Timestamp::now())
                .unwrap();
        exp.status = ExperienceStatus::Active;
        exp.is_featured = true;

        assert!(ExperienceFilter::default().matches(&exp));
        let featured_vr = ExperienceFilter {
            status: Some(ExperienceStatus::Active),
            experience_type: Some(ExperienceType::VirtualReality),
            is_featured: Some(true),
        };
        assert!(featured_vr.matches(&exp));

        exp.is_featured = false;
        assert!(!featured_vr.matches(&exp));
        assert!(!ExperienceFilter {
            experience_type: Some(ExperienceType::Audio),
            ..Default::default()
        }
        .matches(&exp));
    }
}
