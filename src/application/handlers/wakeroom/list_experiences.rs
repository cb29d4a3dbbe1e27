//! ListExperiencesHandler - Query handler for the experience catalogue.

use std::sync::Arc;

use crate::domain::wakeroom::{WakeRoomError, WakeRoomExperience};
use crate::ports::{ExperienceFilter, ExperienceReader};

pub struct ListExperiencesHandler {
    reader: Arc<dyn ExperienceReader>,
}

impl ListExperiencesHandler {
    pub fn new(reader: Arc<dyn ExperienceReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(&self, filter: ExperienceFilter) -> Result<Vec<WakeRoomExperience>, WakeRoomError> {
        Ok(self.reader.list(&filter).await?)
    }
}
