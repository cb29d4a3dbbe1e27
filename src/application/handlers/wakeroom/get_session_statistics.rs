//! GetSessionStatisticsHandler - WakeRoom usage figures.

use std::sync::Arc;

use crate::domain::wakeroom::WakeRoomError;
use crate::ports::{SessionReader, SessionStatistics};

pub struct GetSessionStatisticsHandler {
    reader: Arc<dyn SessionReader>,
}

impl GetSessionStatisticsHandler {
    pub fn new(reader: Arc<dyn SessionReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(&self) -> Result<SessionStatistics, WakeRoomError> {
        Ok(self.reader.statistics().await?)
    }
}
