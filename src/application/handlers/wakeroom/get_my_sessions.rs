//! GetMySessionsHandler - The caller's session history.

use std::sync::Arc;

use crate::domain::foundation::UserId;
use crate::domain::wakeroom::WakeRoomError;
use crate::ports::{SessionReader, SessionView};

pub struct GetMySessionsHandler {
    reader: Arc<dyn SessionReader>,
}

impl GetMySessionsHandler {
    pub fn new(reader: Arc<dyn SessionReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(&self, user_id: &UserId) -> Result<Vec<SessionView>, WakeRoomError> {
        Ok(self.reader.sessions_for_user(user_id).await?)
    }
}
