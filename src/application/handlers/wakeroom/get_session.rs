//! GetSessionHandler - Query handler for the caller's session.

use std::sync::Arc;

use crate::domain::foundation::{SessionId, UserId};
use crate::domain::wakeroom::WakeRoomError;
use crate::ports::{SessionReader, SessionView};

pub struct GetSessionHandler {
    reader: Arc<dyn SessionReader>,
}

impl GetSessionHandler {
    pub fn new(reader: Arc<dyn SessionReader>) -> Self {
        Self { reader }
    }

    /// Sessions of other users are reported as not found.
    pub async fn handle(&self, id: SessionId, user_id: &UserId) -> Result<SessionView, WakeRoomError> {
        self.reader
            .get(&id)
            .await?
            .filter(|view| &view.user_id == user_id)
            .ok_or_else(|| WakeRoomError::session_not_found(id))
    }
}
