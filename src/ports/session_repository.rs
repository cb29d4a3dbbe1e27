//! WakeRoom session repository port (write side).

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, SessionId};
use crate::domain::wakeroom::WakeRoomSession;

#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Insert a newly started session.
    async fn save(&self, session: &WakeRoomSession) -> Result<(), DomainError>;

    /// Persist an ended session only if the stored row is still active.
    ///
    /// Returns `false` when another request already ended it.
    async fn update_if_active(&self, session: &WakeRoomSession) -> Result<bool, DomainError>;

    async fn find_by_id(&self, id: &SessionId) -> Result<Option<WakeRoomSession>, DomainError>;
}
