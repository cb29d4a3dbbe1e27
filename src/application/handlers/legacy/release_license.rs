//! ReleaseLicenseHandler - Command handler for giving up a reservation.

use std::sync::Arc;

use crate::application::handlers::publish_committed;
use crate::domain::foundation::{EventId, LicenseId, Timestamp, UserId};
use crate::domain::legacy::{License, LicenseError, LicenseReleased, LicenseStatus};
use crate::ports::{EventPublisher, LicenseRepository};

#[derive(Debug, Clone)]
pub struct ReleaseLicenseCommand {
    pub license_id: LicenseId,
    pub user_id: UserId,
}

#[derive(Debug, Clone)]
pub struct ReleaseLicenseResult {
    pub license: License,
    pub event: LicenseReleased,
}

/// Returns a license reserved by the caller to sale. Anyone else, or a
/// license that is not reserved, gets `NotAvailable`.
pub struct ReleaseLicenseHandler {
    repository: Arc<dyn LicenseRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl ReleaseLicenseHandler {
    pub fn new(
        repository: Arc<dyn LicenseRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repository,
            event_publisher,
        }
    }

    pub async fn handle(&self, cmd: ReleaseLicenseCommand) -> Result<ReleaseLicenseResult, LicenseError> {
        let mut license = self
            .repository
            .find_by_id(&cmd.license_id)
            .await?
            .ok_or_else(|| LicenseError::not_found(cmd.license_id))?;

        let previous = license.status;
        if !license.release(&cmd.user_id) {
            tracing::warn!(
                license_id = %cmd.license_id,
                status = %previous,
                user_id = %cmd.user_id,
                "Release refused, caller does not hold the reservation"
            );
            return Err(LicenseError::not_available(cmd.license_id, Some(previous)));
        }
        let now = Timestamp::now();
        license.normalize(now);

        if !self
            .repository
            .update_if_status(&license, &[LicenseStatus::Reserved])
            .await?
        {
            tracing::warn!(license_id = %cmd.license_id, "Release lost to a concurrent update");
            return Err(LicenseError::not_available(cmd.license_id, None));
        }

        tracing::info!(license_id = %license.id, user_id = %cmd.user_id, "License released");

        let event = LicenseReleased {
            event_id: EventId::new(),
            license_id: license.id,
            released_by: cmd.user_id.clone(),
            released_at: now,
        };
        publish_committed(self.event_publisher.as_ref(), &event, &cmd.user_id).await;

        Ok(ReleaseLicenseResult { license, event })
    }
}
