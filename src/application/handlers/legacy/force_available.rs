//! ForceAvailableHandler - Administrative reset of a license to sale.

use std::sync::Arc;

use crate::application::handlers::publish_committed;
use crate::domain::foundation::{EventId, LicenseId, Timestamp, UserId};
use crate::domain::legacy::{License, LicenseError, LicenseForcedAvailable};
use crate::ports::{EventPublisher, LicenseRepository};

#[derive(Debug, Clone)]
pub struct ForceAvailableCommand {
    pub license_id: LicenseId,
    pub reset_by: UserId,
}

#[derive(Debug, Clone)]
pub struct ForceAvailableResult {
    pub license: License,
    pub event: LicenseForcedAvailable,
}

/// Puts a license back on sale from any status. Purchaser and payment
/// fields are cleared; ledger rows are left alone.
pub struct ForceAvailableHandler {
    repository: Arc<dyn LicenseRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl ForceAvailableHandler {
    pub fn new(
        repository: Arc<dyn LicenseRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repository,
            event_publisher,
        }
    }

    pub async fn handle(&self, cmd: ForceAvailableCommand) -> Result<ForceAvailableResult, LicenseError> {
        let mut license = self
            .repository
            .find_by_id(&cmd.license_id)
            .await?
            .ok_or_else(|| LicenseError::not_found(cmd.license_id))?;

        let previous_status = license.status;
        let previous_holder = license.purchaser.clone();
        license.force_available();
        let now = Timestamp::now();
        license.normalize(now);

        self.repository.update(&license).await?;

        tracing::info!(
            license_id = %license.id,
            previous_status = %previous_status,
            reset_by = %cmd.reset_by,
            "License forced available"
        );

        let event = LicenseForcedAvailable {
            event_id: EventId::new(),
            license_id: license.id,
            previous_status,
            previous_holder,
            reset_by: cmd.reset_by.clone(),
            reset_at: now,
        };
        publish_committed(self.event_publisher.as_ref(), &event, &cmd.reset_by).await;

        Ok(ForceAvailableResult { license, event })
    }
}
