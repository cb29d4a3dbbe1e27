//! ExpireLicenseHandler - Administrative withdrawal of a license.

use std::sync::Arc;

use crate::application::handlers::publish_committed;
use crate::domain::foundation::{EventId, LicenseId, Timestamp, UserId};
use crate::domain::legacy::{License, LicenseError, LicenseExpired};
use crate::ports::{EventPublisher, LicenseRepository};

#[derive(Debug, Clone)]
pub struct ExpireLicenseCommand {
    pub license_id: LicenseId,
    pub expired_by: UserId,
}

#[derive(Debug, Clone)]
pub struct ExpireLicenseResult {
    pub license: License,
    pub event: LicenseExpired,
}

pub struct ExpireLicenseHandler {
    repository: Arc<dyn LicenseRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl ExpireLicenseHandler {
    pub fn new(
        repository: Arc<dyn LicenseRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repository,
            event_publisher,
        }
    }

    pub async fn handle(&self, cmd: ExpireLicenseCommand) -> Result<ExpireLicenseResult, LicenseError> {
        let mut license = self
            .repository
            .find_by_id(&cmd.license_id)
            .await?
            .ok_or_else(|| LicenseError::not_found(cmd.license_id))?;

        let previous = license.status;
        if !license.expire() {
            return Err(LicenseError::not_available(cmd.license_id, Some(previous)));
        }
        let now = Timestamp::now();
        license.normalize(now);

        if !self.repository.update_if_status(&license, &[previous]).await? {
            tracing::warn!(license_id = %cmd.license_id, "Expiry lost to a concurrent update");
            return Err(LicenseError::not_available(cmd.license_id, None));
        }

        tracing::info!(
            license_id = %license.id,
            previous_status = %previous,
            expired_by = %cmd.expired_by,
            "License expired"
        );

        let event = LicenseExpired {
            event_id: EventId::new(),
            license_id: license.id,
            previous_status: previous,
            expired_at: now,
        };
        publish_committed(self.event_publisher.as_ref(), &event, &cmd.expired_by).await;

        Ok(ExpireLicenseResult { license, event })
    }
}
