//! ReserveLicenseHandler - Command handler for placing a hold on a license.

use std::sync::Arc;

use crate::application::handlers::publish_committed;
use crate::domain::foundation::{EventId, LicenseId, Timestamp, UserId};
use crate::domain::legacy::{License, LicenseError, LicenseReserved, LicenseStatus};
use crate::ports::{EventPublisher, LicenseRepository};

#[derive(Debug, Clone)]
pub struct ReserveLicenseCommand {
    pub license_id: LicenseId,
    pub user_id: UserId,
}

#[derive(Debug, Clone)]
pub struct ReserveLicenseResult {
    pub license: License,
    pub event: LicenseReserved,
}

/// Handler for reservations.
///
/// Only an available license can be reserved. When two users race for the
/// same license exactly one write lands; the other sees `NotAvailable`.
pub struct ReserveLicenseHandler {
    repository: Arc<dyn LicenseRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl ReserveLicenseHandler {
    pub fn new(
        repository: Arc<dyn LicenseRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repository,
            event_publisher,
        }
    }

    pub async fn handle(&self, cmd: ReserveLicenseCommand) -> Result<ReserveLicenseResult, LicenseError> {
        // 1. Load
        let mut license = self
            .repository
            .find_by_id(&cmd.license_id)
            .await?
            .ok_or_else(|| LicenseError::not_found(cmd.license_id))?;

        // 2. Domain transition
        let previous = license.status;
        if !license.reserve(&cmd.user_id) {
            tracing::warn!(
                license_id = %cmd.license_id,
                status = %previous.as_str(),
                user_id = %cmd.user_id,
                "Reservation refused, license not available"
            );
            return Err(LicenseError::not_available(cmd.license_id, Some(previous)));
        }
        let now = Timestamp::now();
        license.normalize(now);

        // 3. Compare-and-set write
        let written = self
            .repository
            .update_if_status(&license, &[LicenseStatus::Available])
            .await?;
        if !written {
            tracing::warn!(
                license_id = %cmd.license_id,
                user_id = %cmd.user_id,
                "Reservation lost to a concurrent update"
            );
            return Err(LicenseError::not_available(cmd.license_id, None));
        }

        tracing::info!(
            license_id = %license.id,
            license_number = %license.license_number,
            user_id = %cmd.user_id,
            "License reserved"
        );

        // 4. Publish
        let event = LicenseReserved {
            event_id: EventId::new(),
            license_id: license.id,
            license_number: license.license_number,
            reserved_by: cmd.user_id.clone(),
            reserved_at: now,
        };
        publish_committed(self.event_publisher.as_ref(), &event, &cmd.user_id).await;

        Ok(ReserveLicenseResult { license, event })
    }
}
