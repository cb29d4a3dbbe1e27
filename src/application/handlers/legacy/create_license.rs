//! CreateLicenseHandler - Command handler for listing a new license.

use std::sync::Arc;

use crate::application::handlers::publish_committed;
use crate::domain::foundation::{ErrorCode, EventId, Money, Timestamp, UserId};
use crate::domain::legacy::{License, LicenseCreated, LicenseError, LicenseNumber, LicenseType};
use crate::ports::{EventPublisher, LicenseRepository};

#[derive(Debug, Clone)]
pub struct CreateLicenseCommand {
    pub license_number: i64,
    pub license_type: Option<LicenseType>,
    /// Both prices must be given together; launch pricing applies otherwise.
    pub prices: Option<(Money, Money)>,
    pub features: Vec<String>,
    pub expires_at: Option<Timestamp>,
    pub created_by: UserId,
}

#[derive(Debug, Clone)]
pub struct CreateLicenseResult {
    pub license: License,
    pub event: LicenseCreated,
}

pub struct CreateLicenseHandler {
    repository: Arc<dyn LicenseRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl CreateLicenseHandler {
    pub fn new(
        repository: Arc<dyn LicenseRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repository,
            event_publisher,
        }
    }

    pub async fn handle(&self, cmd: CreateLicenseCommand) -> Result<CreateLicenseResult, LicenseError> {
        let number = LicenseNumber::try_new(cmd.license_number)?;
        let now = Timestamp::now();

        let mut license = License::new(number, now)
            .with_type(cmd.license_type.unwrap_or_default())
            .with_features(cmd.features);
        if let Some((original, current)) = cmd.prices {
            license = license.with_prices(original, current);
        }
        license.expires_at = cmd.expires_at;
        license.normalize(now);

        self.repository.save(&license).await.map_err(|e| {
            if e.code == ErrorCode::DuplicateLicenseNumber {
                LicenseError::DuplicateNumber(number)
            } else {
                tracing::error!(error = %e, license_number = %number, "Failed to save license");
                LicenseError::from(e)
            }
        })?;

        tracing::info!(
            license_id = %license.id,
            license_number = %number,
            created_by = %cmd.created_by,
            "License created"
        );

        let event = LicenseCreated {
            event_id: EventId::new(),
            license_id: license.id,
            license_number: number,
            current_price: license.current_price,
            created_at: now,
        };
        publish_committed(self.event_publisher.as_ref(), &event, &cmd.created_by).await;

        Ok(CreateLicenseResult { license, event })
    }
}
