//! ApplyDiscountHandler - Administrative bulk repricing.

use std::collections::HashSet;
use std::sync::Arc;

use crate::application::handlers::publish_committed;
use crate::domain::foundation::{EventId, LicenseId, Percentage, Timestamp, UserId};
use crate::domain::legacy::{License, LicenseError, LicenseRepriced};
use crate::ports::{EventPublisher, LicenseRepository};

#[derive(Debug, Clone)]
pub struct ApplyDiscountCommand {
    pub license_ids: Vec<LicenseId>,
    /// Operator input, parsed here so every caller gets the same message.
    pub percentage: String,
    pub applied_by: UserId,
}

#[derive(Debug, Clone)]
pub struct ApplyDiscountResult {
    pub percent_off: Percentage,
    pub licenses: Vec<License>,
}

/// Sets each selected license's price to `percentage` below its list
/// price. All-or-nothing: an unparseable percentage or an unknown id
/// leaves every license unchanged. Status is not considered.
pub struct ApplyDiscountHandler {
    repository: Arc<dyn LicenseRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl ApplyDiscountHandler {
    pub fn new(
        repository: Arc<dyn LicenseRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repository,
            event_publisher,
        }
    }

    pub async fn handle(&self, cmd: ApplyDiscountCommand) -> Result<ApplyDiscountResult, LicenseError> {
        let percent_off: Percentage = cmd.percentage.parse().map_err(|_| {
            tracing::warn!(input = %cmd.percentage, "Rejected discount percentage");
            LicenseError::invalid_discount(cmd.percentage.clone())
        })?;

        let mut seen = HashSet::new();
        let ids: Vec<LicenseId> = cmd
            .license_ids
            .iter()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect();

        let mut licenses = self.repository.find_by_ids(&ids).await?;
        if let Some(missing) = ids.iter().find(|id| !licenses.iter().any(|l| &l.id == *id)) {
            return Err(LicenseError::not_found(*missing));
        }

        let now = Timestamp::now();
        let mut events = Vec::with_capacity(licenses.len());
        for license in &mut licenses {
            let previous_price = license.current_price;
            license.apply_discount(percent_off);
            license.normalize(now);
            events.push(LicenseRepriced {
                event_id: EventId::new(),
                license_id: license.id,
                percent_off,
                previous_price,
                current_price: license.current_price,
                repriced_at: now,
            });
        }

        self.repository.update_prices(&licenses).await.map_err(|e| {
            tracing::error!(error = %e, count = licenses.len(), "Failed to write discounted prices");
            LicenseError::from(e)
        })?;

        tracing::info!(
            percent_off = percent_off.value(),
            count = licenses.len(),
            applied_by = %cmd.applied_by,
            "Discount applied"
        );

        for event in &events {
            publish_committed(self.event_publisher.as_ref(), event, &cmd.applied_by).await;
        }

        Ok(ApplyDiscountResult {
            percent_off,
            licenses,
        })
    }
}
