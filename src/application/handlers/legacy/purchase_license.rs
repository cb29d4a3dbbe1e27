//! PurchaseLicenseHandler - Command handler for completing a sale.

use std::sync::Arc;

use crate::application::handlers::publish_committed;
use crate::domain::foundation::{EventId, LicenseId, Timestamp, UserId};
use crate::domain::legacy::{
    License, LicenseError, LicensePurchase, LicensePurchased, LicenseStatus, PaymentDetails,
};
use crate::ports::{EventPublisher, LicenseRepository, RecordedSale};

#[derive(Debug, Clone)]
pub struct PurchaseLicenseCommand {
    pub license_id: LicenseId,
    pub user_id: UserId,
    pub payment_method: String,
    pub transaction_id: String,
}

#[derive(Debug, Clone)]
pub struct PurchaseLicenseResult {
    pub license: License,
    pub purchase: LicensePurchase,
    pub event: LicensePurchased,
}

/// Handler for purchases.
///
/// The sale and its ledger row are written in one repository call, so a
/// license is never sold twice and never sold without a ledger row.
pub struct PurchaseLicenseHandler {
    repository: Arc<dyn LicenseRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl PurchaseLicenseHandler {
    pub fn new(
        repository: Arc<dyn LicenseRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repository,
            event_publisher,
        }
    }

    pub async fn handle(&self, cmd: PurchaseLicenseCommand) -> Result<PurchaseLicenseResult, LicenseError> {
        // 1. Payment details are checked before anything is loaded
        let payment = PaymentDetails::new(&cmd.payment_method, &cmd.transaction_id)?;

        // 2. Load
        let mut license = self
            .repository
            .find_by_id(&cmd.license_id)
            .await?
            .ok_or_else(|| LicenseError::not_found(cmd.license_id))?;

        // 3. Domain transition
        let previous = license.status;
        let now = Timestamp::now();
        let Some(receipt) = license.purchase(&cmd.user_id, &payment, now) else {
            tracing::warn!(
                license_id = %cmd.license_id,
                status = %previous,
                user_id = %cmd.user_id,
                "Purchase refused, license not available"
            );
            return Err(LicenseError::not_available(cmd.license_id, Some(previous)));
        };
        license.normalize(now);

        // 4. Sale + ledger, atomically
        let sale = self
            .repository
            .record_sale(&license, &receipt, &LicenseStatus::PURCHASABLE)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, license_id = %cmd.license_id, "Failed to record sale");
                LicenseError::from(e)
            })?;
        let Some(RecordedSale { license, purchase }) = sale else {
            tracing::warn!(
                license_id = %cmd.license_id,
                user_id = %cmd.user_id,
                "Purchase lost to a concurrent sale"
            );
            return Err(LicenseError::not_available(cmd.license_id, None));
        };

        tracing::info!(
            license_id = %license.id,
            license_number = %license.license_number,
            purchase_id = %purchase.id,
            amount_paid = %purchase.amount_paid,
            user_id = %cmd.user_id,
            "License purchased"
        );

        // 5. Publish
        let event = LicensePurchased {
            event_id: EventId::new(),
            license_id: license.id,
            purchase_id: purchase.id,
            license_number: license.license_number,
            purchaser: cmd.user_id.clone(),
            amount_paid: purchase.amount_paid,
            payment_method: purchase.payment_method.clone(),
            transaction_id: purchase.transaction_id.clone(),
            purchased_at: now,
        };
        publish_committed(self.event_publisher.as_ref(), &event, &cmd.user_id).await;

        Ok(PurchaseLicenseResult {
            license,
            purchase,
            event,
        })
    }
}
