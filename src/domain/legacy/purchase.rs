//! Payment details and the append-only purchase ledger entry.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    LicenseId, Money, PurchaseId, Timestamp, UserId, ValidationError,
};

use super::LicenseNumber;

/// Payment reference supplied by the buyer's checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentDetails {
    payment_method: String,
    transaction_id: String,
}

impl PaymentDetails {
    /// Both fields are required and trimmed.
    pub fn new(
        payment_method: impl Into<String>,
        transaction_id: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let payment_method = payment_method.into().trim().to_string();
        let transaction_id = transaction_id.into().trim().to_string();
        if payment_method.is_empty() {
            return Err(ValidationError::empty_field("payment_method"));
        }
        if transaction_id.is_empty() {
            return Err(ValidationError::empty_field("transaction_id"));
        }
        Ok(Self {
            payment_method,
            transaction_id,
        })
    }

    pub fn payment_method(&self) -> &str {
        &self.payment_method
    }

    pub fn transaction_id(&self) -> &str {
        &self.transaction_id
    }
}

/// One completed sale. Written exactly once, never updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicensePurchase {
    pub id: PurchaseId,
    pub license_id: LicenseId,
    pub license_number: LicenseNumber,
    pub purchaser: UserId,
    pub purchase_date: Timestamp,

    /// Selling price at the instant of sale, never caller supplied.
    pub amount_paid: Money,
    pub payment_method: String,
    pub transaction_id: String,
}
