//! License domain events.
//!
//! - `LicenseCreated` - A new license was listed
//! - `LicenseReserved` - A user placed a hold
//! - `LicenseReleased` - A hold was returned to sale
//! - `LicensePurchased` - A sale completed and was ledgered
//! - `LicenseRepriced` - An administrative discount changed the price
//! - `LicenseExpired` - The license was withdrawn
//! - `LicenseForcedAvailable` - An administrator reset the license

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    domain_event, EventId, LicenseId, Money, Percentage, PurchaseId, Timestamp, UserId,
};

use super::{LicenseNumber, LicenseStatus};

// ════════════════════════════════════════════════════════════════════════════
// LicenseCreated
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenseCreated {
    pub event_id: EventId,
    pub license_id: LicenseId,
    pub license_number: LicenseNumber,
    pub current_price: Money,
    pub created_at: Timestamp,
}

domain_event!(
    LicenseCreated,
    event_type = "license.created.v1",
    schema_version = 1,
    aggregate_id = license_id,
    aggregate_type = "License",
    occurred_at = created_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// LicenseReserved
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenseReserved {
    pub event_id: EventId,
    pub license_id: LicenseId,
    pub license_number: LicenseNumber,
    pub reserved_by: UserId,
    pub reserved_at: Timestamp,
}

domain_event!(
    LicenseReserved,
    event_type = "license.reserved.v1",
    schema_version = 1,
    aggregate_id = license_id,
    aggregate_type = "License",
    occurred_at = reserved_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// LicenseReleased
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenseReleased {
    pub event_id: EventId,
    pub license_id: LicenseId,
    pub released_by: UserId,
    pub released_at: Timestamp,
}

domain_event!(
    LicenseReleased,
    event_type = "license.released.v1",
    schema_version = 1,
    aggregate_id = license_id,
    aggregate_type = "License",
    occurred_at = released_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// LicensePurchased
// ════════════════════════════════════════════════════════════════════════════

/// Published after the sale and its ledger row are committed together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicensePurchased {
    pub event_id: EventId,
    pub license_id: LicenseId,
    pub purchase_id: PurchaseId,
    pub license_number: LicenseNumber,
    pub purchaser: UserId,
    pub amount_paid: Money,
    pub payment_method: String,
    pub transaction_id: String,
    pub purchased_at: Timestamp,
}

domain_event!(
    LicensePurchased,
    event_type = "license.purchased.v1",
    schema_version = 1,
    aggregate_id = license_id,
    aggregate_type = "License",
    occurred_at = purchased_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// LicenseRepriced
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenseRepriced {
    pub event_id: EventId,
    pub license_id: LicenseId,
    pub percent_off: Percentage,
    pub previous_price: Money,
    pub current_price: Money,
    pub repriced_at: Timestamp,
}

domain_event!(
    LicenseRepriced,
    event_type = "license.repriced.v1",
    schema_version = 1,
    aggregate_id = license_id,
    aggregate_type = "License",
    occurred_at = repriced_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// LicenseExpired
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenseExpired {
    pub event_id: EventId,
    pub license_id: LicenseId,
    pub previous_status: LicenseStatus,
    pub expired_at: Timestamp,
}

domain_event!(
    LicenseExpired,
    event_type = "license.expired.v1",
    schema_version = 1,
    aggregate_id = license_id,
    aggregate_type = "License",
    occurred_at = expired_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// LicenseForcedAvailable
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenseForcedAvailable {
    pub event_id: EventId,
    pub license_id: LicenseId,
    pub previous_status: LicenseStatus,
    pub previous_holder: Option<UserId>,
    pub reset_by: UserId,
    pub reset_at: Timestamp,
}

domain_event!(
    LicenseForcedAvailable,
    event_type = "license.forced_available.v1",
    schema_version = 1,
    aggregate_id = license_id,
    aggregate_type = "License",
    occurred_at = reset_at,
    event_id = event_id
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{DomainEvent, EventEnvelope};

    #[test]
    fn reserved_event_routes_by_license() {
        let license_id = LicenseId::new();
        let event = LicenseReserved {
            event_id: EventId::new(),
            license_id,
            license_number: LicenseNumber::try_new(12).unwrap(),
            reserved_by: UserId::new("alice").unwrap(),
            reserved_at: Timestamp::now(),
        };

        assert_eq!(event.event_type(), "license.reserved.v1");
        assert_eq!(event.aggregate_type(), "License");
        assert_eq!(event.aggregate_id(), license_id.to_string());
    }

    #[test]
    fn purchased_event_payload_carries_amount_in_cents() {
        let event = LicensePurchased {
            event_id: EventId::new(),
            license_id: LicenseId::new(),
            purchase_id: PurchaseId::new(),
            license_number: LicenseNumber::try_new(1).unwrap(),
            purchaser: UserId::new("alice").unwrap(),
            amount_paid: Money::from_units(1999),
            payment_method: "card".into(),
            transaction_id: "tx_1".into(),
            purchased_at: Timestamp::now(),
        };

        let envelope = EventEnvelope::from_event(&event).unwrap();
        assert_eq!(envelope.payload["amount_paid"], 199_900);
        assert_eq!(envelope.payload["license_number"], 1);
    }
}
