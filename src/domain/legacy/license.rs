//! License aggregate entity.
//!
//! A License is one numbered, purchasable legacy entitlement.
//!
//! # Design Decisions
//!
//! - **Outcome, not error**: `reserve`, `purchase` and `release` report an
//!   unmet starting status as a plain `false`/`None`; contention is normal
//! - **Explicit normalization**: derived pricing is recomputed by
//!   `normalize`, which every write path calls before persisting
//! - **Money in cents**: prices are `Money`, never floats

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    LicenseId, Money, Percentage, PurchaseId, StateMachine, Timestamp, UserId,
};

use super::pricing::{self, DEFAULT_CURRENT_PRICE, DEFAULT_ORIGINAL_PRICE};
use super::{LicenseNumber, LicensePurchase, LicenseStatus, LicenseType, PaymentDetails};

/// Default storage allowance in gigabytes.
pub const DEFAULT_STORAGE_LIMIT_GB: u32 = 1000;

/// Default number of family members that may be attached.
pub const DEFAULT_FAMILY_MEMBERS_LIMIT: u32 = 100;

/// License aggregate.
///
/// # Invariants
///
/// - `is_discounted` and `discount_percentage` agree with the two prices
///   after `normalize`
/// - `purchaser` is set only while `Reserved` or `Sold`
/// - `purchase_date`, `payment_method` and `transaction_id` are set only
///   while `Sold`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    pub id: LicenseId,

    /// Public number within the 1..=250 run. Unique.
    pub license_number: LicenseNumber,

    pub license_type: LicenseType,
    pub status: LicenseStatus,

    pub original_price: Money,
    pub current_price: Money,

    /// Derived from the prices.
    pub is_discounted: bool,

    /// Derived from the prices.
    pub discount_percentage: Percentage,

    pub features: Vec<String>,
    pub storage_limit_gb: u32,
    pub family_members_limit: u32,
    pub lifetime_guarantee: bool,

    /// Holder of a reservation, or the buyer once sold.
    pub purchaser: Option<UserId>,
    pub purchase_date: Option<Timestamp>,
    pub payment_method: Option<String>,
    pub transaction_id: Option<String>,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,

    /// End of entitlement for non-lifetime licenses.
    pub expires_at: Option<Timestamp>,
}

impl License {
    /// Creates an available license at launch pricing.
    pub fn new(license_number: LicenseNumber, now: Timestamp) -> Self {
        let mut license = Self {
            id: LicenseId::new(),
            license_number,
            license_type: LicenseType::default(),
            status: LicenseStatus::Available,
            original_price: DEFAULT_ORIGINAL_PRICE,
            current_price: DEFAULT_CURRENT_PRICE,
            is_discounted: false,
            discount_percentage: Percentage::ZERO,
            features: Vec::new(),
            storage_limit_gb: DEFAULT_STORAGE_LIMIT_GB,
            family_members_limit: DEFAULT_FAMILY_MEMBERS_LIMIT,
            lifetime_guarantee: true,
            purchaser: None,
            purchase_date: None,
            payment_method: None,
            transaction_id: None,
            created_at: now,
            updated_at: now,
            expires_at: None,
        };
        license.normalize(now);
        license
    }

    pub fn with_type(mut self, license_type: LicenseType) -> Self {
        self.license_type = license_type;
        self
    }

    /// Sets both prices. Derived fields catch up on the next `normalize`.
    pub fn with_prices(mut self, original_price: Money, current_price: Money) -> Self {
        self.original_price = original_price;
        self.current_price = current_price;
        self
    }

    pub fn with_features(mut self, features: Vec<String>) -> Self {
        self.features = features;
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    pub fn is_available(&self) -> bool {
        self.status == LicenseStatus::Available
    }

    pub fn is_reserved_by(&self, user: &UserId) -> bool {
        self.status == LicenseStatus::Reserved && self.purchaser.as_ref() == Some(user)
    }

    pub fn price_display(&self) -> String {
        pricing::price_display(self.original_price, self.current_price, self.is_discounted)
    }

    pub fn features_display(&self) -> String {
        if self.features.is_empty() {
            "No features listed".to_string()
        } else {
            self.features.join(", ")
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Places a hold for `user`. Returns false, changing nothing, unless
    /// the license is available.
    pub fn reserve(&mut self, user: &UserId) -> bool {
        if !self.is_available() {
            return false;
        }
        self.status = LicenseStatus::Reserved;
        self.purchaser = Some(user.clone());
        true
    }

    /// Returns a reservation held by `user` to sale.
    pub fn release(&mut self, user: &UserId) -> bool {
        if !self.is_reserved_by(user) {
            return false;
        }
        self.status = LicenseStatus::Available;
        self.purchaser = None;
        true
    }

    /// Sells the license to `user`.
    ///
    /// Succeeds from `Available` or `Reserved` (a hold by someone else does
    /// not block the sale). On success returns the ledger entry, priced at
    /// the current selling price. On failure returns `None` and leaves the
    /// license untouched.
    pub fn purchase(
        &mut self,
        user: &UserId,
        payment: &PaymentDetails,
        now: Timestamp,
    ) -> Option<LicensePurchase> {
        if !LicenseStatus::PURCHASABLE.contains(&self.status) {
            return None;
        }
        self.status = LicenseStatus::Sold;
        self.purchaser = Some(user.clone());
        self.purchase_date = Some(now);
        self.payment_method = Some(payment.payment_method().to_string());
        self.transaction_id = Some(payment.transaction_id().to_string());

        Some(LicensePurchase {
            id: PurchaseId::new(),
            license_id: self.id,
            license_number: self.license_number,
            purchaser: user.clone(),
            purchase_date: now,
            amount_paid: self.current_price,
            payment_method: payment.payment_method().to_string(),
            transaction_id: payment.transaction_id().to_string(),
        })
    }

    /// Withdraws the license from sale. Holder and payment fields are
    /// cleared; the purchase ledger keeps the sale history.
    pub fn expire(&mut self) -> bool {
        if self.status.transition_to(LicenseStatus::Expired).is_err() {
            return false;
        }
        self.status = LicenseStatus::Expired;
        self.clear_holder();
        true
    }

    /// Administrative reset to `Available` from any status.
    pub fn force_available(&mut self) {
        self.status = LicenseStatus::Available;
        self.clear_holder();
    }

    /// Sets the selling price to `percent_off` below the list price.
    pub fn apply_discount(&mut self, percent_off: Percentage) {
        self.current_price = pricing::reprice(self.original_price, percent_off);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Normalization
    // ─────────────────────────────────────────────────────────────────────────

    /// Pre-persist step: recomputes derived pricing and stamps `updated_at`.
    pub fn normalize(&mut self, now: Timestamp) {
        let derived = pricing::derive_discount(self.original_price, self.current_price);
        self.is_discounted = derived.is_discounted;
        self.discount_percentage = derived.discount_percentage;
        self.updated_at = now;
    }

    fn clear_holder(&mut self) {
        self.purchaser = None;
        self.purchase_date = None;
        self.payment_method = None;
        self.transaction_id = None;
    }
}
