//! License reader port (read side / CQRS queries).
//!
//! Counts and statistics are always computed from current rows; nothing
//! here is an incrementally maintained counter.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    DomainError, LicenseId, Money, Percentage, PurchaseId, Timestamp, UserId,
};
use crate::domain::legacy::{License, LicenseNumber, LicensePurchase, LicenseStatus, LicenseType};

#[async_trait]
pub trait LicenseReader: Send + Sync {
    async fn get(&self, id: &LicenseId) -> Result<Option<LicenseView>, DomainError>;

    /// List licenses ordered by license number.
    async fn list(&self, filter: &LicenseFilter) -> Result<Vec<LicenseSummary>, DomainError>;

    /// Number of licenses currently in `status`.
    async fn count_by_status(&self, status: LicenseStatus) -> Result<u64, DomainError>;

    async fn statistics(&self) -> Result<LicenseStatistics, DomainError>;

    /// Ledger rows for a buyer, newest first.
    async fn purchases_for_user(&self, user_id: &UserId) -> Result<Vec<PurchaseView>, DomainError>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseFilter {
    pub status: Option<LicenseStatus>,
    pub license_type: Option<LicenseType>,
}

impl LicenseFilter {
    pub fn matches(&self, license: &License) -> bool {
        self.status.map_or(true, |s| license.status == s)
            && self.license_type.map_or(true, |t| license.license_type == t)
    }
}

/// Full detail of one license.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseView {
    pub id: LicenseId,
    pub license_number: LicenseNumber,
    pub license_type: LicenseType,
    pub status: LicenseStatus,
    pub is_available: bool,
    pub original_price: Money,
    pub current_price: Money,
    pub is_discounted: bool,
    pub discount_percentage: Percentage,
    pub price_display: String,
    pub features: Vec<String>,
    pub features_display: String,
    pub storage_limit_gb: u32,
    pub family_members_limit: u32,
    pub lifetime_guarantee: bool,
    pub purchaser: Option<UserId>,
    pub purchase_date: Option<Timestamp>,
    pub created_at: Timestamp,
    pub expires_at: Option<Timestamp>,
}

impl From<&License> for LicenseView {
    fn from(license: &License) -> Self {
        Self {
            id: license.id,
            license_number: license.license_number,
            license_type: license.license_type,
            status: license.status,
            is_available: license.is_available(),
            original_price: license.original_price,
            current_price: license.current_price,
            is_discounted: license.is_discounted,
            discount_percentage: license.discount_percentage,
            price_display: license.price_display(),
            features: license.features.clone(),
            features_display: license.features_display(),
            storage_limit_gb: license.storage_limit_gb,
            family_members_limit: license.family_members_limit,
            lifetime_guarantee: license.lifetime_guarantee,
            purchaser: license.purchaser.clone(),
            purchase_date: license.purchase_date,
            created_at: license.created_at,
            expires_at: license.expires_at,
        }
    }
}

/// Catalogue row for list screens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseSummary {
    pub id: LicenseId,
    pub license_number: LicenseNumber,
    pub license_type: LicenseType,
    pub status: LicenseStatus,
    pub current_price: Money,
    pub price_display: String,
    pub is_discounted: bool,
}

impl From<&License> for LicenseSummary {
    fn from(license: &License) -> Self {
        Self {
            id: license.id,
            license_number: license.license_number,
            license_type: license.license_type,
            status: license.status,
            current_price: license.current_price,
            price_display: license.price_display(),
            is_discounted: license.is_discounted,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseView {
    pub id: PurchaseId,
    pub license_id: LicenseId,
    pub license_number: LicenseNumber,
    pub purchaser: UserId,
    pub purchase_date: Timestamp,
    pub amount_paid: Money,
    pub payment_method: String,
    pub transaction_id: String,
}

impl From<&LicensePurchase> for PurchaseView {
    fn from(p: &LicensePurchase) -> Self {
        Self {
            id: p.id,
            license_id: p.license_id,
            license_number: p.license_number,
            purchaser: p.purchaser.clone(),
            purchase_date: p.purchase_date,
            amount_paid: p.amount_paid,
            payment_method: p.payment_method.clone(),
            transaction_id: p.transaction_id.clone(),
        }
    }
}

/// Catalogue-wide figures for the admin dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseStatistics {
    pub total: u64,
    pub available: u64,
    pub reserved: u64,
    pub sold: u64,
    pub expired: u64,

    /// Sum of `amount_paid` across the purchase ledger.
    pub total_revenue: Money,

    /// Mean ledger amount, `None` before the first sale.
    pub average_price: Option<Money>,

    pub by_type: Vec<TypeCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCount {
    pub license_type: LicenseType,
    pub count: u64,
}
