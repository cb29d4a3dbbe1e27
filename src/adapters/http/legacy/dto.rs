//! HTTP DTOs for the legacy license endpoints.
//!
//! Money crosses the wire as a two-decimal string (`"1999.00"`) so no
//! client ever sees a float.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{LicenseId, Timestamp};
use crate::domain::legacy::{LicenseError, LicenseStatus, LicenseType};
use crate::ports::{
    LicenseFilter, LicenseStatistics, LicenseSummary, LicenseView, PurchaseView, TypeCount,
};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
pub struct CreateLicenseRequest {
    pub license_number: i64,
    #[serde(default)]
    pub license_type: Option<LicenseType>,
    /// Decimal string; must be given together with `current_price`.
    #[serde(default)]
    pub original_price: Option<String>,
    #[serde(default)]
    pub current_price: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Query string for `GET /legacy/licenses`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LicenseListParams {
    pub status: Option<String>,
    pub license_type: Option<String>,
}

impl LicenseListParams {
    pub fn into_filter(self) -> Result<LicenseFilter, LicenseError> {
        let status = self
            .status
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<LicenseStatus>())
            .transpose()?;
        let license_type = self
            .license_type
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<LicenseType>())
            .transpose()?;
        Ok(LicenseFilter {
            status,
            license_type,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PurchaseRequest {
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub transaction_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiscountRequest {
    pub license_ids: Vec<LicenseId>,
    /// Accepted as a JSON string or number.
    pub percentage: serde_json::Value,
}

impl DiscountRequest {
    /// Operator input as text; anything but a string or number becomes
    /// text that fails percentage parsing.
    pub fn percentage_input(&self) -> String {
        match &self.percentage {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Number(n) => n.to_string(),
            other => other.to_string(),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

fn rfc3339(ts: &Timestamp) -> String {
    ts.as_datetime().to_rfc3339()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenseResponse {
    pub id: String,
    pub license_number: u16,
    pub license_type: LicenseType,
    pub status: LicenseStatus,
    pub is_available: bool,
    pub original_price: String,
    pub current_price: String,
    pub is_discounted: bool,
    pub discount_percentage: u8,
    pub price_display: String,
    pub features: Vec<String>,
    pub features_display: String,
    pub storage_limit_gb: u32,
    pub family_members_limit: u32,
    pub lifetime_guarantee: bool,
    pub purchaser: Option<String>,
    pub purchase_date: Option<String>,
    pub created_at: String,
    pub expires_at: Option<String>,
}

impl From<LicenseView> for LicenseResponse {
    fn from(view: LicenseView) -> Self {
        Self {
            id: view.id.to_string(),
            license_number: view.license_number.value(),
            license_type: view.license_type,
            status: view.status,
            is_available: view.is_available,
            original_price: view.original_price.to_decimal_string(),
            current_price: view.current_price.to_decimal_string(),
            is_discounted: view.is_discounted,
            discount_percentage: view.discount_percentage.value(),
            price_display: view.price_display,
            features: view.features,
            features_display: view.features_display,
            storage_limit_gb: view.storage_limit_gb,
            family_members_limit: view.family_members_limit,
            lifetime_guarantee: view.lifetime_guarantee,
            purchaser: view.purchaser.map(|u| u.to_string()),
            purchase_date: view.purchase_date.as_ref().map(rfc3339),
            created_at: rfc3339(&view.created_at),
            expires_at: view.expires_at.as_ref().map(rfc3339),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenseSummaryResponse {
    pub id: String,
    pub license_number: u16,
    pub license_type: LicenseType,
    pub status: LicenseStatus,
    pub current_price: String,
    pub price_display: String,
    pub is_discounted: bool,
}

impl From<LicenseSummary> for LicenseSummaryResponse {
    fn from(summary: LicenseSummary) -> Self {
        Self {
            id: summary.id.to_string(),
            license_number: summary.license_number.value(),
            license_type: summary.license_type,
            status: summary.status,
            current_price: summary.current_price.to_decimal_string(),
            price_display: summary.price_display,
            is_discounted: summary.is_discounted,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemainingResponse {
    pub remaining: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseResponse {
    pub id: String,
    pub license_id: String,
    pub license_number: u16,
    pub purchaser: String,
    pub purchase_date: String,
    pub amount_paid: String,
    pub payment_method: String,
    pub transaction_id: String,
}

impl From<PurchaseView> for PurchaseResponse {
    fn from(p: PurchaseView) -> Self {
        Self {
            id: p.id.to_string(),
            license_id: p.license_id.to_string(),
            license_number: p.license_number.value(),
            purchaser: p.purchaser.to_string(),
            purchase_date: rfc3339(&p.purchase_date),
            amount_paid: p.amount_paid.to_decimal_string(),
            payment_method: p.payment_method,
            transaction_id: p.transaction_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseResultResponse {
    pub license: LicenseResponse,
    pub purchase: PurchaseResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountResponse {
    pub percent_off: u8,
    pub updated: usize,
    pub licenses: Vec<LicenseSummaryResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeCountResponse {
    pub license_type: LicenseType,
    pub count: u64,
}

impl From<TypeCount> for TypeCountResponse {
    fn from(t: TypeCount) -> Self {
        Self {
            license_type: t.license_type,
            count: t.count,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenseStatisticsResponse {
    pub total: u64,
    pub available: u64,
    pub reserved: u64,
    pub sold: u64,
    pub expired: u64,
    pub total_revenue: String,
    pub average_price: Option<String>,
    pub by_type: Vec<TypeCountResponse>,
}

impl From<LicenseStatistics> for LicenseStatisticsResponse {
    fn from(stats: LicenseStatistics) -> Self {
        Self {
            total: stats.total,
            available: stats.available,
            reserved: stats.reserved,
            sold: stats.sold,
            expired: stats.expired,
            total_revenue: stats.total_revenue.to_decimal_string(),
            average_price: stats.average_price.map(|m| m.to_decimal_string()),
            by_type: stats.by_type.into_iter().map(TypeCountResponse::from).collect(),
        }
    }
}
