//! License repository port (write side).
//!
//! Status transitions are written with compare-and-set semantics: the
//! write lands only if the stored status is still one of the statuses the
//! transition started from. Two concurrent buyers therefore cannot both
//! see their sale persisted.
//!
//! # Example
//!
//! ```ignore
//! let mut license = repo.find_by_id(&id).await?.ok_or(..)?;
//! if license.reserve(&user) {
//!     license.normalize(Timestamp::now());
//!     let won = repo
//!         .update_if_status(&license, &[LicenseStatus::Available])
//!         .await?;
//! }
//! ```

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, LicenseId};
use crate::domain::legacy::{License, LicensePurchase, LicenseStatus};

/// A sale as committed: the stored license after the write and the ledger
/// row charged at its selling price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedSale {
    pub license: License,
    pub purchase: LicensePurchase,
}

#[async_trait]
pub trait LicenseRepository: Send + Sync {
    /// Insert a new license.
    ///
    /// # Errors
    ///
    /// - `DuplicateLicenseNumber` if the number is taken
    /// - `DatabaseError` on persistence failure
    async fn save(&self, license: &License) -> Result<(), DomainError>;

    /// Unconditional write of the status, holder and payment fields, for
    /// administrative resets. Prices are left as stored.
    ///
    /// # Errors
    ///
    /// - `LicenseNotFound` if the license doesn't exist
    async fn update(&self, license: &License) -> Result<(), DomainError>;

    /// Write the status, holder and payment fields of `license` only if its
    /// stored status is one of `expected`. Prices and catalogue fields are
    /// left as stored.
    ///
    /// Returns `false` (and writes nothing) when the stored status has
    /// moved on or the row is gone.
    async fn update_if_status(
        &self,
        license: &License,
        expected: &[LicenseStatus],
    ) -> Result<bool, DomainError>;

    /// Persist a completed sale: the conditional license update and the
    /// ledger insert commit together or not at all.
    ///
    /// `amount_paid` is taken from the stored selling price at the moment
    /// of the write, not from `purchase`. Returns `None` if the status
    /// check lost; no ledger row is written.
    async fn record_sale(
        &self,
        license: &License,
        purchase: &LicensePurchase,
        expected: &[LicenseStatus],
    ) -> Result<Option<RecordedSale>, DomainError>;

    /// Write new prices for a batch in one transaction.
    async fn update_prices(&self, licenses: &[License]) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &LicenseId) -> Result<Option<License>, DomainError>;

    /// Fetch several licenses. Missing ids are simply absent from the result.
    async fn find_by_ids(&self, ids: &[LicenseId]) -> Result<Vec<License>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn license_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn LicenseRepository) {}
    }
}
