//! In-memory license catalogue and purchase ledger.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, LicenseId, Money, UserId};
use crate::domain::legacy::{License, LicensePurchase, LicenseStatus, LicenseType};
use crate::ports::{
    LicenseFilter, LicenseReader, LicenseRepository, LicenseStatistics, LicenseSummary,
    LicenseView, PurchaseView, RecordedSale, TypeCount,
};

#[derive(Debug, Default)]
struct Tables {
    licenses: HashMap<LicenseId, License>,
    purchases: Vec<LicensePurchase>,
}

impl Tables {
    /// Copies the transition fields of `license` onto the stored row if its
    /// status is one of `expected` (any status when `None`). Returns the
    /// stored row after the merge.
    fn transition(
        &mut self,
        license: &License,
        expected: Option<&[LicenseStatus]>,
    ) -> Option<&License> {
        let stored = self
            .licenses
            .get_mut(&license.id)
            .filter(|stored| expected.map_or(true, |e| e.contains(&stored.status)))?;
        stored.status = license.status;
        stored.purchaser = license.purchaser.clone();
        stored.purchase_date = license.purchase_date;
        stored.payment_method = license.payment_method.clone();
        stored.transaction_id = license.transaction_id.clone();
        stored.updated_at = license.updated_at;
        Some(&*stored)
    }
}

/// In-memory license storage.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLicenseStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryLicenseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of ledger rows (useful for tests).
    pub async fn purchase_count(&self) -> usize {
        self.tables.read().await.purchases.len()
    }

    /// Ledger rows for one license, oldest first.
    pub async fn purchases_for_license(&self, id: &LicenseId) -> Vec<LicensePurchase> {
        self.tables
            .read()
            .await
            .purchases
            .iter()
            .filter(|p| &p.license_id == id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl LicenseRepository for InMemoryLicenseStore {
    async fn save(&self, license: &License) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        let taken = tables
            .licenses
            .values()
            .any(|l| l.license_number == license.license_number && l.id != license.id);
        if taken || tables.licenses.contains_key(&license.id) {
            return Err(DomainError::new(
                ErrorCode::DuplicateLicenseNumber,
                format!("License number {} already exists", license.license_number),
            ));
        }
        tables.licenses.insert(license.id, license.clone());
        Ok(())
    }

    async fn update(&self, license: &License) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        match tables.transition(license, None) {
            Some(_) => Ok(()),
            None => Err(DomainError::new(
                ErrorCode::LicenseNotFound,
                format!("License not found: {}", license.id),
            )),
        }
    }

    async fn update_if_status(
        &self,
        license: &License,
        expected: &[LicenseStatus],
    ) -> Result<bool, DomainError> {
        let mut tables = self.tables.write().await;
        Ok(tables.transition(license, Some(expected)).is_some())
    }

    async fn record_sale(
        &self,
        license: &License,
        purchase: &LicensePurchase,
        expected: &[LicenseStatus],
    ) -> Result<Option<RecordedSale>, DomainError> {
        let mut tables = self.tables.write().await;
        let Some(stored) = tables.transition(license, Some(expected)).cloned() else {
            return Ok(None);
        };
        let purchase = LicensePurchase {
            amount_paid: stored.current_price,
            ..purchase.clone()
        };
        tables.purchases.push(purchase.clone());
        Ok(Some(RecordedSale {
            license: stored,
            purchase,
        }))
    }

    async fn update_prices(&self, licenses: &[License]) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        if let Some(missing) = licenses.iter().find(|l| !tables.licenses.contains_key(&l.id)) {
            return Err(DomainError::new(
                ErrorCode::LicenseNotFound,
                format!("License not found: {}", missing.id),
            ));
        }
        for license in licenses {
            if let Some(stored) = tables.licenses.get_mut(&license.id) {
                stored.original_price = license.original_price;
                stored.current_price = license.current_price;
                stored.is_discounted = license.is_discounted;
                stored.discount_percentage = license.discount_percentage;
                stored.updated_at = license.updated_at;
            }
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &LicenseId) -> Result<Option<License>, DomainError> {
        Ok(self.tables.read().await.licenses.get(id).cloned())
    }

    async fn find_by_ids(&self, ids: &[LicenseId]) -> Result<Vec<License>, DomainError> {
        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.licenses.get(id).cloned())
            .collect())
    }
}

#[async_trait]
impl LicenseReader for InMemoryLicenseStore {
    async fn get(&self, id: &LicenseId) -> Result<Option<LicenseView>, DomainError> {
        Ok(self.tables.read().await.licenses.get(id).map(LicenseView::from))
    }

    async fn list(&self, filter: &LicenseFilter) -> Result<Vec<LicenseSummary>, DomainError> {
        let tables = self.tables.read().await;
        let mut matching: Vec<&License> =
            tables.licenses.values().filter(|l| filter.matches(l)).collect();
        matching.sort_by_key(|l| l.license_number);
        Ok(matching.into_iter().map(LicenseSummary::from).collect())
    }

    async fn count_by_status(&self, status: LicenseStatus) -> Result<u64, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.licenses.values().filter(|l| l.status == status).count() as u64)
    }

    async fn statistics(&self) -> Result<LicenseStatistics, DomainError> {
        let tables = self.tables.read().await;
        let mut stats = LicenseStatistics::default();

        let mut by_type: HashMap<LicenseType, u64> = HashMap::new();
        for license in tables.licenses.values() {
            stats.total += 1;
            match license.status {
                LicenseStatus::Available => stats.available += 1,
                LicenseStatus::Reserved => stats.reserved += 1,
                LicenseStatus::Sold => stats.sold += 1,
                LicenseStatus::Expired => stats.expired += 1,
            }
            *by_type.entry(license.license_type).or_default() += 1;
        }

        let mut by_type: Vec<TypeCount> = by_type
            .into_iter()
            .map(|(license_type, count)| TypeCount { license_type, count })
            .collect();
        by_type.sort_by_key(|t| t.license_type.as_str());
        stats.by_type = by_type;

        stats.total_revenue = Money::total(tables.purchases.iter().map(|p| p.amount_paid));
        stats.average_price = Money::average(stats.total_revenue, tables.purchases.len() as u64);

        Ok(stats)
    }

    async fn purchases_for_user(&self, user_id: &UserId) -> Result<Vec<PurchaseView>, DomainError> {
        let tables = self.tables.read().await;
        let mut mine: Vec<&LicensePurchase> = tables
            .purchases
            .iter()
            .filter(|p| &p.purchaser == user_id)
            .collect();
        mine.sort_by(|a, b| b.purchase_date.cmp(&a.purchase_date));
        Ok(mine.into_iter().map(PurchaseView::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Timestamp;
    use crate::domain::legacy::{LicenseNumber, PaymentDetails};

    fn license(n: i64) -> License {
        License::new(LicenseNumber::try_new(n).unwrap(), Timestamp::now())
    }

    fn user(name: &str) -> UserId {
        UserId::new(name).unwrap()
    }

    #[tokio::test]
    async fn duplicate_number_is_rejected() {
        let store = InMemoryLicenseStore::new();
        store.save(&license(1)).await.unwrap();

        let err = store.save(&license(1)).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::DuplicateLicenseNumber);
    }

    #[tokio::test]
    async fn update_if_status_refuses_stale_write() {
        let store = InMemoryLicenseStore::new();
        let original = license(1);
        store.save(&original).await.unwrap();

        let mut first = original.clone();
        assert!(first.reserve(&user("alice")));
        assert!(store
            .update_if_status(&first, &[LicenseStatus::Available])
            .await
            .unwrap());

        let mut second = original.clone();
        assert!(second.reserve(&user("bob")));
        assert!(!store
            .update_if_status(&second, &[LicenseStatus::Available])
            .await
            .unwrap());

        let stored = store.find_by_id(&original.id).await.unwrap().unwrap();
        assert_eq!(stored.purchaser, Some(user("alice")));
    }

    #[tokio::test]
    async fn losing_sale_writes_no_ledger_row() {
        let store = InMemoryLicenseStore::new();
        let original = license(1);
        store.save(&original).await.unwrap();
        let payment = PaymentDetails::new("card", "tx_1").unwrap();

        let mut a = original.clone();
        let receipt_a = a.purchase(&user("alice"), &payment, Timestamp::now()).unwrap();
        let mut b = original.clone();
        let receipt_b = b.purchase(&user("bob"), &payment, Timestamp::now()).unwrap();

        assert!(store
            .record_sale(&a, &receipt_a, &LicenseStatus::PURCHASABLE)
            .await
            .unwrap()
            .is_some());
        assert!(store
            .record_sale(&b, &receipt_b, &LicenseStatus::PURCHASABLE)
            .await
            .unwrap()
            .is_none());
        assert_eq!(store.purchase_count().await, 1);
    }

    #[tokio::test]
    async fn sale_charges_price_stored_at_write_time() {
        let store = InMemoryLicenseStore::new();
        let original = license(1);
        store.save(&original).await.unwrap();
        let mut loaded = store.find_by_id(&original.id).await.unwrap().unwrap();

        let mut discounted = original.clone();
        discounted.apply_discount(crate::domain::foundation::Percentage::new(50));
        discounted.normalize(Timestamp::now());
        store.update_prices(&[discounted]).await.unwrap();

        let payment = PaymentDetails::new("card", "tx_1").unwrap();
        let receipt = loaded.purchase(&user("alice"), &payment, Timestamp::now()).unwrap();
        assert_eq!(receipt.amount_paid, Money::from_units(1999));
        let sale = store
            .record_sale(&loaded, &receipt, &LicenseStatus::PURCHASABLE)
            .await
            .unwrap()
            .unwrap();

        let half = Money::from_cents(149_950).unwrap();
        assert_eq!(sale.purchase.amount_paid, half);
        assert_eq!(sale.license.current_price, half);
        assert_eq!(sale.license.status, LicenseStatus::Sold);
        let stored = store.find_by_id(&original.id).await.unwrap().unwrap();
        assert_eq!(stored.current_price, half);
        assert_eq!(stored.discount_percentage.value(), 50);
        assert_eq!(store.purchases_for_license(&original.id).await[0].amount_paid, half);
    }

    #[tokio::test]
    async fn reservation_keeps_concurrent_discount() {
        let store = InMemoryLicenseStore::new();
        let original = license(1);
        store.save(&original).await.unwrap();
        let mut loaded = original.clone();

        let mut discounted = original.clone();
        discounted.apply_discount(crate::domain::foundation::Percentage::new(50));
        discounted.normalize(Timestamp::now());
        store.update_prices(&[discounted]).await.unwrap();

        assert!(loaded.reserve(&user("alice")));
        assert!(store
            .update_if_status(&loaded, &[LicenseStatus::Available])
            .await
            .unwrap());

        let stored = store.find_by_id(&original.id).await.unwrap().unwrap();
        assert_eq!(stored.status, LicenseStatus::Reserved);
        assert_eq!(stored.current_price, Money::from_cents(149_950).unwrap());
        assert!(stored.is_discounted);
    }

    #[tokio::test]
    async fn list_is_ordered_and_filtered() {
        let store = InMemoryLicenseStore::new();
        for n in [7, 2, 5] {
            store.save(&license(n)).await.unwrap();
        }
        let mut reserved = license(9);
        reserved.reserve(&user("alice"));
        store.save(&reserved).await.unwrap();

        let numbers: Vec<u16> = store
            .list(&LicenseFilter::default())
            .await
            .unwrap()
            .iter()
            .map(|s| s.license_number.value())
            .collect();
        assert_eq!(numbers, [2, 5, 7, 9]);

        let available = LicenseFilter {
            status: Some(LicenseStatus::Available),
            license_type: None,
        };
        assert_eq!(store.list(&available).await.unwrap().len(), 3);
        assert_eq!(store.count_by_status(LicenseStatus::Available).await.unwrap(), 3);
        assert_eq!(store.count_by_status(LicenseStatus::Reserved).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn statistics_sum_the_ledger() {
        let store = InMemoryLicenseStore::new();
        let payment = PaymentDetails::new("card", "tx").unwrap();
        for (n, units) in [(1, 1999), (2, 1000)] {
            let mut l = license(n).with_prices(Money::from_units(2999), Money::from_units(units));
            l.normalize(Timestamp::now());
            store.save(&l).await.unwrap();
            let receipt = l.purchase(&user("alice"), &payment, Timestamp::now()).unwrap();
            store
                .record_sale(&l, &receipt, &LicenseStatus::PURCHASABLE)
                .await
                .unwrap();
        }
        store.save(&license(3)).await.unwrap();

        let stats = store.statistics().await.unwrap();

        assert_eq!(stats.total, 3);
        assert_eq!(stats.sold, 2);
        assert_eq!(stats.available, 1);
        assert_eq!(stats.total_revenue, Money::from_units(2999));
        assert_eq!(stats.average_price, Some(Money::from_cents(149_950).unwrap()));
        assert_eq!(stats.by_type.len(), 1);
        assert_eq!(stats.by_type[0].count, 3);
    }

    #[tokio::test]
    async fn empty_catalogue_has_no_average() {
        let stats = InMemoryLicenseStore::new().statistics().await.unwrap();
        assert_eq!(stats.total, 0);
        assert_eq!(stats.total_revenue, Money::ZERO);
        assert!(stats.average_price.is_none());
    }

    #[tokio::test]
    async fn update_prices_rejects_unknown_license_without_writing() {
        let store = InMemoryLicenseStore::new();
        let mut known = license(1);
        store.save(&known).await.unwrap();
        known.apply_discount(crate::domain::foundation::Percentage::new(50));
        known.normalize(Timestamp::now());

        let err = store.update_prices(&[known.clone(), license(2)]).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::LicenseNotFound);
        let stored = store.find_by_id(&known.id).await.unwrap().unwrap();
        assert_eq!(stored.current_price, Money::from_units(1999));
    }
}
