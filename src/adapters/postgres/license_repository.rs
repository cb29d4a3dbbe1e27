//! PostgreSQL implementation of LicenseRepository.
//!
//! Status transitions use a conditional `UPDATE ... WHERE status = ANY(..)`
//! that writes only the transition columns and returns the stored row, so
//! the check and the write are one atomic statement. A sale inserts its
//! ledger row in the same transaction, priced from the returned row.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgExecutor;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{
    DomainError, ErrorCode, LicenseId, Money, Percentage, PurchaseId, Timestamp, UserId,
};
use crate::domain::legacy::{
    License, LicenseNumber, LicensePurchase, LicenseStatus, LicenseType,
};
use crate::ports::{LicenseRepository, RecordedSale};

pub struct PostgresLicenseRepository {
    pool: PgPool,
}

impl PostgresLicenseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub(super) const LICENSE_COLUMNS: &str = r#"
    id, license_number, license_type, status, original_price_cents, current_price_cents,
    is_discounted, discount_percentage, features, storage_limit_gb, family_members_limit,
    lifetime_guarantee, purchaser_id, purchase_date, payment_method, transaction_id,
    created_at, updated_at, expires_at
"#;

pub(super) const PURCHASE_COLUMNS: &str = r#"
    id, license_id, license_number, purchaser_id, purchase_date, amount_paid_cents,
    payment_method, transaction_id
"#;

/// Database row representation of a license.
#[derive(Debug, sqlx::FromRow)]
pub(super) struct LicenseRow {
    id: Uuid,
    license_number: i16,
    license_type: String,
    status: String,
    original_price_cents: i64,
    current_price_cents: i64,
    is_discounted: bool,
    discount_percentage: i16,
    features: Vec<String>,
    storage_limit_gb: i32,
    family_members_limit: i32,
    lifetime_guarantee: bool,
    purchaser_id: Option<String>,
    purchase_date: Option<DateTime<Utc>>,
    payment_method: Option<String>,
    transaction_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
}

impl TryFrom<LicenseRow> for License {
    type Error = DomainError;

    fn try_from(row: LicenseRow) -> Result<Self, Self::Error> {
        Ok(License {
            id: LicenseId::from_uuid(row.id),
            license_number: LicenseNumber::try_new(i64::from(row.license_number)).map_err(corrupt)?,
            license_type: row.license_type.parse::<LicenseType>().map_err(corrupt)?,
            status: row.status.parse::<LicenseStatus>().map_err(corrupt)?,
            original_price: Money::from_cents(row.original_price_cents).map_err(corrupt)?,
            current_price: Money::from_cents(row.current_price_cents).map_err(corrupt)?,
            is_discounted: row.is_discounted,
            discount_percentage: Percentage::try_new(i64::from(row.discount_percentage))
                .map_err(corrupt)?,
            features: row.features,
            storage_limit_gb: to_u32("storage_limit_gb", row.storage_limit_gb)?,
            family_members_limit: to_u32("family_members_limit", row.family_members_limit)?,
            lifetime_guarantee: row.lifetime_guarantee,
            purchaser: row.purchaser_id.map(UserId::new).transpose().map_err(corrupt)?,
            purchase_date: row.purchase_date.map(Timestamp::from_datetime),
            payment_method: row.payment_method,
            transaction_id: row.transaction_id,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
            expires_at: row.expires_at.map(Timestamp::from_datetime),
        })
    }
}

/// Database row representation of a ledger entry.
#[derive(Debug, sqlx::FromRow)]
pub(super) struct PurchaseRow {
    id: Uuid,
    license_id: Uuid,
    license_number: i16,
    purchaser_id: String,
    purchase_date: DateTime<Utc>,
    amount_paid_cents: i64,
    payment_method: String,
    transaction_id: String,
}

impl TryFrom<PurchaseRow> for LicensePurchase {
    type Error = DomainError;

    fn try_from(row: PurchaseRow) -> Result<Self, Self::Error> {
        Ok(LicensePurchase {
            id: PurchaseId::from_uuid(row.id),
            license_id: LicenseId::from_uuid(row.license_id),
            license_number: LicenseNumber::try_new(i64::from(row.license_number)).map_err(corrupt)?,
            purchaser: UserId::new(row.purchaser_id).map_err(corrupt)?,
            purchase_date: Timestamp::from_datetime(row.purchase_date),
            amount_paid: Money::from_cents(row.amount_paid_cents).map_err(corrupt)?,
            payment_method: row.payment_method,
            transaction_id: row.transaction_id,
        })
    }
}

pub(super) fn corrupt(err: impl std::fmt::Display) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("Invalid stored value: {}", err))
}

fn to_u32(field: &str, value: i32) -> Result<u32, DomainError> {
    u32::try_from(value).map_err(|_| corrupt(format!("{} is negative", field)))
}

fn to_i32(field: &str, value: u32) -> Result<i32, DomainError> {
    i32::try_from(value).map_err(|_| DomainError::validation(field, format!("{} is too large", field)))
}

fn status_strings(statuses: &[LicenseStatus]) -> Vec<String> {
    statuses.iter().map(|s| s.as_str().to_string()).collect()
}

/// Writes the status, holder and payment columns. Prices and catalogue
/// columns keep whatever is stored. With `expected` set, the write only
/// lands while the stored status is one of them. Returns the stored row
/// after the write.
async fn write_transition<'e, E>(
    executor: E,
    license: &License,
    expected: Option<Vec<String>>,
) -> Result<Option<LicenseRow>, DomainError>
where
    E: PgExecutor<'e>,
{
    let query = format!(
        r#"
        UPDATE legacy_licenses SET
            status = $2,
            purchaser_id = $3,
            purchase_date = $4,
            payment_method = $5,
            transaction_id = $6,
            updated_at = $7
        WHERE id = $1
          AND ($8::text[] IS NULL OR status = ANY($8))
        RETURNING {}
        "#,
        LICENSE_COLUMNS
    );

    sqlx::query_as(&query)
        .bind(license.id.as_uuid())
        .bind(license.status.as_str())
        .bind(license.purchaser.as_ref().map(|u| u.as_str().to_string()))
        .bind(license.purchase_date.map(|t| *t.as_datetime()))
        .bind(&license.payment_method)
        .bind(&license.transaction_id)
        .bind(license.updated_at.as_datetime())
        .bind(expected)
        .fetch_optional(executor)
        .await
        .map_err(|e| DomainError::database("Failed to update license", e))
}

#[async_trait]
impl LicenseRepository for PostgresLicenseRepository {
    async fn save(&self, license: &License) -> Result<(), DomainError> {
        let query = format!(
            "INSERT INTO legacy_licenses ({}) VALUES \
             ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)",
            LICENSE_COLUMNS
        );

        sqlx::query(&query)
            .bind(license.id.as_uuid())
            .bind(license.license_number.value() as i16)
            .bind(license.license_type.as_str())
            .bind(license.status.as_str())
            .bind(license.original_price.cents())
            .bind(license.current_price.cents())
            .bind(license.is_discounted)
            .bind(i16::from(license.discount_percentage.value()))
            .bind(&license.features)
            .bind(to_i32("storage_limit_gb", license.storage_limit_gb)?)
            .bind(to_i32("family_members_limit", license.family_members_limit)?)
            .bind(license.lifetime_guarantee)
            .bind(license.purchaser.as_ref().map(|u| u.as_str().to_string()))
            .bind(license.purchase_date.map(|t| *t.as_datetime()))
            .bind(&license.payment_method)
            .bind(&license.transaction_id)
            .bind(license.created_at.as_datetime())
            .bind(license.updated_at.as_datetime())
            .bind(license.expires_at.map(|t| *t.as_datetime()))
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.constraint() == Some("legacy_licenses_license_number_key") {
                        return DomainError::new(
                            ErrorCode::DuplicateLicenseNumber,
                            format!("License number {} already exists", license.license_number),
                        );
                    }
                }
                DomainError::database("Failed to save license", e)
            })?;

        Ok(())
    }

    async fn update(&self, license: &License) -> Result<(), DomainError> {
        match write_transition(&self.pool, license, None).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::new(ErrorCode::LicenseNotFound, "License not found")),
        }
    }

    async fn update_if_status(
        &self,
        license: &License,
        expected: &[LicenseStatus],
    ) -> Result<bool, DomainError> {
        let stored = write_transition(&self.pool, license, Some(status_strings(expected))).await?;
        Ok(stored.is_some())
    }

    async fn record_sale(
        &self,
        license: &License,
        purchase: &LicensePurchase,
        expected: &[LicenseStatus],
    ) -> Result<Option<RecordedSale>, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::database("Failed to begin transaction", e))?;

        let Some(row) = write_transition(&mut *tx, license, Some(status_strings(expected))).await?
        else {
            tx.rollback()
                .await
                .map_err(|e| DomainError::database("Failed to roll back transaction", e))?;
            return Ok(None);
        };
        let stored = License::try_from(row)?;
        // Charged at the price the row holds under this transaction's lock.
        let purchase = LicensePurchase {
            amount_paid: stored.current_price,
            ..purchase.clone()
        };

        let query = format!(
            "INSERT INTO license_purchases ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
            PURCHASE_COLUMNS
        );
        sqlx::query(&query)
            .bind(purchase.id.as_uuid())
            .bind(purchase.license_id.as_uuid())
            .bind(purchase.license_number.value() as i16)
            .bind(purchase.purchaser.as_str())
            .bind(purchase.purchase_date.as_datetime())
            .bind(purchase.amount_paid.cents())
            .bind(&purchase.payment_method)
            .bind(&purchase.transaction_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::database("Failed to record purchase", e))?;

        tx.commit()
            .await
            .map_err(|e| DomainError::database("Failed to commit transaction", e))?;

        Ok(Some(RecordedSale {
            license: stored,
            purchase,
        }))
    }

    async fn update_prices(&self, licenses: &[License]) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::database("Failed to begin transaction", e))?;

        for license in licenses {
            let result = sqlx::query(
                r#"
                UPDATE legacy_licenses SET
                    current_price_cents = $2,
                    is_discounted = $3,
                    discount_percentage = $4,
                    updated_at = $5
                WHERE id = $1
                "#,
            )
            .bind(license.id.as_uuid())
            .bind(license.current_price.cents())
            .bind(license.is_discounted)
            .bind(i16::from(license.discount_percentage.value()))
            .bind(license.updated_at.as_datetime())
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::database("Failed to update price", e))?;

            if result.rows_affected() == 0 {
                // Dropping the transaction rolls back earlier rows.
                return Err(DomainError::new(
                    ErrorCode::LicenseNotFound,
                    format!("License not found: {}", license.id),
                ));
            }
        }

        tx.commit()
            .await
            .map_err(|e| DomainError::database("Failed to commit transaction", e))?;

        Ok(())
    }

    async fn find_by_id(&self, id: &LicenseId) -> Result<Option<License>, DomainError> {
        let query = format!("SELECT {} FROM legacy_licenses WHERE id = $1", LICENSE_COLUMNS);
        let row: Option<LicenseRow> = sqlx::query_as(&query)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to find license", e))?;

        row.map(License::try_from).transpose()
    }

    async fn find_by_ids(&self, ids: &[LicenseId]) -> Result<Vec<License>, DomainError> {
        let uuids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
        let query = format!(
            "SELECT {} FROM legacy_licenses WHERE id = ANY($1) ORDER BY license_number",
            LICENSE_COLUMNS
        );
        let rows: Vec<LicenseRow> = sqlx::query_as(&query)
            .bind(uuids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to find licenses", e))?;

        rows.into_iter().map(License::try_from).collect()
    }
}
