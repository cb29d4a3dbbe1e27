//! PostgreSQL implementation of LicenseReader.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, LicenseId, Money, UserId};
use crate::domain::legacy::{License, LicensePurchase, LicenseStatus, LicenseType};
use crate::ports::{
    LicenseFilter, LicenseReader, LicenseStatistics, LicenseSummary, LicenseView, PurchaseView,
    TypeCount,
};

use super::license_repository::{
    corrupt, LicenseRow, PurchaseRow, LICENSE_COLUMNS, PURCHASE_COLUMNS,
};

pub struct PostgresLicenseReader {
    pool: PgPool,
}

impl PostgresLicenseReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct StatusCountRow {
    status: String,
    count: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct TypeCountRow {
    license_type: String,
    count: i64,
}

#[async_trait]
impl LicenseReader for PostgresLicenseReader {
    async fn get(&self, id: &LicenseId) -> Result<Option<LicenseView>, DomainError> {
        let query = format!("SELECT {} FROM legacy_licenses WHERE id = $1", LICENSE_COLUMNS);
        let row: Option<LicenseRow> = sqlx::query_as(&query)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to load license", e))?;

        let license = row.map(License::try_from).transpose()?;
        Ok(license.as_ref().map(LicenseView::from))
    }

    async fn list(&self, filter: &LicenseFilter) -> Result<Vec<LicenseSummary>, DomainError> {
        let query = format!(
            r#"
            SELECT {} FROM legacy_licenses
            WHERE ($1::text IS NULL OR status = $1)
              AND ($2::text IS NULL OR license_type = $2)
            ORDER BY license_number
            "#,
            LICENSE_COLUMNS
        );
        let rows: Vec<LicenseRow> = sqlx::query_as(&query)
            .bind(filter.status.map(|s| s.as_str()))
            .bind(filter.license_type.map(|t| t.as_str()))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to list licenses", e))?;

        rows.into_iter()
            .map(|row| License::try_from(row).map(|l| LicenseSummary::from(&l)))
            .collect()
    }

    async fn count_by_status(&self, status: LicenseStatus) -> Result<u64, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM legacy_licenses WHERE status = $1")
            .bind(status.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to count licenses", e))?;

        Ok(count as u64)
    }

    async fn statistics(&self) -> Result<LicenseStatistics, DomainError> {
        let status_rows: Vec<StatusCountRow> = sqlx::query_as(
            "SELECT status, COUNT(*) AS count FROM legacy_licenses GROUP BY status",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to get status counts", e))?;

        let mut stats = LicenseStatistics::default();
        for row in status_rows {
            let count = row.count as u64;
            stats.total += count;
            match row.status.parse::<LicenseStatus>().map_err(corrupt)? {
                LicenseStatus::Available => stats.available = count,
                LicenseStatus::Reserved => stats.reserved = count,
                LicenseStatus::Sold => stats.sold = count,
                LicenseStatus::Expired => stats.expired = count,
            }
        }

        let type_rows: Vec<TypeCountRow> = sqlx::query_as(
            "SELECT license_type, COUNT(*) AS count FROM legacy_licenses \
             GROUP BY license_type ORDER BY license_type",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to get type counts", e))?;

        stats.by_type = type_rows
            .into_iter()
            .map(|row| {
                Ok(TypeCount {
                    license_type: row.license_type.parse::<LicenseType>().map_err(corrupt)?,
                    count: row.count as u64,
                })
            })
            .collect::<Result<_, DomainError>>()?;

        let (revenue_cents, sales): (i64, i64) = sqlx::query_as(
            "SELECT COALESCE(SUM(amount_paid_cents), 0)::BIGINT, COUNT(*) FROM license_purchases",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to sum revenue", e))?;

        stats.total_revenue = Money::total_from_cents(revenue_cents).map_err(corrupt)?;
        stats.average_price = Money::average(stats.total_revenue, sales.max(0) as u64);

        Ok(stats)
    }

    async fn purchases_for_user(&self, user_id: &UserId) -> Result<Vec<PurchaseView>, DomainError> {
        let query = format!(
            "SELECT {} FROM license_purchases WHERE purchaser_id = $1 ORDER BY purchase_date DESC",
            PURCHASE_COLUMNS
        );
        let rows: Vec<PurchaseRow> = sqlx::query_as(&query)
            .bind(user_id.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to load purchases", e))?;

        rows.into_iter()
            .map(|row| LicensePurchase::try_from(row).map(|p| PurchaseView::from(&p)))
            .collect()
    }
}
