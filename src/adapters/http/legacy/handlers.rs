//! HTTP handlers for legacy license endpoints.
//!
//! These handlers connect Axum routes to application layer command/query handlers.

use std::sync::Arc;

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapters::http::error::ErrorResponse;
use crate::adapters::http::middleware::{AdminUser, AuthenticatedUser};
use crate::application::handlers::legacy::{
    ApplyDiscountCommand, ApplyDiscountHandler, CreateLicenseCommand, CreateLicenseHandler,
    ExpireLicenseCommand, ExpireLicenseHandler, ForceAvailableCommand, ForceAvailableHandler,
    GetLicenseHandler, GetLicenseQuery, GetLicenseStatisticsHandler, GetMyPurchasesHandler,
    GetRemainingCountHandler, ListLicensesHandler, PurchaseLicenseCommand, PurchaseLicenseHandler,
    ReleaseLicenseCommand, ReleaseLicenseHandler, ReserveLicenseCommand, ReserveLicenseHandler,
};
use crate::domain::foundation::{DomainError, LicenseId, Money, Timestamp};
use crate::domain::legacy::LicenseError;
use crate::ports::{
    EventPublisher, LicenseReader, LicenseRepository, LicenseSummary, LicenseView, PurchaseView,
};

use super::dto::{
    CreateLicenseRequest, DiscountRequest, DiscountResponse, LicenseListParams, LicenseResponse,
    LicenseStatisticsResponse, LicenseSummaryResponse, PurchaseRequest, PurchaseResponse,
    PurchaseResultResponse, RemainingResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared dependencies for the license endpoints, cloned per request.
#[derive(Clone)]
pub struct LegacyAppState {
    pub license_repository: Arc<dyn LicenseRepository>,
    pub license_reader: Arc<dyn LicenseReader>,
    pub event_publisher: Arc<dyn EventPublisher>,
}

impl LegacyAppState {
    pub fn create_license_handler(&self) -> CreateLicenseHandler {
        CreateLicenseHandler::new(self.license_repository.clone(), self.event_publisher.clone())
    }

    pub fn reserve_handler(&self) -> ReserveLicenseHandler {
        ReserveLicenseHandler::new(self.license_repository.clone(), self.event_publisher.clone())
    }

    pub fn release_handler(&self) -> ReleaseLicenseHandler {
        ReleaseLicenseHandler::new(self.license_repository.clone(), self.event_publisher.clone())
    }

    pub fn purchase_handler(&self) -> PurchaseLicenseHandler {
        PurchaseLicenseHandler::new(self.license_repository.clone(), self.event_publisher.clone())
    }

    pub fn discount_handler(&self) -> ApplyDiscountHandler {
        ApplyDiscountHandler::new(self.license_repository.clone(), self.event_publisher.clone())
    }

    pub fn expire_handler(&self) -> ExpireLicenseHandler {
        ExpireLicenseHandler::new(self.license_repository.clone(), self.event_publisher.clone())
    }

    pub fn force_available_handler(&self) -> ForceAvailableHandler {
        ForceAvailableHandler::new(self.license_repository.clone(), self.event_publisher.clone())
    }

    pub fn get_license_handler(&self) -> GetLicenseHandler {
        GetLicenseHandler::new(self.license_reader.clone())
    }

    pub fn list_handler(&self) -> ListLicensesHandler {
        ListLicensesHandler::new(self.license_reader.clone())
    }

    pub fn remaining_handler(&self) -> GetRemainingCountHandler {
        GetRemainingCountHandler::new(self.license_reader.clone())
    }

    pub fn statistics_handler(&self) -> GetLicenseStatisticsHandler {
        GetLicenseStatisticsHandler::new(self.license_reader.clone())
    }

    pub fn my_purchases_handler(&self) -> GetMyPurchasesHandler {
        GetMyPurchasesHandler::new(self.license_reader.clone())
    }
}

fn parse_price(field: &str, value: &str) -> Result<Money, LicenseError> {
    value
        .parse::<Money>()
        .map_err(|_| {
            LicenseError::validation(
                field,
                format!("'{}' is not a valid price (0 to {})", value, Money::MAX.to_decimal_string()),
            )
        })
}

// ════════════════════════════════════════════════════════════════════════════════
// Query Handlers (GET endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// GET /licenses - Catalogue, optionally filtered by status and type
pub async fn list_licenses(
    State(state): State<LegacyAppState>,
    _user: AuthenticatedUser,
    Query(params): Query<LicenseListParams>,
) -> Result<impl IntoResponse, LicenseApiError> {
    let filter = params.into_filter()?;
    let licenses = state.list_handler().handle(filter).await?;

    let response: Vec<LicenseSummaryResponse> =
        licenses.into_iter().map(LicenseSummaryResponse::from).collect();
    Ok(Json(response))
}

/// GET /licenses/remaining - Number of licenses still for sale
pub async fn get_remaining(
    State(state): State<LegacyAppState>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, LicenseApiError> {
    let remaining = state.remaining_handler().handle().await?;
    Ok(Json(RemainingResponse { remaining }))
}

/// GET /licenses/statistics - Catalogue and revenue figures (admin only)
pub async fn get_statistics(
    State(state): State<LegacyAppState>,
    _admin: AdminUser,
) -> Result<impl IntoResponse, LicenseApiError> {
    let stats = state.statistics_handler().handle().await?;
    Ok(Json(LicenseStatisticsResponse::from(stats)))
}

/// GET /licenses/:id - One license in full
pub async fn get_license(
    State(state): State<LegacyAppState>,
    _user: AuthenticatedUser,
    Path(license_id): Path<LicenseId>,
) -> Result<impl IntoResponse, LicenseApiError> {
    let view = state
        .get_license_handler()
        .handle(GetLicenseQuery { license_id })
        .await?;
    Ok(Json(LicenseResponse::from(view)))
}

/// GET /purchases/mine - The caller's ledger rows, newest first
pub async fn get_my_purchases(
    State(state): State<LegacyAppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, LicenseApiError> {
    let purchases = state.my_purchases_handler().handle(&user.user_id).await?;
    let response: Vec<PurchaseResponse> =
        purchases.into_iter().map(PurchaseResponse::from).collect();
    Ok(Json(response))
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers (POST endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /licenses - List a new license (admin only)
pub async fn create_license(
    State(state): State<LegacyAppState>,
    admin: AdminUser,
    Json(request): Json<CreateLicenseRequest>,
) -> Result<impl IntoResponse, LicenseApiError> {
    let prices = match (&request.original_price, &request.current_price) {
        (Some(original), Some(current)) => Some((
            parse_price("original_price", original)?,
            parse_price("current_price", current)?,
        )),
        (None, None) => None,
        _ => {
            return Err(LicenseError::validation(
                "current_price",
                "original_price and current_price must be given together",
            )
            .into())
        }
    };

    let cmd = CreateLicenseCommand {
        license_number: request.license_number,
        license_type: request.license_type,
        prices,
        features: request.features,
        expires_at: request.expires_at.map(Timestamp::from_datetime),
        created_by: admin.user_id,
    };
    let result = state.create_license_handler().handle(cmd).await?;

    let response = LicenseResponse::from(LicenseView::from(&result.license));
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /licenses/:id/reserve - Place a hold for the caller
pub async fn reserve_license(
    State(state): State<LegacyAppState>,
    user: AuthenticatedUser,
    Path(license_id): Path<LicenseId>,
) -> Result<impl IntoResponse, LicenseApiError> {
    let cmd = ReserveLicenseCommand {
        license_id,
        user_id: user.user_id,
    };
    let result = state.reserve_handler().handle(cmd).await?;
    Ok(Json(LicenseResponse::from(LicenseView::from(&result.license))))
}

/// POST /licenses/:id/release - Return the caller's hold to sale
pub async fn release_license(
    State(state): State<LegacyAppState>,
    user: AuthenticatedUser,
    Path(license_id): Path<LicenseId>,
) -> Result<impl IntoResponse, LicenseApiError> {
    let cmd = ReleaseLicenseCommand {
        license_id,
        user_id: user.user_id,
    };
    let result = state.release_handler().handle(cmd).await?;
    Ok(Json(LicenseResponse::from(LicenseView::from(&result.license))))
}

/// POST /licenses/:id/purchase - Complete a sale and write the ledger row
pub async fn purchase_license(
    State(state): State<LegacyAppState>,
    user: AuthenticatedUser,
    Path(license_id): Path<LicenseId>,
    Json(request): Json<PurchaseRequest>,
) -> Result<impl IntoResponse, LicenseApiError> {
    let cmd = PurchaseLicenseCommand {
        license_id,
        user_id: user.user_id,
        payment_method: request.payment_method,
        transaction_id: request.transaction_id,
    };
    let result = state.purchase_handler().handle(cmd).await?;

    let response = PurchaseResultResponse {
        license: LicenseResponse::from(LicenseView::from(&result.license)),
        purchase: PurchaseResponse::from(PurchaseView::from(&result.purchase)),
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /licenses/discount - Reprice a batch of licenses (admin only)
pub async fn apply_discount(
    State(state): State<LegacyAppState>,
    admin: AdminUser,
    Json(request): Json<DiscountRequest>,
) -> Result<impl IntoResponse, LicenseApiError> {
    let percentage = request.percentage_input();
    let cmd = ApplyDiscountCommand {
        license_ids: request.license_ids,
        percentage,
        applied_by: admin.user_id,
    };
    let result = state.discount_handler().handle(cmd).await?;

    let licenses: Vec<LicenseSummaryResponse> = result
        .licenses
        .iter()
        .map(|l| LicenseSummaryResponse::from(LicenseSummary::from(l)))
        .collect();
    Ok(Json(DiscountResponse {
        percent_off: result.percent_off.value(),
        updated: licenses.len(),
        licenses,
    }))
}

/// POST /licenses/:id/expire - Withdraw a license from sale (admin only)
pub async fn expire_license(
    State(state): State<LegacyAppState>,
    admin: AdminUser,
    Path(license_id): Path<LicenseId>,
) -> Result<impl IntoResponse, LicenseApiError> {
    let cmd = ExpireLicenseCommand {
        license_id,
        expired_by: admin.user_id,
    };
    let result = state.expire_handler().handle(cmd).await?;
    Ok(Json(LicenseResponse::from(LicenseView::from(&result.license))))
}

/// POST /licenses/:id/force-available - Reset any license to sale (admin only)
pub async fn force_available(
    State(state): State<LegacyAppState>,
    admin: AdminUser,
    Path(license_id): Path<LicenseId>,
) -> Result<impl IntoResponse, LicenseApiError> {
    let cmd = ForceAvailableCommand {
        license_id,
        reset_by: admin.user_id,
    };
    let result = state.force_available_handler().handle(cmd).await?;
    Ok(Json(LicenseResponse::from(LicenseView::from(&result.license))))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts license errors to HTTP responses.
#[derive(Debug)]
pub struct LicenseApiError(LicenseError);

impl From<LicenseError> for LicenseApiError {
    fn from(err: LicenseError) -> Self {
        Self(err)
    }
}

impl From<DomainError> for LicenseApiError {
    fn from(err: DomainError) -> Self {
        Self(LicenseError::from(err))
    }
}

impl IntoResponse for LicenseApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_code) = match &self.0 {
            LicenseError::NotFound(_) => (StatusCode::NOT_FOUND, "LICENSE_NOT_FOUND"),
            LicenseError::NotAvailable { .. } => (StatusCode::CONFLICT, "LICENSE_NOT_AVAILABLE"),
            LicenseError::DuplicateNumber(_) => (StatusCode::CONFLICT, "DUPLICATE_LICENSE_NUMBER"),
            LicenseError::InvalidDiscount(_) => (StatusCode::BAD_REQUEST, "INVALID_DISCOUNT"),
            LicenseError::ValidationFailed { .. } => (StatusCode::BAD_REQUEST, "VALIDATION_FAILED"),
            LicenseError::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            LicenseError::Infrastructure(detail) => {
                tracing::error!(error = %detail, "License request failed");
                let body = ErrorResponse::new("INTERNAL_ERROR", "An internal error occurred");
                return (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response();
            }
        };

        let body = match &self.0 {
            LicenseError::ValidationFailed { field, .. } => ErrorResponse::with_details(
                error_code,
                self.0.message(),
                serde_json::json!({ "field": field }),
            ),
            _ => ErrorResponse::new(error_code, self.0.message()),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: LicenseError) -> StatusCode {
        LicenseApiError::from(err).into_response().status()
    }

    #[test]
    fn license_errors_map_to_http_statuses() {
        let id = LicenseId::new();
        assert_eq!(status_of(LicenseError::not_found(id)), StatusCode::NOT_FOUND);
        assert_eq!(status_of(LicenseError::not_available(id, None)), StatusCode::CONFLICT);
        assert_eq!(status_of(LicenseError::invalid_discount("x")), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(LicenseError::validation("f", "m")), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(LicenseError::Forbidden), StatusCode::FORBIDDEN);
        assert_eq!(
            status_of(LicenseError::infrastructure("pool timed out")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn domain_errors_become_internal_errors() {
        let err: LicenseApiError = DomainError::database("select", "connection reset").into();
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
