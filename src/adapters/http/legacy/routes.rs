//! Axum router configuration for legacy license endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    apply_discount, create_license, expire_license, force_available, get_license,
    get_my_purchases, get_remaining, get_statistics, list_licenses, purchase_license,
    release_license, reserve_license, LegacyAppState,
};

/// Create the legacy license router, mounted at `/api/v1/legacy`.
///
/// # Routes
///
/// ## User Endpoints (require `X-User-Id`)
/// - `GET /licenses` - Catalogue, filterable by `status` and `license_type`
/// - `GET /licenses/remaining` - Count of available licenses
/// - `GET /licenses/:id` - License detail
/// - `POST /licenses/:id/reserve` - Place a hold
/// - `POST /licenses/:id/release` - Return a hold
/// - `POST /licenses/:id/purchase` - Buy
/// - `GET /purchases/mine` - Caller's purchase history
///
/// ## Admin Endpoints (require `X-User-Role: admin`)
/// - `POST /licenses` - Create a license
/// - `GET /licenses/statistics` - Sales figures
/// - `POST /licenses/discount` - Reprice a batch
/// - `POST /licenses/:id/expire` - Withdraw from sale
/// - `POST /licenses/:id/force-available` - Reset to available
pub fn legacy_routes() -> Router<LegacyAppState> {
    Router::new()
        .route("/licenses", get(list_licenses).post(create_license))
        .route("/licenses/remaining", get(get_remaining))
        .route("/licenses/statistics", get(get_statistics))
        .route("/licenses/discount", post(apply_discount))
        .route("/licenses/:id", get(get_license))
        .route("/licenses/:id/reserve", post(reserve_license))
        .route("/licenses/:id/release", post(release_license))
        .route("/licenses/:id/purchase", post(purchase_license))
        .route("/licenses/:id/expire", post(expire_license))
        .route("/licenses/:id/force-available", post(force_available))
        .route("/purchases/mine", get(get_my_purchases))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::adapters::events::InMemoryEventBus;
    use crate::adapters::memory::InMemoryLicenseStore;
    use crate::domain::foundation::Timestamp;
    use crate::domain::legacy::{License, LicenseNumber};
    use crate::ports::LicenseRepository;

    async fn app_with_license() -> (Router, License) {
        let store = Arc::new(InMemoryLicenseStore::new());
        let license = License::new(LicenseNumber::try_new(7).unwrap(), Timestamp::now());
        store.save(&license).await.unwrap();

        let state = LegacyAppState {
            license_repository: store.clone(),
            license_reader: store,
            event_publisher: Arc::new(InMemoryEventBus::new()),
        };
        (legacy_routes().with_state(state), license)
    }

    fn request(method: &str, uri: &str, user: Option<&str>, admin: bool, body: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header("X-User-Id", user);
        }
        if admin {
            builder = builder.header("X-User-Role", "admin");
        }
        match body {
            Some(json) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn remaining_requires_identity() {
        let (app, _) = app_with_license().await;

        let response = app
            .oneshot(request("GET", "/licenses/remaining", None, false, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn remaining_counts_available_licenses() {
        let (app, _) = app_with_license().await;

        let response = app
            .oneshot(request("GET", "/licenses/remaining", Some("alice"), false, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["remaining"], 1);
    }

    #[tokio::test]
    async fn second_reservation_conflicts() {
        let (app, license) = app_with_license().await;
        let uri = format!("/licenses/{}/reserve", license.id);

        let first = app
            .clone()
            .oneshot(request("POST", &uri, Some("alice"), false, None))
            .await
            .unwrap();
        let second = app
            .oneshot(request("POST", &uri, Some("bob"), false, None))
            .await
            .unwrap();

        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(second.status(), StatusCode::CONFLICT);
        assert_eq!(json_body(second).await["code"], "LICENSE_NOT_AVAILABLE");
    }

    #[tokio::test]
    async fn purchase_returns_license_and_ledger_row() {
        let (app, license) = app_with_license().await;
        let uri = format!("/licenses/{}/purchase", license.id);

        let response = app
            .oneshot(request(
                "POST",
                &uri,
                Some("alice"),
                false,
                Some(r#"{"payment_method":"card","transaction_id":"tx_1"}"#),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        assert_eq!(body["license"]["status"], "sold");
        assert_eq!(body["purchase"]["amount_paid"], "1999.00");
        assert_eq!(body["purchase"]["purchaser"], "alice");
    }

    #[tokio::test]
    async fn discount_requires_admin_role() {
        let (app, license) = app_with_license().await;
        let body = format!(r#"{{"license_ids":["{}"],"percentage":"10"}}"#, license.id);

        let response = app
            .oneshot(request("POST", "/licenses/discount", Some("alice"), false, Some(&body)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn invalid_discount_returns_operator_message() {
        let (app, license) = app_with_license().await;
        let body = format!(r#"{{"license_ids":["{}"],"percentage":"abc"}}"#, license.id);

        let response = app
            .oneshot(request("POST", "/licenses/discount", Some("ops"), true, Some(&body)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["code"], "INVALID_DISCOUNT");
        assert_eq!(
            body["message"],
            "Invalid discount percentage. Please enter a valid number."
        );
    }

    #[tokio::test]
    async fn admin_discount_reprices_from_original() {
        let (app, license) = app_with_license().await;
        let body = format!(r#"{{"license_ids":["{}"],"percentage":50}}"#, license.id);

        let response = app
            .oneshot(request("POST", "/licenses/discount", Some("ops"), true, Some(&body)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["percent_off"], 50);
        assert_eq!(body["updated"], 1);
        assert_eq!(body["licenses"][0]["current_price"], "1499.50");
    }

    #[tokio::test]
    async fn unknown_license_is_not_found() {
        let (app, _) = app_with_license().await;
        let uri = format!("/licenses/{}", crate::domain::foundation::LicenseId::new());

        let response = app
            .oneshot(request("GET", &uri, Some("alice"), false, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn bad_status_filter_is_rejected() {
        let (app, _) = app_with_license().await;

        let response = app
            .oneshot(request("GET", "/licenses?status=lost", Some("alice"), false, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn admin_creates_license_with_custom_prices() {
        let (app, _) = app_with_license().await;

        let response = app
            .oneshot(request(
                "POST",
                "/licenses",
                Some("ops"),
                true,
                Some(r#"{"license_number":8,"license_type":"PREMIUM","original_price":"4999","current_price":"3999.50"}"#),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        assert_eq!(body["license_type"], "PREMIUM");
        assert_eq!(body["original_price"], "4999.00");
        assert_eq!(body["current_price"], "3999.50");
        assert_eq!(body["is_discounted"], true);
    }

    #[tokio::test]
    async fn price_above_ceiling_is_rejected() {
        let (app, _) = app_with_license().await;

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/licenses",
                Some("ops"),
                true,
                Some(r#"{"license_number":8,"original_price":"90000000000000000","current_price":"0"}"#),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["code"], "VALIDATION_FAILED");
        assert_eq!(body["details"]["field"], "original_price");

        let response = app
            .oneshot(request(
                "POST",
                "/licenses",
                Some("ops"),
                true,
                Some(r#"{"license_number":8,"original_price":"99999999.99","current_price":"49999999.99"}"#),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        assert_eq!(body["original_price"], "99999999.99");
        assert_eq!(body["discount_percentage"], 50);
    }

    #[tokio::test]
    async fn duplicate_license_number_conflicts() {
        let (app, _) = app_with_license().await;

        let response = app
            .oneshot(request("POST", "/licenses", Some("ops"), true, Some(r#"{"license_number":7}"#)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
