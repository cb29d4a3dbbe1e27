//! Integration tests for the composed HTTP API.
//!
//! Requests go through `api_router` with in-memory adapters, so routing,
//! identity extraction, DTO mapping and error translation are all covered.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use kardiverse::adapters::http::{api_router, LegacyAppState, WakeRoomAppState};
use kardiverse::adapters::{InMemoryEventBus, InMemoryLicenseStore, InMemoryWakeRoomStore};
use kardiverse::config::ServerConfig;

// =============================================================================
// Test Infrastructure
// =============================================================================

struct Api {
    router: Router,
    bus: Arc<InMemoryEventBus>,
    sessions: Arc<InMemoryWakeRoomStore>,
}

impl Api {
    fn new() -> Self {
        let licenses = Arc::new(InMemoryLicenseStore::new());
        let wakeroom = Arc::new(InMemoryWakeRoomStore::new());
        let bus = Arc::new(InMemoryEventBus::new());
        let router = api_router(
            LegacyAppState {
                license_repository: licenses.clone(),
                license_reader: licenses,
                event_publisher: bus.clone(),
            },
            WakeRoomAppState {
                experience_repository: wakeroom.clone(),
                experience_reader: wakeroom.clone(),
                session_repository: wakeroom.clone(),
                session_reader: wakeroom.clone(),
                event_publisher: bus.clone(),
            },
            &ServerConfig::default(),
        );
        Self {
            router,
            bus,
            sessions: wakeroom,
        }
    }

    async fn send(&self, method: &str, uri: &str, user: Option<&str>, admin: bool, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header("X-User-Id", user);
        }
        if admin {
            builder = builder.header("X-User-Role", "admin");
        }
        let request = match body {
            Some(json) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    async fn create_experience(&self) -> String {
        let (status, body) = self
            .send(
                "POST",
                "/api/v1/wakeroom/experiences",
                Some("ops"),
                true,
                Some(json!({ "title": "Garden of Memories", "status": "active" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().unwrap().to_string()
    }

    async fn start_session(&self, experience_id: &str, user: &str) -> String {
        let (status, body) = self
            .send(
                "POST",
                "/api/v1/wakeroom/sessions",
                Some(user),
                false,
                Some(json!({ "experience_id": experience_id, "device_type": "mobile", "browser_info": "Safari 17" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().unwrap().to_string()
    }
}

// =============================================================================
// WakeRoom sessions
// =============================================================================

#[tokio::test]
async fn session_ends_exactly_once() {
    let api = Api::new();
    let experience_id = api.create_experience().await;
    let session_id = api.start_session(&experience_id, "visitor").await;
    let end_uri = format!("/api/v1/wakeroom/sessions/{}/end", session_id);

    let (first, ended) = api
        .send(
            "POST",
            &end_uri,
            Some("visitor"),
            false,
            Some(json!({ "interactions_count": 4, "completed_milestones": ["intro"], "rating": 4 })),
        )
        .await;
    let (second, conflict) = api.send("POST", &end_uri, Some("visitor"), false, Some(json!({}))).await;

    assert_eq!(first, StatusCode::OK);
    assert_eq!(ended["is_active"], false);
    assert_eq!(ended["interactions_count"], 4);
    assert_eq!(ended["rating_label"], "Very Good");
    assert!(ended["duration_seconds"].as_u64().is_some());
    assert_eq!(second, StatusCode::CONFLICT);
    assert_eq!(conflict["code"], "SESSION_ALREADY_ENDED");

    let (_, view) = api
        .send("GET", &format!("/api/v1/wakeroom/sessions/{}", session_id), Some("visitor"), false, None)
        .await;
    assert_eq!(view["duration_seconds"], ended["duration_seconds"]);
    assert_eq!(api.bus.events_of_type("wakeroom.session_ended.v1").len(), 1);
}

#[tokio::test]
async fn out_of_range_rating_leaves_session_active() {
    let api = Api::new();
    let experience_id = api.create_experience().await;
    let session_id = api.start_session(&experience_id, "visitor").await;

    let (status, body) = api
        .send(
            "POST",
            &format!("/api/v1/wakeroom/sessions/{}/end", session_id),
            Some("visitor"),
            false,
            Some(json!({ "rating": 7 })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
    assert_eq!(body["details"]["field"], "rating");
    let (_, view) = api
        .send("GET", &format!("/api/v1/wakeroom/sessions/{}", session_id), Some("visitor"), false, None)
        .await;
    assert_eq!(view["is_active"], true);
    assert_eq!(view["duration_display"], "Active");
}

#[tokio::test]
async fn session_statistics_count_active_and_completed() {
    let api = Api::new();
    let experience_id = api.create_experience().await;
    let first = api.start_session(&experience_id, "visitor").await;
    api.start_session(&experience_id, "visitor").await;
    api.send(
        "POST",
        &format!("/api/v1/wakeroom/sessions/{}/end", first),
        Some("visitor"),
        false,
        None,
    )
    .await;

    let (status, stats) = api
        .send("GET", "/api/v1/wakeroom/sessions/statistics", Some("ops"), true, None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_sessions"], 2);
    assert_eq!(stats["active_sessions"], 1);
    assert_eq!(stats["completed_sessions"], 1);
    assert_eq!(api.sessions.session_count().await, 2);
}

// =============================================================================
// Identity and roles
// =============================================================================

#[tokio::test]
async fn missing_identity_is_unauthorized() {
    let api = Api::new();

    let (licenses, body) = api.send("GET", "/api/v1/legacy/licenses", None, false, None).await;
    let (sessions, _) = api
        .send("POST", "/api/v1/wakeroom/sessions", None, false, Some(json!({})))
        .await;

    assert_eq!(licenses, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
    assert_eq!(sessions, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_endpoints_reject_regular_users() {
    let api = Api::new();

    let (discount, _) = api
        .send(
            "POST",
            "/api/v1/legacy/licenses/discount",
            Some("alice"),
            false,
            Some(json!({ "license_ids": [], "percentage": "10" })),
        )
        .await;
    let (create, _) = api
        .send(
            "POST",
            "/api/v1/legacy/licenses",
            Some("alice"),
            false,
            Some(json!({ "license_number": 1 })),
        )
        .await;
    let (stats, _) = api
        .send("GET", "/api/v1/legacy/licenses/statistics", Some("alice"), false, None)
        .await;

    assert_eq!(discount, StatusCode::FORBIDDEN);
    assert_eq!(create, StatusCode::FORBIDDEN);
    assert_eq!(stats, StatusCode::FORBIDDEN);
}

// =============================================================================
// Legacy licenses end to end
// =============================================================================

#[tokio::test]
async fn license_sale_through_the_api() {
    let api = Api::new();
    let (created, license) = api
        .send(
            "POST",
            "/api/v1/legacy/licenses",
            Some("ops"),
            true,
            Some(json!({ "license_number": 42, "features": ["Timeline", "WakeRoom"] })),
        )
        .await;
    assert_eq!(created, StatusCode::CREATED);
    assert_eq!(license["price_display"], "$1999.00 ($2999.00)");
    assert_eq!(license["features_display"], "Timeline, WakeRoom");
    let id = license["id"].as_str().unwrap().to_string();

    let (_, remaining) = api
        .send("GET", "/api/v1/legacy/licenses/remaining", Some("alice"), false, None)
        .await;
    assert_eq!(remaining["remaining"], 1);

    let (bought, sale) = api
        .send(
            "POST",
            &format!("/api/v1/legacy/licenses/{}/purchase", id),
            Some("alice"),
            false,
            Some(json!({ "payment_method": "card", "transaction_id": "tx_42" })),
        )
        .await;
    assert_eq!(bought, StatusCode::CREATED);
    assert_eq!(sale["purchase"]["license_number"], 42);

    let (again, _) = api
        .send(
            "POST",
            &format!("/api/v1/legacy/licenses/{}/purchase", id),
            Some("bob"),
            false,
            Some(json!({ "payment_method": "card", "transaction_id": "tx_43" })),
        )
        .await;
    assert_eq!(again, StatusCode::CONFLICT);

    let (_, mine) = api
        .send("GET", "/api/v1/legacy/purchases/mine", Some("alice"), false, None)
        .await;
    assert_eq!(mine.as_array().map(Vec::len), Some(1));

    let (_, stats) = api
        .send("GET", "/api/v1/legacy/licenses/statistics", Some("ops"), true, None)
        .await;
    assert_eq!(stats["sold"], 1);
    assert_eq!(stats["total_revenue"], "1999.00");
    assert_eq!(stats["average_price"], "1999.00");

    let (_, sold_only) = api
        .send("GET", "/api/v1/legacy/licenses?status=sold", Some("alice"), false, None)
        .await;
    assert_eq!(sold_only.as_array().map(Vec::len), Some(1));
}
