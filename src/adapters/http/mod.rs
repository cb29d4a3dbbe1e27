//! HTTP adapters - REST API implementations.
//!
//! Each domain module has its own HTTP adapter; `api_router` mounts them
//! under `/api/v1` with the shared tower layers.

pub mod error;
pub mod legacy;
pub mod middleware;
pub mod wakeroom;

use axum::http::{header, HeaderName, HeaderValue, Method};
use axum::routing::get;
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

pub use legacy::{legacy_routes, LegacyAppState};
pub use wakeroom::{wakeroom_routes, WakeRoomAppState};

/// Builds the complete API router.
///
/// ```text
/// GET  /health
/// /api/v1/legacy/...    license endpoints
/// /api/v1/wakeroom/...  experience and session endpoints
/// ```
pub fn api_router(
    legacy_state: LegacyAppState,
    wakeroom_state: WakeRoomAppState,
    server: &ServerConfig,
) -> Router {
    let api = Router::new()
        .nest("/legacy", legacy_routes().with_state(legacy_state))
        .nest("/wakeroom", wakeroom_routes().with_state(wakeroom_state));

    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api)
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(cors_layer(&server.cors_origins_list()))
        .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// CORS for the configured origins; `*` or an empty list allows any origin.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-user-id"),
            HeaderName::from_static("x-user-role"),
        ]);

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    layer.allow_origin(allowed)
}
