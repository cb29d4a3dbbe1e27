//! Axum router configuration for WakeRoom endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    create_experience, end_session, get_experience, get_my_sessions, get_session,
    get_session_statistics, list_experiences, start_session, WakeRoomAppState,
};

/// Create the WakeRoom router, mounted at `/api/v1/wakeroom`.
///
/// # Routes
/// - `POST /experiences` - Create an experience (admin)
/// - `GET /experiences` - Catalogue (`status`, `experience_type`, `is_featured`)
/// - `GET /experiences/:id` - Experience detail
/// - `POST /sessions` - Start a session
/// - `GET /sessions/mine` - Caller's session history
/// - `GET /sessions/statistics` - Session figures (admin)
/// - `GET /sessions/:id` - Caller's session
/// - `POST /sessions/:id/end` - End the caller's session
pub fn wakeroom_routes() -> Router<WakeRoomAppState> {
    Router::new()
        .route("/experiences", post(create_experience).get(list_experiences))
        .route("/experiences/:id", get(get_experience))
        .route("/sessions", post(start_session))
        .route("/sessions/mine", get(get_my_sessions))
        .route("/sessions/statistics", get(get_session_statistics))
        .route("/sessions/:id", get(get_session))
        .route("/sessions/:id/end", post(end_session))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::adapters::events::InMemoryEventBus;
    use crate::adapters::memory::InMemoryWakeRoomStore;
    use crate::domain::foundation::Timestamp;
    use crate::domain::wakeroom::{ExperienceStatus, ExperienceType, WakeRoomExperience};
    use crate::ports::ExperienceRepository;

    async fn app_with_experience() -> (Router, WakeRoomExperience) {
        let store = Arc::new(InMemoryWakeRoomStore::new());
        let mut experience =
            WakeRoomExperience::new("Garden of Memories", ExperienceType::AugmentedReality, Timestamp::now())
                .unwrap();
        experience.status = ExperienceStatus::Active;
        ExperienceRepository::save(store.as_ref(), &experience).await.unwrap();

        let state = WakeRoomAppState {
            experience_repository: store.clone(),
            experience_reader: store.clone(),
            session_repository: store.clone(),
            session_reader: store,
            event_publisher: Arc::new(InMemoryEventBus::new()),
        };
        (wakeroom_routes().with_state(state), experience)
    }

    fn post_json(uri: &str, user: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("X-User-Id", user)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn start(app: &Router, experience: &WakeRoomExperience, user: &str) -> String {
        let body = format!(r#"{{"experience_id":"{}","device_type":"mobile"}}"#, experience.id);
        let response = app
            .clone()
            .oneshot(post_json("/sessions", user, &body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        json_body(response).await["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn started_session_is_active() {
        let (app, experience) = app_with_experience().await;
        let body = format!(r#"{{"experience_id":"{}","device_type":"mobile"}}"#, experience.id);

        let response = app.oneshot(post_json("/sessions", "visitor", &body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        assert_eq!(body["is_active"], true);
        assert_eq!(body["duration_display"], "Active");
        assert_eq!(body["memorial_id"], serde_json::Value::Null);
    }

    #[tokio::test]
    async fn unknown_experience_is_not_found() {
        let (app, _) = app_with_experience().await;
        let body = format!(
            r#"{{"experience_id":"{}"}}"#,
            crate::domain::foundation::ExperienceId::new()
        );

        let response = app.oneshot(post_json("/sessions", "visitor", &body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn ending_twice_conflicts() {
        let (app, experience) = app_with_experience().await;
        let id = start(&app, &experience, "visitor").await;
        let uri = format!("/sessions/{}/end", id);

        let first = app
            .clone()
            .oneshot(post_json(&uri, "visitor", r#"{"rating":5,"interactions_count":3}"#))
            .await
            .unwrap();
        let second = app.oneshot(post_json(&uri, "visitor", "{}")).await.unwrap();

        assert_eq!(first.status(), StatusCode::OK);
        let body = json_body(first).await;
        assert_eq!(body["is_active"], false);
        assert_eq!(body["rating"], 5);
        assert_eq!(body["rating_label"], "Excellent");
        assert_eq!(second.status(), StatusCode::CONFLICT);
        assert_eq!(json_body(second).await["code"], "SESSION_ALREADY_ENDED");
    }

    #[tokio::test]
    async fn out_of_range_rating_is_rejected() {
        let (app, experience) = app_with_experience().await;
        let id = start(&app, &experience, "visitor").await;
        let uri = format!("/sessions/{}/end", id);

        let response = app
            .clone()
            .oneshot(post_json(&uri, "visitor", r#"{"rating":7}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let view = app
            .oneshot(
                Request::builder()
                    .uri(format!("/sessions/{}", id))
                    .header("X-User-Id", "visitor")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(json_body(view).await["is_active"], true);
    }

    #[tokio::test]
    async fn other_users_cannot_end_or_view_a_session() {
        let (app, experience) = app_with_experience().await;
        let id = start(&app, &experience, "visitor").await;

        let end = app
            .clone()
            .oneshot(post_json(&format!("/sessions/{}/end", id), "intruder", "{}"))
            .await
            .unwrap();
        let view = app
            .oneshot(
                Request::builder()
                    .uri(format!("/sessions/{}", id))
                    .header("X-User-Id", "intruder")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(end.status(), StatusCode::NOT_FOUND);
        assert_eq!(view.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn statistics_require_admin() {
        let (app, _) = app_with_experience().await;
        let request = |admin: bool| {
            let mut builder = Request::builder()
                .uri("/sessions/statistics")
                .header("X-User-Id", "ops");
            if admin {
                builder = builder.header("X-User-Role", "admin");
            }
            builder.body(Body::empty()).unwrap()
        };

        let denied = app.clone().oneshot(request(false)).await.unwrap();
        let allowed = app.oneshot(request(true)).await.unwrap();

        assert_eq!(denied.status(), StatusCode::FORBIDDEN);
        assert_eq!(allowed.status(), StatusCode::OK);
        assert_eq!(json_body(allowed).await["total_sessions"], 0);
    }

    #[tokio::test]
    async fn admin_creates_experience() {
        let (app, _) = app_with_experience().await;
        let request = Request::builder()
            .method("POST")
            .uri("/experiences")
            .header("X-User-Id", "ops")
            .header("X-User-Role", "admin")
            .header("Content-Type", "application/json")
            .body(Body::from(r#"{"title":"Candle Vigil","experience_type":"VR","duration_minutes":1}"#))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        assert_eq!(body["duration_display"], "1 minute");
        assert_eq!(body["status"], "draft");
    }

    fn get_as(uri: &str, user: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header("X-User-Id", user)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn experience_catalogue_filters_by_status_type_and_featured() {
        let (app, _) = app_with_experience().await;
        let create = |body: &'static str| {
            Request::builder()
                .method("POST")
                .uri("/experiences")
                .header("X-User-Id", "ops")
                .header("X-User-Role", "admin")
                .header("Content-Type", "application/json")
                .body(Body::from(body))
                .unwrap()
        };
        for body in [
            r#"{"title":"Candle Vigil","experience_type":"VR","status":"active","is_featured":true}"#,
            r#"{"title":"Harbour Lights","experience_type":"VR"}"#,
        ] {
            let response = app.clone().oneshot(create(body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        let titles = |body: serde_json::Value| -> Vec<String> {
            body.as_array()
                .unwrap()
                .iter()
                .map(|e| e["title"].as_str().unwrap().to_string())
                .collect()
        };

        let all = app.clone().oneshot(get_as("/experiences", "visitor")).await.unwrap();
        assert_eq!(all.status(), StatusCode::OK);
        assert_eq!(titles(json_body(all).await).len(), 3);

        let featured = app
            .clone()
            .oneshot(get_as("/experiences?status=active&is_featured=true", "visitor"))
            .await
            .unwrap();
        assert_eq!(titles(json_body(featured).await), ["Candle Vigil"]);

        let drafts = app
            .clone()
            .oneshot(get_as("/experiences?experience_type=VR&status=draft", "visitor"))
            .await
            .unwrap();
        assert_eq!(titles(json_body(drafts).await), ["Harbour Lights"]);

        let bad = app
            .oneshot(get_as("/experiences?is_featured=maybe", "visitor"))
            .await
            .unwrap();
        assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(bad).await["details"]["field"], "is_featured");
    }

    #[tokio::test]
    async fn session_history_lists_only_the_callers_sessions() {
        let (app, experience) = app_with_experience().await;
        let first = start(&app, &experience, "visitor").await;
        let second = start(&app, &experience, "visitor").await;
        start(&app, &experience, "someone-else").await;

        let response = app
            .clone()
            .oneshot(get_as("/sessions/mine", "visitor"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        let mut ids: Vec<String> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["id"].as_str().unwrap().to_string())
            .collect();
        ids.sort();
        let mut expected = vec![first, second];
        expected.sort();
        assert_eq!(ids, expected);

        let empty = app.oneshot(get_as("/sessions/mine", "newcomer")).await.unwrap();
        assert_eq!(json_body(empty).await, serde_json::json!([]));
    }
}
