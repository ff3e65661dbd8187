//! API module
//!
//! HTTP routes: greeting, health check, registry inspection and the
//! WebSocket endpoint.

pub mod agents;

use crate::state::AppState;
use crate::websocket;
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

#[derive(Serialize)]
struct HelloResponse {
    message: String,
    status: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    agents: usize,
}

/// Build the application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(hello_world))
        .route("/api/health", get(health_check))
        .route("/api/agents", get(agents::list_agents))
        .route("/api/agents/:id", get(agents::get_agent))
        .route("/api/agents/:id/fov", get(agents::get_agent_fov))
        // WebSocket for live tracking
        .route("/ws", get(websocket::websocket_handler))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn hello_world() -> Json<HelloResponse> {
    Json(HelloResponse {
        message: "Hello from the FOV server!".to_string(),
        status: "ok".to_string(),
    })
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        agents: state.registry.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FovConfig;
    use crate::session::ConnectionHandle;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn create_test_app() -> (Router, AppState) {
        let state = AppState::new(FovConfig::default());
        (create_router(state.clone()), state)
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_hello_world() {
        let (app, _) = create_test_app();
        let (status, json) = get_json(app, "/").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn test_health_check() {
        let (app, state) = create_test_app();
        crate::state::landmarks::seed(&state.registry).unwrap();

        let (status, json) = get_json(app, "/api/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["agents"], 4);
    }

    #[tokio::test]
    async fn test_list_agents() {
        let (app, state) = create_test_app();
        let (handle, _rx) = ConnectionHandle::channel();
        state.registry.create("b".to_string(), handle.clone()).unwrap();
        state.registry.create("a".to_string(), handle).unwrap();
        state.registry.update_position("a", 10.0, 20.0).unwrap();

        let (status, json) = get_json(app, "/api/agents").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["count"], 2);
        assert_eq!(json["agents"][0]["id"], "a");
        assert_eq!(json["agents"][0]["latitude"], 10.0);
        assert_eq!(json["agents"][1]["id"], "b");
    }

    #[tokio::test]
    async fn test_get_agent_not_found() {
        let (app, _) = create_test_app();
        let (status, json) = get_json(app, "/api/agents/ghost").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["status"], 404);
    }

    #[tokio::test]
    async fn test_agent_fov_diagnostic() {
        let (app, state) = create_test_app();
        crate::state::landmarks::seed(&state.registry).unwrap();
        let (handle, _rx) = ConnectionHandle::channel();
        state.registry.create("A".to_string(), handle).unwrap();
        state.registry.update_position("A", 50.859528, 4.645805).unwrap();

        let (status, json) = get_json(app.clone(), "/api/agents/A/fov").await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["sector"].is_null());
        assert_eq!(json["visible"], serde_json::json!([]));

        state.registry.update_heading("A", 90.0).unwrap();
        let (status, json) = get_json(app.clone(), "/api/agents/A/fov").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["sector"]["lowerBound"], 67.5);
        assert_eq!(json["sector"]["upperBound"], 112.5);
        assert_eq!(json["sector"]["span"], 45.0);
        assert_eq!(json["sector"]["outline"].as_array().unwrap().len(), 35);
        assert_eq!(json["visible"][0]["id"], "Oosten");

        let (status, _) = get_json(app, "/api/agents/ghost/fov").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_get_agent_success() {
        let (app, state) = create_test_app();
        crate::state::landmarks::seed(&state.registry).unwrap();

        let (status, json) = get_json(app, "/api/agents/Oosten").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["id"], "Oosten");
        assert_eq!(json["longitude"], 5.645805);
    }
}
