//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/timer", get(timer_handler))
        .route("/timer/start", post(start_handler))
        .route("/timer/start-remaining", post(start_remaining_handler))
        .route("/timer/pause", post(pause_handler))
        .route("/timer/reset", post(reset_handler))
        .route("/timer/rotate", post(rotate_handler))
        .route("/state", get(state_handler))
        .route("/settings", put(settings_handler))
        .route("/mobbers", post(add_mobber_handler))
        .route("/mobbers/shuffle", post(shuffle_mobbers_handler))
        .route("/mobbers/:id", put(update_mobber_handler).delete(remove_mobber_handler))
        .route("/clipboard", get(clipboard_handler).post(record_clipboard_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    use crate::services::StateStore;

    fn test_state() -> Arc<AppState> {
        Arc::new(AppState::new(
            0,
            "127.0.0.1".to_string(),
            StateStore::new("unused.json"),
        ))
    }

    async fn send(
        state: &Arc<AppState>,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        let response = create_router(Arc::clone(state))
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn health_endpoint_is_ok() {
        let state = test_state();
        let (status, body) = send(&state, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn start_and_pause_drive_the_phase() {
        let state = test_state();

        let (status, body) = send(&state, Method::POST, "/timer/start", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["timer"]["phase"], "running");

        state.tick().unwrap();
        let (_, body) = send(&state, Method::POST, "/timer/pause", None).await;
        assert_eq!(body["timer"]["phase"], "pausedMidTurn");
        assert_eq!(body["timer"]["timeRemaining"], "09:59");

        let (_, body) = send(&state, Method::GET, "/timer", None).await;
        assert_eq!(body["last_action"], "pause");
    }

    #[tokio::test]
    async fn mobbers_can_be_added_updated_and_removed() {
        let state = test_state();

        let (status, body) =
            send(&state, Method::POST, "/mobbers", Some(json!({ "name": "ada" }))).await;
        assert_eq!(status, StatusCode::OK);
        let id = body["mobbers"][0]["id"].as_str().unwrap().to_string();

        let (status, body) = send(
            &state,
            Method::PUT,
            &format!("/mobbers/{}", id),
            Some(json!({ "name": "Ada" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["mobbers"][0]["name"], "Ada");
        assert_eq!(body["mobbers"][0]["disabled"], false);

        let (status, body) =
            send(&state, Method::DELETE, &format!("/mobbers/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["mobbers"], json!([]));
    }

    #[tokio::test]
    async fn unknown_mobbers_are_not_found() {
        let state = test_state();
        let (status, _) = send(&state, Method::DELETE, "/mobbers/missing", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &state,
            Method::PUT,
            "/mobbers/missing",
            Some(json!({ "disabled": true })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn blank_names_are_rejected() {
        let state = test_state();
        let (status, _) =
            send(&state, Method::POST, "/mobbers", Some(json!({ "name": "  " }))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn settings_update_applies_present_fields() {
        let state = test_state();
        let (status, body) = send(
            &state,
            Method::PUT,
            "/settings",
            Some(json!({
                "secondsPerTurn": 300,
                "alertSound": "horn.mp3",
                "numberOfItemsClipboardHistoryStores": 0
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["secondsPerTurn"], 300);
        assert_eq!(body["secondsRemaining"], 300);
        assert_eq!(body["alertSound"], "horn.mp3");
        assert_eq!(body["numberOfItemsClipboardHistoryStores"], 1);
        assert_eq!(body["snapThreshold"], 25);

        let (_, body) = send(&state, Method::PUT, "/settings", Some(json!({ "alertSound": "" }))).await;
        assert_eq!(body["alertSound"], Value::Null);
    }

    #[tokio::test]
    async fn rotate_moves_to_next_mobber() {
        let state = test_state();
        for name in ["ada", "bob"] {
            send(&state, Method::POST, "/mobbers", Some(json!({ "name": name }))).await;
        }

        let (_, body) = send(&state, Method::POST, "/timer/rotate", None).await;
        assert_eq!(body["timer"]["current"]["name"], "bob");
        assert_eq!(body["timer"]["next"]["name"], "ada");

        let (_, body) = send(&state, Method::GET, "/state", None).await;
        assert_eq!(body["currentMobber"], 1);
    }

    #[tokio::test]
    async fn clipboard_entries_are_recorded() {
        let state = test_state();
        send(&state, Method::POST, "/clipboard", Some(json!({ "text": "fn main() {}" }))).await;
        let (status, body) = send(&state, Method::GET, "/clipboard", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["entries"], json!(["fn main() {}"]));
    }

    #[tokio::test]
    async fn clipboard_history_is_bounded_by_settings() {
        let state = test_state();
        send(
            &state,
            Method::PUT,
            "/settings",
            Some(json!({ "numberOfItemsClipboardHistoryStores": 2 })),
        )
        .await;
        for text in ["one", "two", "three"] {
            send(&state, Method::POST, "/clipboard", Some(json!({ "text": text }))).await;
        }

        let (_, body) = send(&state, Method::GET, "/clipboard", None).await;
        assert_eq!(body["entries"], json!(["two", "three"]));
    }
}
