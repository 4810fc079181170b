//! Server startup tests
//!
//! Verifies the routers assemble and answer correctly without any live
//! upstream: service identity, liveness, and the 426 contract on the
//! WebSocket path.

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use tower::util::ServiceExt;

use vapi_bridge::{RelayConfig, routes, state::AppState};

/// Helper function to create a minimal test configuration
fn create_minimal_config() -> RelayConfig {
    RelayConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        vapi_base_url: "https://api.vapi.ai".to_string(),
        vapi_api_key: None,
        echo_mode: false,
    }
}

fn test_app() -> axum::Router {
    let app_state = AppState::new(create_minimal_config()).expect("state");
    routes::create_router().with_state(app_state)
}

async fn body_json(body: Body) -> serde_json::Value {
    let bytes = to_bytes(body, 64 * 1024).await.expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn root_reports_service_identity() {
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = test_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response.into_body()).await;
    assert_eq!(body["service"], "vapi-bridge");
    assert_eq!(body["ws_path"], "/ws");
}

#[tokio::test]
async fn healthz_reports_ok() {
    let request = Request::builder().uri("/healthz").body(Body::empty()).unwrap();
    let response = test_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
}

/// A plain HTTP request to the WebSocket path must get 426 with the upgrade
/// headers set, not a rejection page.
#[tokio::test]
async fn plain_http_request_to_ws_path_gets_426() {
    let request = Request::builder().uri("/ws").body(Body::empty()).unwrap();
    let response = test_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UPGRADE_REQUIRED);
    assert_eq!(response.headers().get(header::UPGRADE).unwrap(), "websocket");
    assert_eq!(
        response.headers().get(header::CONNECTION).unwrap(),
        "Upgrade"
    );
}

#[tokio::test]
async fn unknown_path_is_not_found() {
    let request = Request::builder().uri("/nope").body(Body::empty()).unwrap();
    let response = test_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
