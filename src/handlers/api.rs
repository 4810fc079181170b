//! Service identity and liveness handlers.

use axum::Json;
use serde_json::{Value, json};

/// Service name reported by the root endpoint.
pub const SERVICE_NAME: &str = "vapi-bridge";

/// Path of the WebSocket relay endpoint.
pub const WS_PATH: &str = "/ws";

/// Liveness probe. Always healthy while the process serves requests.
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Static service-identity metadata for the root path.
pub async fn service_info() -> Json<Value> {
    Json(json!({ "service": SERVICE_NAME, "ws_path": WS_PATH }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn health_check_reports_ok() {
        let Json(body) = health_check().await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn service_info_names_the_ws_path() {
        let Json(body) = service_info().await;
        assert_eq!(body["service"], SERVICE_NAME);
        assert_eq!(body["ws_path"], WS_PATH);
    }
}
