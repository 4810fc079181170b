//! Relay WebSocket route configuration
//!
//! # Endpoint
//!
//! `GET /ws` - WebSocket upgrade for one relayed call
//!
//! # Protocol
//!
//! After the upgrade, the connection is bridged frame-for-frame to the
//! resolved Vapi session: binary stays binary, text stays text, order within
//! each direction is preserved. Query parameters are forwarded to the
//! endpoint resolver as session metadata; `call_id` (or `callSid`)
//! correlates the session's log lines.
//!
//! A non-upgrade HTTP request to this path receives 426 Upgrade Required.

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::handlers::ws_handler;
use crate::state::AppState;
use std::sync::Arc;

/// Create the relay WebSocket router
pub fn create_ws_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
}
