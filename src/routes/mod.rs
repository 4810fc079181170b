//! Route configuration

pub mod api;
pub mod ws;

use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

/// Assemble the full application router: identity/liveness plus the relay
/// WebSocket endpoint.
pub fn create_router() -> Router<Arc<AppState>> {
    api::create_api_router().merge(ws::create_ws_router())
}
