//! WebSocket relay handler
//!
//! Upgrades the inbound connection and hands the socket to the relay
//! session. A plain HTTP request to the WebSocket path answers
//! 426 Upgrade Required with the upgrade headers set, so accidental browser
//! or probe hits never see a stack trace or a rejection page.

use std::sync::Arc;

use axum::extract::ws::WebSocketUpgrade;
use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use http::header::{CONNECTION, UPGRADE};
use tracing::debug;

use crate::relay::{self, SessionParams};
use crate::state::AppState;

/// No cap on message or frame size: the relay passes audio through at
/// whatever size the peers produce, matching the uncapped outbound leg.
const MAX_WS_FRAME_SIZE: usize = usize::MAX;
const MAX_WS_MESSAGE_SIZE: usize = usize::MAX;

/// WebSocket relay handler
///
/// Query parameters are captured verbatim before the upgrade and travel with
/// the session: `call_id`/`callSid` for log correlation, everything for the
/// endpoint resolver's request metadata.
pub async fn ws_handler(
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
    Query(params): Query<SessionParams>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let upgrade = match ws {
        Ok(upgrade) => upgrade,
        Err(rejection) => {
            debug!(reason = %rejection, "non-upgrade request to WebSocket path");
            return upgrade_required();
        }
    };

    upgrade
        .max_frame_size(MAX_WS_FRAME_SIZE)
        .max_message_size(MAX_WS_MESSAGE_SIZE)
        .on_upgrade(move |socket| relay::session::run(socket, params, state))
}

/// 426 response telling plain-HTTP callers how to reach this endpoint.
fn upgrade_required() -> Response {
    (
        StatusCode::UPGRADE_REQUIRED,
        [(CONNECTION, "Upgrade"), (UPGRADE, "websocket")],
        "Upgrade Required",
    )
        .into_response()
}
