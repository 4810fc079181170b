//! Relay session lifecycle.
//!
//! One session per inbound connection: resolve the upstream endpoint, dial
//! it, run both pumps until the first one finishes, then tear both legs down.
//! Every failure is contained here; nothing propagates past the session task
//! and no error detail ever crosses the data channel.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::ws::{self, CloseFrame, WebSocket, close_code};
use futures::{SinkExt, StreamExt};
use parking_lot::Mutex;
use tokio_tungstenite::tungstenite;
use tokio_tungstenite::tungstenite::protocol::WebSocketConfig;
use tracing::{debug, error, info, warn};
use url::Url;

use super::pump::{self, PumpEnd, UpstreamSocket};
use super::{SessionParams, call_id_from_params};
use crate::errors::RelayResult;
use crate::state::AppState;

/// Run one relay session to completion.
///
/// The inbound upgrade handshake has already been completed by the route
/// layer; this function owns the socket from the first frame to the close.
pub async fn run(socket: WebSocket, params: SessionParams, state: Arc<AppState>) {
    let call_id = call_id_from_params(&params);
    info!(call_id = %call_id, "client connected");

    let url = match state.resolver.resolve(&params).await {
        Ok(url) => url,
        Err(e) => {
            error!(call_id = %call_id, error = %e, "failed to resolve session endpoint");
            close_with_internal_error(socket, &call_id).await;
            return;
        }
    };

    let upstream = match connect_upstream(&url).await {
        Ok(upstream) => upstream,
        Err(e) => {
            error!(call_id = %call_id, error = %e, "failed to connect upstream");
            close_with_internal_error(socket, &call_id).await;
            return;
        }
    };
    info!(call_id = %call_id, "upstream connected");

    let (mut client_tx, mut client_rx) = socket.split();
    let (mut upstream_tx, mut upstream_rx) = upstream.split();
    let last_heard = Mutex::new(Instant::now());

    // Both pumps run concurrently; the first to finish, for any reason, wins
    // the select and the loser is dropped, which cancels it at its next
    // suspension point. No frame is forwarded after this point.
    let end = tokio::select! {
        end = pump::client_to_upstream(&mut client_rx, &mut upstream_tx, &last_heard, &call_id) => end,
        end = pump::upstream_to_client(&mut upstream_rx, &mut client_tx, &last_heard, &call_id) => end,
    };

    match &end {
        PumpEnd::ClientClosed { .. } => {} // already logged by the pump
        PumpEnd::UpstreamClosed { code } => {
            info!(call_id = %call_id, code = ?code, "upstream closed")
        }
        PumpEnd::ClientFailed(e) => warn!(call_id = %call_id, error = %e, "client leg failed"),
        PumpEnd::UpstreamFailed(e) => {
            warn!(call_id = %call_id, error = %e, "upstream leg failed")
        }
        PumpEnd::KeepaliveTimeout => warn!(call_id = %call_id, "upstream keepalive timed out"),
    }

    // Best-effort teardown. Each step is isolated: a failure closing one leg
    // never prevents closing the other, and never replaces the termination
    // cause reported above.
    if let Err(e) = client_tx
        .send(ws::Message::Close(Some(CloseFrame {
            code: close_code::NORMAL,
            reason: "".into(),
        })))
        .await
    {
        debug!(call_id = %call_id, error = %e, "client close failed");
    }
    // On a client disconnect the pump has already answered with a close on
    // the upstream leg.
    if !matches!(end, PumpEnd::ClientClosed { .. }) {
        if let Err(e) = upstream_tx.send(tungstenite::Message::Close(None)).await {
            debug!(call_id = %call_id, error = %e, "upstream close failed");
        }
    }

    info!(call_id = %call_id, "session closed");
}

/// Dial the resolved upstream endpoint.
///
/// No message or frame size cap: audio frames pass through whatever size the
/// peers produce, matching the uncapped inbound leg.
async fn connect_upstream(url: &Url) -> RelayResult<UpstreamSocket> {
    let config = WebSocketConfig::default()
        .max_message_size(None)
        .max_frame_size(None);

    let (upstream, _response) =
        tokio_tungstenite::connect_async_with_config(url.as_str(), Some(config), false).await?;
    Ok(upstream)
}

/// Close the inbound socket with close code 1011.
///
/// Used when setup fails before the pumps start. The client only ever sees
/// the close code; failures closing an already-gone client are informational.
async fn close_with_internal_error(mut socket: WebSocket, call_id: &str) {
    let frame = CloseFrame {
        code: close_code::ERROR,
        reason: "internal error".into(),
    };
    if let Err(e) = socket.send(ws::Message::Close(Some(frame))).await {
        info!(call_id = %call_id, error = %e, "client already disconnected during setup");
    }
}
