//! The two directional frame pumps.
//!
//! Each pump reads from one leg and writes to the other, pass-through only:
//! no transformation, no buffering, no rate limiting, no size cap. Receives
//! are classified into tagged [`Received`] values so a peer disconnect is an
//! ordinary branch of the loop, not error propagation; every loop exit is an
//! explicit [`PumpEnd`].
//!
//! Half ownership is fixed for the session: the client→upstream pump owns the
//! inbound read half and the outbound write half, the upstream→client pump
//! owns the other two. No connection half is ever shared, so the pumps need
//! no locking on the sockets themselves.

use std::time::{Duration, Instant};

use axum::extract::ws;
use futures::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use tokio::net::TcpStream;
use tokio::time::MissedTickBehavior;
use tokio_tungstenite::tungstenite;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, trace};

use super::Frame;

/// The outbound WebSocket stream type.
pub(crate) type UpstreamSocket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Interval between keepalive pings on the outbound leg.
pub(crate) const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(20);

/// How long the upstream may stay silent after a ping before the leg is
/// considered dead.
pub(crate) const KEEPALIVE_TIMEOUT: Duration = Duration::from_secs(20);

/// Outcome of one receive on either leg.
///
/// `Control` covers ping/pong frames answered by the WebSocket layer itself;
/// the pumps skip them. `Closed(None)` covers both a close frame without a
/// status code and a stream that ended without one.
pub(crate) enum Received<E> {
    Frame(Frame),
    Control,
    Closed(Option<u16>),
    Failed(E),
}

/// Why a pump loop stopped.
///
/// None of these are errors in the propagation sense: the session handler
/// logs them and proceeds to coordinated teardown either way.
#[derive(Debug)]
pub(crate) enum PumpEnd {
    /// The telephony side disconnected, with the close code it sent
    ClientClosed { code: Option<u16> },
    /// The inbound leg failed mid-read or mid-write
    ClientFailed(axum::Error),
    /// The upstream session closed, with the close code it sent
    UpstreamClosed { code: Option<u16> },
    /// The outbound leg failed mid-read or mid-write
    UpstreamFailed(tungstenite::Error),
    /// The upstream stopped answering keepalive pings
    KeepaliveTimeout,
}

/// Classify the next inbound (telephony-side) event.
fn classify_client(event: Option<Result<ws::Message, axum::Error>>) -> Received<axum::Error> {
    match event {
        Some(Ok(ws::Message::Binary(bytes))) => Received::Frame(Frame::Binary(bytes)),
        Some(Ok(ws::Message::Text(text))) => Received::Frame(Frame::Text(text.as_str().to_owned())),
        Some(Ok(ws::Message::Ping(_) | ws::Message::Pong(_))) => Received::Control,
        Some(Ok(ws::Message::Close(frame))) => Received::Closed(frame.map(|f| f.code)),
        Some(Err(e)) => Received::Failed(e),
        None => Received::Closed(None),
    }
}

/// Classify the next outbound (Vapi-side) event.
fn classify_upstream(
    event: Option<Result<tungstenite::Message, tungstenite::Error>>,
) -> Received<tungstenite::Error> {
    match event {
        Some(Ok(tungstenite::Message::Binary(bytes))) => Received::Frame(Frame::Binary(bytes)),
        Some(Ok(tungstenite::Message::Text(text))) => {
            Received::Frame(Frame::Text(text.as_str().to_owned()))
        }
        Some(Ok(tungstenite::Message::Ping(_) | tungstenite::Message::Pong(_))) => {
            Received::Control
        }
        Some(Ok(tungstenite::Message::Close(frame))) => {
            Received::Closed(frame.map(|f| u16::from(f.code)))
        }
        // A well-behaved provider only sends text and binary; anything else is
        // stringified and forwarded as text. The client→upstream pump has no
        // matching branch, which mirrors the documented asymmetry.
        Some(Ok(other)) => Received::Frame(Frame::Text(format!("{other:?}"))),
        Some(Err(e)) => Received::Failed(e),
        None => Received::Closed(None),
    }
}

/// Forward telephony frames to the upstream session.
///
/// Runs until the client disconnects, either leg fails, or the upstream goes
/// silent past the keepalive window. A client disconnect is answered with a
/// normal (1000) close on the upstream leg before the pump exits.
///
/// This pump also drives the outbound keepalive: it owns the upstream write
/// half, so it is the one that may send pings. The companion pump timestamps
/// upstream receive activity into `last_heard`.
pub(crate) async fn client_to_upstream(
    client_rx: &mut SplitStream<ws::WebSocket>,
    upstream_tx: &mut SplitSink<UpstreamSocket, tungstenite::Message>,
    last_heard: &Mutex<Instant>,
    call_id: &str,
) -> PumpEnd {
    let mut keepalive = tokio::time::interval(KEEPALIVE_INTERVAL);
    keepalive.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; consume it so pings start one
    // interval after connect.
    keepalive.tick().await;

    loop {
        tokio::select! {
            event = client_rx.next() => match classify_client(event) {
                Received::Frame(frame) => {
                    if let Err(e) = upstream_tx.send(frame.into_upstream_message()).await {
                        return PumpEnd::UpstreamFailed(e);
                    }
                }
                Received::Control => trace!(call_id = %call_id, "client control frame"),
                Received::Closed(code) => {
                    info!(call_id = %call_id, code = ?code, "client disconnected");
                    let close = tungstenite::Message::Close(Some(CloseFrame {
                        code: CloseCode::Normal,
                        reason: "".into(),
                    }));
                    if let Err(e) = upstream_tx.send(close).await {
                        debug!(call_id = %call_id, error = %e, "upstream close failed");
                    }
                    return PumpEnd::ClientClosed { code };
                }
                Received::Failed(e) => return PumpEnd::ClientFailed(e),
            },
            _ = keepalive.tick() => {
                if last_heard.lock().elapsed() > KEEPALIVE_INTERVAL + KEEPALIVE_TIMEOUT {
                    return PumpEnd::KeepaliveTimeout;
                }
                if let Err(e) = upstream_tx.send(tungstenite::Message::Ping(Default::default())).await {
                    return PumpEnd::UpstreamFailed(e);
                }
            }
        }
    }
}

/// Forward upstream frames to the telephony side.
///
/// Runs until the upstream closes or errors, or the inbound leg can no
/// longer accept writes. The only other way out is cancellation by the
/// session handler once the companion pump finishes first.
pub(crate) async fn upstream_to_client(
    upstream_rx: &mut SplitStream<UpstreamSocket>,
    client_tx: &mut SplitSink<ws::WebSocket, ws::Message>,
    last_heard: &Mutex<Instant>,
    call_id: &str,
) -> PumpEnd {
    loop {
        let event = upstream_rx.next().await;
        *last_heard.lock() = Instant::now();

        match classify_upstream(event) {
            Received::Frame(frame) => {
                if let Err(e) = client_tx.send(frame.into_client_message()).await {
                    return PumpEnd::ClientFailed(e);
                }
            }
            Received::Control => trace!(call_id = %call_id, "upstream control frame"),
            Received::Closed(code) => return PumpEnd::UpstreamClosed { code },
            Received::Failed(e) => return PumpEnd::UpstreamFailed(e),
        }
    }
}
