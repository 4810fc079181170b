//! Error types for the relay.
//!
//! Only failures that end a session before its pumps start live here. Peer
//! disconnects mid-session are not errors: they are ordinary pump outcomes
//! (see `relay::pump::PumpEnd`) and are logged as lifecycle events.

use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Errors that can occur while setting up a relay session.
///
/// Every variant is fatal to the session only, never to the process. The
/// session handler answers all of them the same way: log, close the inbound
/// connection with close code 1011, and stop before any pump starts.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Required configuration is missing or malformed
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The session endpoint lookup failed, timed out, or returned an unusable body
    #[error("Session endpoint unavailable: {0}")]
    EndpointUnavailable(String),

    /// The outbound WebSocket connection could not be established
    #[error("Upstream connect failed: {0}")]
    UpstreamConnect(#[from] tungstenite::Error),
}

/// Result type for relay setup operations.
pub type RelayResult<T> = Result<T, RelayError>;
