//! Relay core: session lifecycle and the two frame pumps.
//!
//! One inbound telephony WebSocket is bridged to one outbound Vapi WebSocket
//! for the lifetime of a call. [`session::run`] owns the pair; [`pump`] holds
//! the two directional forwarding loops. The relay is protocol-agnostic at
//! the payload level: frames pass through untouched.

pub mod pump;
pub mod session;

use std::collections::HashMap;

use axum::extract::ws;
use bytes::Bytes;
use tokio_tungstenite::tungstenite;

/// Query parameters captured verbatim from the inbound connection at connect
/// time. Immutable after extraction; forwarded opaquely to the endpoint
/// resolver as request metadata.
pub type SessionParams = HashMap<String, String>;

/// Correlation id used when no recognizable call-id parameter is present.
pub const UNKNOWN_CALL_ID: &str = "unknown";

/// Derive the call identifier used for log correlation.
///
/// Checked in priority order: `call_id`, then the provider-specific
/// `callSid`, then the literal `"unknown"`. Empty values are skipped. The
/// identifier is never validated, never persisted, and not guaranteed unique
/// across retries.
pub fn call_id_from_params(params: &SessionParams) -> String {
    params
        .get("call_id")
        .or_else(|| params.get("callSid"))
        .filter(|v| !v.is_empty())
        .cloned()
        .unwrap_or_else(|| UNKNOWN_CALL_ID.to_owned())
}

/// One message unit relayed between the legs.
///
/// Carries the frame kind and the payload, nothing else; the relay never
/// looks inside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Binary(Bytes),
    Text(String),
}

impl Frame {
    /// Convert into an outbound (tungstenite) message, preserving the kind.
    pub(crate) fn into_upstream_message(self) -> tungstenite::Message {
        match self {
            Frame::Binary(bytes) => tungstenite::Message::Binary(bytes),
            Frame::Text(text) => tungstenite::Message::Text(text.into()),
        }
    }

    /// Convert into an inbound (axum) message, preserving the kind.
    pub(crate) fn into_client_message(self) -> ws::Message {
        match self {
            Frame::Binary(bytes) => ws::Message::Binary(bytes),
            Frame::Text(text) => ws::Message::Text(text.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> SessionParams {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn call_id_prefers_primary_parameter() {
        let params = params(&[("call_id", "abc123"), ("callSid", "CA999")]);
        assert_eq!(call_id_from_params(&params), "abc123");
    }

    #[test]
    fn call_id_falls_back_to_provider_sid() {
        let params = params(&[("callSid", "CA999"), ("foo", "bar")]);
        assert_eq!(call_id_from_params(&params), "CA999");
    }

    #[test]
    fn call_id_skips_empty_values() {
        let params = params(&[("call_id", ""), ("callSid", "CA999")]);
        assert_eq!(call_id_from_params(&params), "CA999");
    }

    #[test]
    fn call_id_defaults_to_unknown() {
        assert_eq!(call_id_from_params(&params(&[])), UNKNOWN_CALL_ID);
        let unrelated = params(&[("sample_rate", "8000")]);
        assert_eq!(call_id_from_params(&unrelated), UNKNOWN_CALL_ID);
    }

    #[test]
    fn frame_kind_survives_upstream_conversion() {
        let binary = Frame::Binary(Bytes::from_static(b"\x00\x01\xff"));
        assert!(matches!(
            binary.into_upstream_message(),
            tungstenite::Message::Binary(b) if b.as_ref() == b"\x00\x01\xff"
        ));

        let text = Frame::Text("hello".to_owned());
        assert!(matches!(
            text.into_upstream_message(),
            tungstenite::Message::Text(t) if t.as_str() == "hello"
        ));
    }

    #[test]
    fn frame_kind_survives_client_conversion() {
        let binary = Frame::Binary(Bytes::from_static(b"\x00\x01\xff"));
        assert!(matches!(
            binary.into_client_message(),
            ws::Message::Binary(b) if b.as_ref() == b"\x00\x01\xff"
        ));

        let text = Frame::Text("hello".to_owned());
        assert!(matches!(
            text.into_client_message(),
            ws::Message::Text(t) if t.as_str() == "hello"
        ));
    }
}
