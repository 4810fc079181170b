//! Echo test-mode resolver.

use async_trait::async_trait;
use url::Url;

use super::EndpointResolver;
use crate::errors::{RelayError, RelayResult};
use crate::relay::SessionParams;

/// Public echo service used as a stand-in upstream when echo mode is on.
pub const ECHO_WS_URL: &str = "wss://echo.websocket.events";

/// Resolver that always returns the fixed echo target.
///
/// Used for first connectivity tests without a live Vapi account: frames sent
/// by the telephony side come straight back to it. Never touches the network
/// and never needs a credential.
pub struct EchoResolver;

#[async_trait]
impl EndpointResolver for EchoResolver {
    async fn resolve(&self, _params: &SessionParams) -> RelayResult<Url> {
        Url::parse(ECHO_WS_URL).map_err(|e| RelayError::EndpointUnavailable(e.to_string()))
    }
}
