//! Vapi session endpoint resolver.
//!
//! Creates a Vapi call session over HTTP and extracts the WebSocket URL the
//! relay should dial. A single request with a bounded timeout and no retry:
//! a session that cannot resolve its endpoint promptly is terminated rather
//! than queued.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::EndpointResolver;
use crate::errors::{RelayError, RelayResult};
use crate::relay::SessionParams;

/// Path of the call-session creation endpoint, relative to the API base.
const CREATE_CALL_PATH: &str = "/v1/calls";

/// Bound on both connection establishment and the full HTTP exchange.
const RESOLVE_TIMEOUT: Duration = Duration::from_secs(10);

/// Call-session creation response.
///
/// The session URL has appeared under two field names across API revisions;
/// `ws_url` is preferred, `websocket_url` accepted.
#[derive(Debug, Deserialize)]
struct CreateCallResponse {
    ws_url: Option<String>,
    websocket_url: Option<String>,
}

/// Resolver that asks the Vapi API for a per-call session URL.
pub struct VapiResolver {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl VapiResolver {
    /// Build a resolver for the given API base and credential.
    ///
    /// The credential stays optional here so a keyless deployment can still
    /// boot and serve health checks; its absence surfaces per session in
    /// [`EndpointResolver::resolve`].
    pub fn new(base_url: &str, api_key: Option<String>) -> RelayResult<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(RESOLVE_TIMEOUT)
            .timeout(RESOLVE_TIMEOUT)
            .build()
            .map_err(|e| RelayError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_key,
            client,
        })
    }
}

#[async_trait]
impl EndpointResolver for VapiResolver {
    async fn resolve(&self, params: &SessionParams) -> RelayResult<Url> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            RelayError::Configuration("VAPI_API_KEY is not set and echo mode is off".to_owned())
        })?;

        let endpoint = format!("{}{CREATE_CALL_PATH}", self.base_url);
        debug!(endpoint = %endpoint, "creating Vapi call session");

        let response = self
            .client
            .post(&endpoint)
            .bearer_auth(api_key)
            .json(&serde_json::json!({ "metadata": params }))
            .send()
            .await
            .map_err(|e| RelayError::EndpointUnavailable(e.to_string()))?
            .error_for_status()
            .map_err(|e| RelayError::EndpointUnavailable(e.to_string()))?;

        let body: CreateCallResponse = response
            .json()
            .await
            .map_err(|e| RelayError::EndpointUnavailable(format!("malformed response: {e}")))?;

        let raw = body.ws_url.or(body.websocket_url).ok_or_else(|| {
            RelayError::EndpointUnavailable("response missing ws_url".to_owned())
        })?;

        Url::parse(&raw)
            .map_err(|e| RelayError::EndpointUnavailable(format!("invalid ws_url {raw:?}: {e}")))
    }
}
