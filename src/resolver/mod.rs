//! Session endpoint resolution.
//!
//! Given the inbound connection's query parameters, a resolver produces the
//! WebSocket URL of the outbound session. The upstream contract for creating
//! a Vapi session is still settling, so resolution is a pluggable strategy
//! behind the [`EndpointResolver`] trait: [`VapiResolver`] speaks the
//! documented HTTP contract, [`EchoResolver`] substitutes a public echo
//! service for connectivity testing without credentials, and
//! [`from_config`] selects one at startup.

use std::sync::Arc;

use async_trait::async_trait;
use url::Url;

mod echo;
mod vapi;

pub use echo::{ECHO_WS_URL, EchoResolver};
pub use vapi::VapiResolver;

use crate::config::RelayConfig;
use crate::errors::RelayResult;
use crate::relay::SessionParams;

/// Resolves the outbound session target for one inbound connection.
///
/// Implementations must be cheap to share: one resolver instance serves every
/// session for the lifetime of the process.
#[async_trait]
pub trait EndpointResolver: Send + Sync {
    /// Produce the destination WebSocket URL for a session.
    ///
    /// `params` is the verbatim inbound query-string mapping; implementations
    /// may forward it as request metadata but never interpret it.
    async fn resolve(&self, params: &SessionParams) -> RelayResult<Url>;
}

/// Select the endpoint resolver for this process.
///
/// Echo mode wins unconditionally; otherwise the Vapi resolver is built from
/// the configured base URL and credential.
pub fn from_config(config: &RelayConfig) -> RelayResult<Arc<dyn EndpointResolver>> {
    if config.echo_mode {
        Ok(Arc::new(EchoResolver))
    } else {
        Ok(Arc::new(VapiResolver::new(
            &config.vapi_base_url,
            config.vapi_api_key.clone(),
        )?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_VAPI_BASE_URL;

    fn config(echo_mode: bool, api_key: Option<&str>) -> RelayConfig {
        RelayConfig {
            host: "127.0.0.1".to_owned(),
            port: 0,
            vapi_base_url: DEFAULT_VAPI_BASE_URL.to_owned(),
            vapi_api_key: api_key.map(str::to_owned),
            echo_mode,
        }
    }

    #[tokio::test]
    async fn echo_mode_resolves_fixed_target_without_credential() {
        let resolver = from_config(&config(true, None)).unwrap();

        let mut params = SessionParams::new();
        params.insert("call_id".to_owned(), "abc123".to_owned());

        let url = resolver.resolve(&params).await.unwrap();
        assert_eq!(url.as_str(), ECHO_WS_URL);

        // Parameters do not influence the echo target
        let url = resolver.resolve(&SessionParams::new()).await.unwrap();
        assert_eq!(url.as_str(), ECHO_WS_URL);
    }

    #[tokio::test]
    async fn echo_mode_wins_over_configured_credential() {
        let resolver = from_config(&config(true, Some("key"))).unwrap();
        let url = resolver.resolve(&SessionParams::new()).await.unwrap();
        assert_eq!(url.as_str(), ECHO_WS_URL);
    }
}
