//! Configuration module for the relay server
//!
//! All configuration is sourced from environment variables (with `.env`
//! support via `dotenvy`, loaded in `main.rs` before this module runs) and
//! captured once at startup into an immutable [`RelayConfig`]. Nothing reads
//! the environment after startup; the resolver and session components receive
//! the struct explicitly.
//!
//! # Variables
//! - `HOST` - listen address (default `0.0.0.0`)
//! - `PORT` - listen port (default `8000`)
//! - `VAPI_BASE_URL` - Vapi API base URL (default `https://api.vapi.ai`)
//! - `VAPI_API_KEY` - Vapi access credential (required unless echo mode is on)
//! - `VAPI_ECHO_MODE` - substitute the public echo service for Vapi (`1`/`true`)
//! - `RUST_LOG` - log verbosity (tracing `EnvFilter`, default `info`)

use std::env;

use crate::errors::{RelayError, RelayResult};

/// Default listen address.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8000;

/// Default Vapi API base URL.
pub const DEFAULT_VAPI_BASE_URL: &str = "https://api.vapi.ai";

/// Relay server configuration
///
/// A missing credential is not a startup failure: echo mode needs no
/// credential, and the real resolver reports the absence per session so one
/// misconfigured deployment still serves health checks.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    // Server settings
    pub host: String,
    pub port: u16,

    /// Vapi API base URL, stored without a trailing slash
    pub vapi_base_url: String,
    /// Vapi access credential used as a bearer token by the resolver
    pub vapi_api_key: Option<String>,
    /// When set, the resolver returns the fixed echo target and never calls Vapi
    pub echo_mode: bool,
}

/// Implement Drop to zeroize the credential when RelayConfig is dropped.
impl Drop for RelayConfig {
    fn drop(&mut self) {
        use zeroize::Zeroize;

        if let Some(ref mut key) = self.vapi_api_key {
            key.zeroize();
        }
    }
}

impl RelayConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns [`RelayError::Configuration`] if `PORT` is set but not a valid
    /// port number.
    pub fn from_env() -> RelayResult<Self> {
        let host = env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_owned());
        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|e| RelayError::Configuration(format!("invalid PORT {raw:?}: {e}")))?,
            Err(_) => DEFAULT_PORT,
        };

        let vapi_base_url = env::var("VAPI_BASE_URL")
            .map(|v| v.trim_end_matches('/').to_owned())
            .unwrap_or_else(|_| DEFAULT_VAPI_BASE_URL.to_owned());
        let vapi_api_key = env::var("VAPI_API_KEY").ok().filter(|v| !v.is_empty());
        let echo_mode = env::var("VAPI_ECHO_MODE")
            .map(|v| is_enabled(&v))
            .unwrap_or(false);

        Ok(Self {
            host,
            port,
            vapi_base_url,
            vapi_api_key,
            echo_mode,
        })
    }

    /// Get the server address as a string in the format "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Interpret a boolean-ish environment value.
fn is_enabled(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
