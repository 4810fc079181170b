//! Shared application state

use std::sync::Arc;

use crate::config::RelayConfig;
use crate::errors::RelayResult;
use crate::resolver::{self, EndpointResolver};

/// Immutable per-process state shared by all sessions.
///
/// Holds the configuration captured at startup and the endpoint resolver
/// selected from it. Sessions share nothing else: each inbound connection
/// gets independent state, which is what keeps concurrent calls isolated.
pub struct AppState {
    pub config: RelayConfig,
    pub resolver: Arc<dyn EndpointResolver>,
}

impl AppState {
    /// Build application state, selecting the endpoint resolver once at startup.
    pub fn new(config: RelayConfig) -> RelayResult<Arc<Self>> {
        let resolver = resolver::from_config(&config)?;
        Ok(Arc::new(Self { config, resolver }))
    }
}
