pub mod config;
pub mod errors;
pub mod handlers;
pub mod relay;
pub mod resolver;
pub mod routes;
pub mod state;

// Re-export commonly used items for convenience
pub use config::RelayConfig;
pub use errors::RelayError;
pub use relay::{Frame, SessionParams, call_id_from_params};
pub use resolver::EndpointResolver;
pub use state::AppState;
