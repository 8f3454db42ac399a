//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use fontshift_core::Negotiator;

use crate::config::Config;

/// State shared across all HTTP handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Server configuration (env-derived).
    pub config: Arc<Config>,
    /// Format negotiation over the codec-backed converter.
    pub negotiator: Arc<Negotiator>,
}

impl AppState {
    pub fn new(config: Config, negotiator: Negotiator) -> Self {
        Self {
            config: Arc::new(config),
            negotiator: Arc::new(negotiator),
        }
    }
}
