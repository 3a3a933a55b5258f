use std::sync::Arc;

use anihub_core::{Catalog, Config, EventHandle, SanitizedConfig};

/// Shared application state
pub struct AppState {
    config: Config,
    events: EventHandle,
    catalog: Arc<Catalog>,
}

impl AppState {
    pub fn new(config: Config, events: EventHandle, catalog: Arc<Catalog>) -> Self {
        Self {
            config,
            events,
            catalog,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Handle for submitting events to the event loop.
    pub fn events(&self) -> &EventHandle {
        &self.events
    }

    /// Read access to the catalog. Mutations go through the event loop.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Configured shared API key, if any.
    pub fn api_key(&self) -> Option<&str> {
        self.config
            .server
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
    }
}
