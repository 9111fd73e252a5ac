//! Application state shared across handlers.

use std::sync::Arc;

use crate::backend::AuthClient;
use crate::catalog::Catalog;
use crate::config::WebConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and immutable after startup.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: WebConfig,
    auth: AuthClient,
    catalog: Catalog,
}

impl AppState {
    /// Create application state with the built-in course catalog.
    #[must_use]
    pub fn new(config: WebConfig) -> Self {
        Self::with_catalog(config, Catalog::default())
    }

    /// Create application state with a specific catalog.
    #[must_use]
    pub fn with_catalog(config: WebConfig, catalog: Catalog) -> Self {
        let auth = AuthClient::new(&config.api);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                auth,
                catalog,
            }),
        }
    }

    /// Get a reference to the web configuration.
    #[must_use]
    pub fn config(&self) -> &WebConfig {
        &self.inner.config
    }

    /// Get a reference to the auth API client.
    #[must_use]
    pub fn auth(&self) -> &AuthClient {
        &self.inner.auth
    }

    /// Get a reference to the course catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }
}
