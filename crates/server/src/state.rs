//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::shopify::{AdminClient, ShopifyError};
use crate::sync::ListSync;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; holds the configuration, the Shopify
/// client, and the list synchronizer built over it.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    shopify: AdminClient,
    lists: ListSync<AdminClient>,
}

impl AppState {
    /// Create a new application state from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the Shopify client cannot be constructed (an
    /// unusable access token).
    pub fn new(config: ServerConfig) -> Result<Self, ShopifyError> {
        let shopify = AdminClient::new(&config.shopify)?;
        let lists = ListSync::new(shopify.clone());

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                shopify,
                lists,
            }),
        })
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the Shopify Admin API client.
    #[must_use]
    pub fn shopify(&self) -> &AdminClient {
        &self.inner.shopify
    }

    /// Get a reference to the call-list synchronizer.
    #[must_use]
    pub fn lists(&self) -> &ListSync<AdminClient> {
        &self.inner.lists
    }
}
