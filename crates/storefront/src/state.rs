//! Application state shared across handlers.

use std::sync::Arc;

use crate::checkout::{CheckoutService, WhatsappHandoff};
use crate::config::StorefrontConfig;
use crate::store::OrderStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the configuration and the checkout service.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    checkout: CheckoutService,
}

impl AppState {
    /// Create a new application state around an opened store.
    #[must_use]
    pub fn new(config: StorefrontConfig, store: OrderStore) -> Self {
        let handoff = WhatsappHandoff::new(config.whatsapp_number.clone());
        let checkout = CheckoutService::new(Arc::new(store), handoff);

        Self {
            inner: Arc::new(AppStateInner { config, checkout }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the checkout service.
    #[must_use]
    pub fn checkout(&self) -> &CheckoutService {
        &self.inner.checkout
    }

    /// Get a reference to the order store.
    #[must_use]
    pub fn store(&self) -> &OrderStore {
        self.inner.checkout.store()
    }
}
