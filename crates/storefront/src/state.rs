//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::StorefrontConfig;
use crate::middleware::session::SESSION_EXPIRY;
use crate::services::cart::{CartService, SessionCartStore};
use crate::services::catalog::PgCatalog;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    catalog: PgCatalog,
    cart: CartService<PgCatalog, SessionCartStore>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `pool` - `PostgreSQL` connection pool
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Self {
        let catalog = PgCatalog::new(pool.clone());
        let cart = CartService::new(catalog.clone(), SessionCartStore::new(SESSION_EXPIRY));

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                catalog,
                cart,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &PgCatalog {
        &self.inner.catalog
    }

    /// Get a reference to the cart service.
    #[must_use]
    pub fn cart(&self) -> &CartService<PgCatalog, SessionCartStore> {
        &self.inner.cart
    }
}
