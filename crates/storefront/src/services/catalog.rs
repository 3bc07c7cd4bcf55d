//! The product catalog capability.
//!
//! The cart service depends on this trait rather than on a concrete storage
//! binding, so the catalog can be served from any persistence technology
//! (or an in-memory stub in tests) without touching cart logic.

use sqlx::PgPool;
use thiserror::Error;

use driftwood_core::ProductId;

use crate::db::ProductRepository;
use crate::models::Product;

/// Opaque infrastructure failure from a catalog lookup.
///
/// Catalog storage faults are not part of the cart's error model; they are
/// reported upward unchanged for the hosting layer to handle.
#[derive(Debug, Error)]
#[error("catalog lookup failed: {0}")]
pub struct CatalogError(#[source] Box<dyn std::error::Error + Send + Sync>);

impl CatalogError {
    /// Wrap an underlying storage error.
    pub fn new(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self(Box::new(source))
    }
}

/// Read-only product lookups.
#[allow(async_fn_in_trait)]
pub trait Catalog {
    /// Resolve a product by ID. `Ok(None)` means the ID does not resolve.
    async fn product(&self, id: ProductId) -> Result<Option<Product>, CatalogError>;

    /// List all products, ordered by title.
    async fn products(&self) -> Result<Vec<Product>, CatalogError>;
}

/// `PostgreSQL`-backed catalog.
#[derive(Clone)]
pub struct PgCatalog {
    pool: PgPool,
}

impl PgCatalog {
    /// Create a catalog backed by the given pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl Catalog for PgCatalog {
    async fn product(&self, id: ProductId) -> Result<Option<Product>, CatalogError> {
        ProductRepository::new(&self.pool)
            .get_by_id(id)
            .await
            .map_err(CatalogError::new)
    }

    async fn products(&self) -> Result<Vec<Product>, CatalogError> {
        ProductRepository::new(&self.pool)
            .list()
            .await
            .map_err(CatalogError::new)
    }
}
