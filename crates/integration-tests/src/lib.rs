//! Integration tests for Driftwood Goods.
//!
//! These tests exercise the cart service and its session store through the
//! same public API the storefront handlers use, with an in-memory catalog
//! standing in for Postgres. Database-backed repository behavior is covered
//! by running the storefront against a real database.
//!
//! Shared fixtures live here; the scenarios are under `tests/`.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use driftwood_core::{CurrencyCode, Price, ProductId};
use driftwood_storefront::models::Product;
use driftwood_storefront::services::cart::{CartService, SessionCartStore};
use driftwood_storefront::services::catalog::{Catalog, CatalogError};

/// In-memory catalog honoring the same capability as the Postgres-backed one.
pub struct StubCatalog {
    products: Mutex<HashMap<ProductId, Product>>,
}

impl StubCatalog {
    #[must_use]
    pub fn with(products: Vec<Product>) -> Self {
        Self {
            products: Mutex::new(products.into_iter().map(|p| (p.id, p)).collect()),
        }
    }

    /// Drop a product, simulating catalog deletion mid-session.
    pub fn delete(&self, id: ProductId) {
        self.products.lock().unwrap().remove(&id);
    }

    /// Reprice a product, simulating a catalog edit mid-session.
    pub fn set_price(&self, id: ProductId, price: Price) {
        if let Some(p) = self.products.lock().unwrap().get_mut(&id) {
            p.price = price;
        }
    }
}

impl Catalog for StubCatalog {
    async fn product(&self, id: ProductId) -> Result<Option<Product>, CatalogError> {
        Ok(self.products.lock().unwrap().get(&id).cloned())
    }

    async fn products(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.products.lock().unwrap().values().cloned().collect())
    }
}

/// Build a catalog product priced in whole cents.
#[must_use]
pub fn product(id: i32, title: &str, cents: i64, stock: u32) -> Product {
    Product {
        id: ProductId::new(id),
        title: title.to_string(),
        slug: title.to_lowercase().replace(' ', "-"),
        description: String::new(),
        category_id: None,
        price: Price::from_cents(cents, CurrencyCode::USD),
        stock,
        image: None,
    }
}

/// A cart service over a stub catalog and a fresh in-memory store.
#[must_use]
pub fn cart_service(products: Vec<Product>) -> CartService<StubCatalog, SessionCartStore> {
    CartService::new(
        StubCatalog::with(products),
        SessionCartStore::new(Duration::from_secs(600)),
    )
}
