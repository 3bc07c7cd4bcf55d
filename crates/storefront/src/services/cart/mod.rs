//! The cart service: session-scoped cart mutations and view models.
//!
//! Every operation takes the session key explicitly, loads that session's
//! cart from the [`CartStore`], validates against the [`Catalog`], and saves
//! only after all validation passes - a failed operation never leaves a
//! partial mutation behind.
//!
//! # Concurrency
//!
//! Each operation is atomic with respect to its own session only because
//! ordinary browser usage serializes one visitor's requests. Two concurrent
//! operations on the same session (two tabs clicking "add" together) can
//! both pass validation and save last-writer-wins; that limitation is
//! accepted for a cart and pinned by a test rather than silently patched.
//! Operations on different sessions are fully independent.

pub mod error;
pub mod store;

pub use error::CartError;
pub use store::{CartStore, SessionCartStore};

use driftwood_core::{Cart, CartLineItem, CurrencyCode, Price, ProductId, SessionKey};

use crate::services::catalog::Catalog;

/// One rendered cart line.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLineView {
    pub product_id: ProductId,
    /// Current catalog title, or the line's title snapshot when the product
    /// no longer resolves.
    pub title: String,
    /// Unit price snapshot from the last add/update.
    pub unit_price: Price,
    pub quantity: u32,
    /// Quantity x unit price snapshot.
    pub subtotal: Price,
    /// The referenced product has been deleted from the catalog. The line
    /// still renders but is excluded from the grand total.
    pub unavailable: bool,
}

/// Presentation-ready projection of a cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartView {
    /// Lines in insertion order.
    pub lines: Vec<CartLineView>,
    /// Sum of available lines' subtotals.
    pub grand_total: Price,
    /// Total units across all lines (for the cart badge).
    pub item_count: u32,
}

impl CartView {
    /// An empty cart view.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            lines: Vec::new(),
            grand_total: Price::zero(CurrencyCode::default()),
            item_count: 0,
        }
    }
}

/// Applies cart operations under catalog-derived constraints.
pub struct CartService<C, S> {
    catalog: C,
    store: S,
}

impl<C: Catalog, S: CartStore> CartService<C, S> {
    /// Create a cart service over the given catalog and store.
    pub const fn new(catalog: C, store: S) -> Self {
        Self { catalog, store }
    }

    /// The catalog this service validates against.
    pub const fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Add `requested` units of a product to the session's cart.
    ///
    /// A repeated add of the same product increments its quantity rather
    /// than creating a duplicate line. The unit price snapshot is refreshed
    /// from the catalog on every successful add.
    ///
    /// # Errors
    ///
    /// - `InvalidQuantity` if `requested` is zero
    /// - `ProductNotFound` if the product does not resolve in the catalog
    /// - `InsufficientStock` if the resulting quantity would exceed stock;
    ///   the cart is left unchanged (no partial add)
    pub async fn add_item(
        &self,
        session: &SessionKey,
        product_id: ProductId,
        requested: u32,
    ) -> Result<CartView, CartError> {
        if requested == 0 {
            return Err(CartError::InvalidQuantity(requested));
        }
        let product = self
            .catalog
            .product(product_id)
            .await?
            .ok_or(CartError::ProductNotFound(product_id))?;

        let mut cart = self.store.load(session).await;
        let new_quantity = cart
            .quantity_of(product_id)
            .checked_add(requested)
            .filter(|quantity| *quantity <= product.stock)
            .ok_or(CartError::InsufficientStock {
                requested,
                available: product.stock,
            })?;

        cart.put(CartLineItem {
            product_id,
            title: product.title,
            quantity: new_quantity,
            unit_price: product.price,
        });
        self.store.save(session, cart.clone()).await;
        tracing::debug!(%session, %product_id, new_quantity, "cart add");

        self.project(&cart).await
    }

    /// Set a line's quantity to `new_quantity` (absolute, not additive).
    ///
    /// A quantity of zero behaves as [`Self::remove_item`].
    ///
    /// # Errors
    ///
    /// - `ProductNotFound` if the session's cart has no line for this
    ///   product, or the product no longer resolves in the catalog (stock
    ///   cannot be validated)
    /// - `InsufficientStock` if `new_quantity` exceeds current stock; the
    ///   cart is left unchanged
    pub async fn update_item(
        &self,
        session: &SessionKey,
        product_id: ProductId,
        new_quantity: u32,
    ) -> Result<CartView, CartError> {
        let mut cart = self.store.load(session).await;
        if cart.line(product_id).is_none() {
            return Err(CartError::ProductNotFound(product_id));
        }
        if new_quantity == 0 {
            return self.remove_item(session, product_id).await;
        }

        let product = self
            .catalog
            .product(product_id)
            .await?
            .ok_or(CartError::ProductNotFound(product_id))?;
        if new_quantity > product.stock {
            return Err(CartError::InsufficientStock {
                requested: new_quantity,
                available: product.stock,
            });
        }

        cart.put(CartLineItem {
            product_id,
            title: product.title,
            quantity: new_quantity,
            unit_price: product.price,
        });
        self.store.save(session, cart.clone()).await;
        tracing::debug!(%session, %product_id, new_quantity, "cart update");

        self.project(&cart).await
    }

    /// Remove a product's line from the session's cart.
    ///
    /// Idempotent: removing an absent line is a no-op, not an error.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Catalog` only if projecting the resulting view
    /// hits a catalog storage fault.
    pub async fn remove_item(
        &self,
        session: &SessionKey,
        product_id: ProductId,
    ) -> Result<CartView, CartError> {
        let mut cart = self.store.load(session).await;
        if cart.remove(product_id) {
            self.store.save(session, cart.clone()).await;
            tracing::debug!(%session, %product_id, "cart remove");
        }
        self.project(&cart).await
    }

    /// Empty the session's cart entirely. Idempotent.
    pub async fn clear_cart(&self, session: &SessionKey) -> CartView {
        self.store.clear(session).await;
        tracing::debug!(%session, "cart clear");
        CartView::empty()
    }

    /// Project the session's cart into a view model.
    ///
    /// Never fails on stale product references: a line whose product has
    /// been deleted from the catalog is flagged `unavailable` and excluded
    /// from the grand total, so the cart always renders.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Catalog` on a catalog storage fault.
    pub async fn view(&self, session: &SessionKey) -> Result<CartView, CartError> {
        let cart = self.store.load(session).await;
        self.project(&cart).await
    }

    async fn project(&self, cart: &Cart) -> Result<CartView, CartError> {
        let mut lines = Vec::with_capacity(cart.len());
        let mut grand_total = Price::zero(CurrencyCode::default());
        let mut item_count: u32 = 0;

        for item in cart.lines() {
            // Quantities are stock-bounded at mutation time, so subtotal
            // overflow is unreachable in practice.
            let subtotal = item
                .subtotal()
                .unwrap_or_else(|| Price::zero(item.unit_price.currency()));
            item_count = item_count.saturating_add(item.quantity);

            match self.catalog.product(item.product_id).await? {
                Some(product) => {
                    grand_total = grand_total.checked_add(subtotal).unwrap_or(grand_total);
                    lines.push(CartLineView {
                        product_id: item.product_id,
                        // Title is refreshed from the catalog even though the
                        // price stays snapshotted.
                        title: product.title,
                        unit_price: item.unit_price,
                        quantity: item.quantity,
                        subtotal,
                        unavailable: false,
                    });
                }
                None => {
                    lines.push(CartLineView {
                        product_id: item.product_id,
                        title: item.title.clone(),
                        unit_price: item.unit_price,
                        quantity: item.quantity,
                        subtotal,
                        unavailable: true,
                    });
                }
            }
        }

        Ok(CartView {
            lines,
            grand_total,
            item_count,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    use rust_decimal::Decimal;

    use super::*;
    use crate::models::Product;
    use crate::services::catalog::CatalogError;

    /// In-memory catalog honoring the same capability as `PgCatalog`.
    struct StubCatalog {
        products: Mutex<HashMap<ProductId, Product>>,
    }

    impl StubCatalog {
        fn with(products: Vec<Product>) -> Self {
            Self {
                products: Mutex::new(
                    products.into_iter().map(|p| (p.id, p)).collect(),
                ),
            }
        }

        fn delete(&self, id: ProductId) {
            self.products.lock().unwrap().remove(&id);
        }

        fn set_price(&self, id: ProductId, price: Price) {
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

    fn product(id: i32, title: &str, cents: i64, stock: u32) -> Product {
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

    fn service(products: Vec<Product>) -> CartService<StubCatalog, SessionCartStore> {
        CartService::new(
            StubCatalog::with(products),
            SessionCartStore::new(Duration::from_secs(60)),
        )
    }

    #[tokio::test]
    async fn test_add_rejects_zero_quantity() {
        let service = service(vec![product(1, "Oak Board", 999, 3)]);
        let session = SessionKey::generate();

        let err = service
            .add_item(&session, ProductId::new(1), 0)
            .await
            .unwrap_err();
        assert!(matches!(err, CartError::InvalidQuantity(0)));
        assert!(service.view(&session).await.unwrap().lines.is_empty());
    }

    #[tokio::test]
    async fn test_add_unknown_product() {
        let service = service(vec![]);
        let session = SessionKey::generate();

        let err = service
            .add_item(&session, ProductId::new(9), 1)
            .await
            .unwrap_err();
        assert!(matches!(err, CartError::ProductNotFound(_)));
    }

    #[tokio::test]
    async fn test_repeated_add_increments_single_line() {
        let service = service(vec![product(1, "Oak Board", 999, 10)]);
        let session = SessionKey::generate();

        service.add_item(&session, ProductId::new(1), 2).await.unwrap();
        let view = service.add_item(&session, ProductId::new(1), 3).await.unwrap();

        assert_eq!(view.lines.len(), 1);
        assert_eq!(view.lines[0].quantity, 5);
        assert_eq!(view.lines[0].subtotal.cents(), 4995);
    }

    #[tokio::test]
    async fn test_failed_add_leaves_cart_unchanged() {
        let service = service(vec![product(1, "Oak Board", 999, 3)]);
        let session = SessionKey::generate();

        service.add_item(&session, ProductId::new(1), 2).await.unwrap();
        let before = service.view(&session).await.unwrap();

        // 2 + 2 = 4 > 3 in stock
        let err = service
            .add_item(&session, ProductId::new(1), 2)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CartError::InsufficientStock {
                requested: 2,
                available: 3
            }
        ));

        assert_eq!(service.view(&session).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_update_is_absolute() {
        let service = service(vec![product(1, "Oak Board", 999, 5)]);
        let session = SessionKey::generate();

        service.add_item(&session, ProductId::new(1), 2).await.unwrap();
        let view = service
            .update_item(&session, ProductId::new(1), 3)
            .await
            .unwrap();

        assert_eq!(view.lines[0].quantity, 3);
        assert_eq!(view.lines[0].subtotal.cents(), 2997);
    }

    #[tokio::test]
    async fn test_update_zero_behaves_as_remove() {
        let service = service(vec![product(1, "Oak Board", 999, 5)]);
        let session = SessionKey::generate();

        service.add_item(&session, ProductId::new(1), 2).await.unwrap();
        let view = service
            .update_item(&session, ProductId::new(1), 0)
            .await
            .unwrap();

        assert!(view.lines.is_empty());
        assert!(view.grand_total.is_zero());
    }

    #[tokio::test]
    async fn test_update_absent_line_is_not_found() {
        let service = service(vec![product(1, "Oak Board", 999, 5)]);
        let session = SessionKey::generate();

        let err = service
            .update_item(&session, ProductId::new(1), 2)
            .await
            .unwrap_err();
        assert!(matches!(err, CartError::ProductNotFound(_)));
    }

    #[tokio::test]
    async fn test_update_over_stock_leaves_cart_unchanged() {
        let service = service(vec![product(1, "Oak Board", 999, 3)]);
        let session = SessionKey::generate();

        service.add_item(&session, ProductId::new(1), 2).await.unwrap();
        let err = service
            .update_item(&session, ProductId::new(1), 4)
            .await
            .unwrap_err();
        assert!(matches!(err, CartError::InsufficientStock { .. }));

        let view = service.view(&session).await.unwrap();
        assert_eq!(view.lines[0].quantity, 2);
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let service = service(vec![product(1, "Oak Board", 999, 5)]);
        let session = SessionKey::generate();

        service.add_item(&session, ProductId::new(1), 2).await.unwrap();
        let once = service.remove_item(&session, ProductId::new(1)).await.unwrap();
        let twice = service.remove_item(&session, ProductId::new(1)).await.unwrap();

        assert!(once.lines.is_empty());
        assert_eq!(once, twice);
    }

    #[tokio::test]
    async fn test_clear_cart() {
        let service = service(vec![
            product(1, "Oak Board", 999, 5),
            product(2, "Pine Shelf", 1250, 5),
        ]);
        let session = SessionKey::generate();

        service.add_item(&session, ProductId::new(1), 2).await.unwrap();
        service.add_item(&session, ProductId::new(2), 1).await.unwrap();

        let view = service.clear_cart(&session).await;
        assert!(view.lines.is_empty());
        assert!(view.grand_total.is_zero());

        let reloaded = service.view(&session).await.unwrap();
        assert!(reloaded.lines.is_empty());
    }

    #[tokio::test]
    async fn test_view_keeps_price_snapshot_but_refreshes_title() {
        let service = service(vec![product(1, "Oak Board", 999, 5)]);
        let session = SessionKey::generate();

        service.add_item(&session, ProductId::new(1), 2).await.unwrap();

        // Catalog price changes after the add; the view must keep charging
        // the snapshotted price.
        service
            .catalog
            .set_price(ProductId::new(1), Price::from_cents(1299, CurrencyCode::USD));

        let view = service.view(&session).await.unwrap();
        assert_eq!(view.lines[0].unit_price.cents(), 999);
        assert_eq!(view.lines[0].subtotal.cents(), 1998);

        // A subsequent add refreshes the snapshot to the current price.
        let view = service.add_item(&session, ProductId::new(1), 1).await.unwrap();
        assert_eq!(view.lines[0].unit_price.cents(), 1299);
        assert_eq!(view.lines[0].subtotal.cents(), 3897);
    }

    #[tokio::test]
    async fn test_deleted_product_renders_unavailable() {
        let service = service(vec![
            product(1, "Oak Board", 999, 5),
            product(2, "Pine Shelf", 1250, 5),
        ]);
        let session = SessionKey::generate();

        service.add_item(&session, ProductId::new(1), 2).await.unwrap();
        service.add_item(&session, ProductId::new(2), 1).await.unwrap();

        service.catalog.delete(ProductId::new(1));

        let view = service.view(&session).await.unwrap();
        assert_eq!(view.lines.len(), 2);

        let stale = &view.lines[0];
        assert!(stale.unavailable);
        assert_eq!(stale.title, "Oak Board"); // title snapshot fallback

        // Grand total excludes the unavailable line: only the Pine Shelf.
        assert_eq!(view.grand_total.cents(), 1250);
    }

    #[tokio::test]
    async fn test_grand_total_is_exact_decimal() {
        let service = service(vec![product(1, "Oak Board", 999, 3)]);
        let session = SessionKey::generate();

        let view = service.add_item(&session, ProductId::new(1), 2).await.unwrap();
        assert_eq!(view.grand_total.to_decimal(), Decimal::new(1998, 2));
    }

    #[tokio::test]
    async fn test_sessions_do_not_share_carts() {
        let service = service(vec![product(1, "Oak Board", 999, 5)]);
        let session_a = SessionKey::generate();
        let session_b = SessionKey::generate();

        service.add_item(&session_a, ProductId::new(1), 2).await.unwrap();

        assert!(service.view(&session_b).await.unwrap().lines.is_empty());
    }
}
