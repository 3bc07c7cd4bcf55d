//! The session-scoped cart aggregate.
//!
//! A [`Cart`] is an ordered mapping from product ID to line item: one line
//! per product, insertion order preserved for stable display. Carts are
//! small, so lookups are a linear scan over a `Vec` rather than a map.
//!
//! Invariant: a line item always has quantity >= 1. Writing a quantity of
//! zero through [`Cart::put`] removes the line instead.

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// One product entry in a cart.
///
/// The unit price and title are snapshots captured at the time of the last
/// add/update, not live catalog reads. The price snapshot keeps in-session
/// totals stable if the catalog price changes; the title snapshot is a
/// display fallback for products later deleted from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineItem {
    /// Weak reference into the product catalog.
    pub product_id: ProductId,
    /// Product title at time of last add/update.
    pub title: String,
    /// Number of units; always >= 1.
    pub quantity: u32,
    /// Unit price at time of last add/update.
    pub unit_price: Price,
}

impl CartLineItem {
    /// Line subtotal (quantity x unit price snapshot).
    ///
    /// Returns `None` on arithmetic overflow.
    #[must_use]
    pub fn subtotal(&self) -> Option<Price> {
        self.unit_price.checked_mul(self.quantity)
    }
}

/// Ordered collection of line items for one session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Whether the cart holds no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct line items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Look up the line item for a product, if present.
    #[must_use]
    pub fn line(&self, product_id: ProductId) -> Option<&CartLineItem> {
        self.lines.iter().find(|l| l.product_id == product_id)
    }

    /// Current quantity for a product (0 if absent).
    #[must_use]
    pub fn quantity_of(&self, product_id: ProductId) -> u32 {
        self.line(product_id).map_or(0, |l| l.quantity)
    }

    /// Insert or replace the line item for a product.
    ///
    /// Replacing keeps the line's original position; a new product is
    /// appended. A line with quantity 0 is removed instead of stored, which
    /// upholds the quantity >= 1 invariant.
    pub fn put(&mut self, line: CartLineItem) {
        if line.quantity == 0 {
            self.remove(line.product_id);
            return;
        }
        match self
            .lines
            .iter_mut()
            .find(|l| l.product_id == line.product_id)
        {
            Some(existing) => *existing = line,
            None => self.lines.push(line),
        }
    }

    /// Remove the line item for a product. Returns whether a line existed.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.product_id != product_id);
        self.lines.len() != before
    }

    /// Remove all line items.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Iterate over line items in insertion order.
    pub fn lines(&self) -> impl Iterator<Item = &CartLineItem> {
        self.lines.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::CurrencyCode;

    fn line(id: i32, quantity: u32, cents: i64) -> CartLineItem {
        CartLineItem {
            product_id: ProductId::new(id),
            title: format!("Product {id}"),
            quantity,
            unit_price: Price::from_cents(cents, CurrencyCode::USD),
        }
    }

    #[test]
    fn test_put_preserves_insertion_order() {
        let mut cart = Cart::new();
        cart.put(line(1, 1, 100));
        cart.put(line(2, 1, 200));
        cart.put(line(3, 1, 300));
        // Replacing the middle line must not move it to the back
        cart.put(line(2, 5, 200));

        let ids: Vec<i32> = cart.lines().map(|l| l.product_id.as_i32()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(cart.quantity_of(ProductId::new(2)), 5);
    }

    #[test]
    fn test_put_is_one_line_per_product() {
        let mut cart = Cart::new();
        cart.put(line(1, 2, 100));
        cart.put(line(1, 3, 100));
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.quantity_of(ProductId::new(1)), 3);
    }

    #[test]
    fn test_put_zero_quantity_removes_line() {
        let mut cart = Cart::new();
        cart.put(line(1, 2, 100));
        cart.put(line(1, 0, 100));
        assert!(cart.is_empty());
        assert!(cart.line(ProductId::new(1)).is_none());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut cart = Cart::new();
        cart.put(line(1, 2, 100));
        assert!(cart.remove(ProductId::new(1)));
        let after_first = cart.clone();
        assert!(!cart.remove(ProductId::new(1)));
        assert_eq!(cart, after_first);
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.put(line(1, 2, 100));
        cart.put(line(2, 1, 200));
        cart.clear();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_subtotal_is_exact() {
        let item = line(1, 2, 999);
        assert_eq!(item.subtotal().unwrap().cents(), 1998);
    }

    #[test]
    fn test_cart_serializes_for_session_storage() {
        let mut cart = Cart::new();
        cart.put(line(1, 2, 999));

        let json = serde_json::to_string(&cart).unwrap();
        let restored: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, cart);
    }
}
