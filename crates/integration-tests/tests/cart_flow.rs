//! End-to-end cart scenarios through the cart service public API.

#![allow(clippy::unwrap_used)]

use driftwood_core::{CurrencyCode, Price, ProductId, SessionKey};
use driftwood_integration_tests::{cart_service, product};
use driftwood_storefront::services::cart::CartError;
use rust_decimal::Decimal;

// =============================================================================
// Shopper Walkthrough
// =============================================================================

/// One shopper's full session: add, hit the stock ceiling, adjust, remove.
#[tokio::test]
async fn test_shopper_walkthrough() {
    let service = cart_service(vec![product(1, "Harbor Lantern", 999, 3)]);
    let session = SessionKey::generate();

    // Add two units at $9.99.
    let view = service.add_item(&session, ProductId::new(1), 2).await.unwrap();
    assert_eq!(view.lines.len(), 1);
    assert_eq!(view.item_count, 2);
    assert_eq!(view.grand_total.to_decimal(), Decimal::new(1998, 2));

    // A second add of two would exceed the three in stock; the cart must be
    // left exactly as it was.
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
    let view = service.view(&session).await.unwrap();
    assert_eq!(view.item_count, 2);
    assert_eq!(view.grand_total.to_decimal(), Decimal::new(1998, 2));

    // Setting the quantity to the full stock is fine.
    let view = service
        .update_item(&session, ProductId::new(1), 3)
        .await
        .unwrap();
    assert_eq!(view.item_count, 3);
    assert_eq!(view.grand_total.to_decimal(), Decimal::new(2997, 2));

    // Removing the line empties the cart.
    let view = service
        .remove_item(&session, ProductId::new(1))
        .await
        .unwrap();
    assert!(view.lines.is_empty());
    assert_eq!(view.item_count, 0);
    assert!(view.grand_total.is_zero());
}

/// Lines appear in the order products were first added, and the grand total
/// is the sum of every line's subtotal.
#[tokio::test]
async fn test_multi_product_totals_and_order() {
    let service = cart_service(vec![
        product(1, "Driftwood Serving Board", 4200, 8),
        product(2, "Tidepool Coaster Set", 2850, 15),
        product(3, "Weathered Wall Hook", 1800, 20),
    ]);
    let session = SessionKey::generate();

    service.add_item(&session, ProductId::new(2), 1).await.unwrap();
    service.add_item(&session, ProductId::new(1), 2).await.unwrap();
    service.add_item(&session, ProductId::new(3), 4).await.unwrap();
    // Re-adding the coaster set merges into its existing line without
    // changing its position.
    let view = service.add_item(&session, ProductId::new(2), 2).await.unwrap();

    let ids: Vec<i32> = view.lines.iter().map(|l| l.product_id.as_i32()).collect();
    assert_eq!(ids, vec![2, 1, 3]);

    let line_sum: i64 = view.lines.iter().map(|l| l.subtotal.cents()).sum();
    assert_eq!(view.grand_total.cents(), line_sum);
    // 3 x 28.50 + 2 x 42.00 + 4 x 18.00
    assert_eq!(view.grand_total.to_decimal(), Decimal::new(24150, 2));
    assert_eq!(view.item_count, 9);
}

// =============================================================================
// Catalog Drift
// =============================================================================

/// A catalog reprice mid-session does not change what the shopper was quoted;
/// only the next add picks up the new price.
#[tokio::test]
async fn test_reprice_does_not_touch_quoted_lines() {
    let service = cart_service(vec![product(1, "Harbor Lantern", 6400, 10)]);
    let session = SessionKey::generate();

    service.add_item(&session, ProductId::new(1), 1).await.unwrap();
    service
        .catalog()
        .set_price(ProductId::new(1), Price::from_cents(7200, CurrencyCode::USD));

    let view = service.view(&session).await.unwrap();
    assert_eq!(view.lines[0].unit_price.cents(), 6400);

    let view = service.add_item(&session, ProductId::new(1), 1).await.unwrap();
    assert_eq!(view.lines[0].unit_price.cents(), 7200);
    assert_eq!(view.lines[0].subtotal.cents(), 14400);
}

/// A product deleted from the catalog still renders from its snapshot but
/// is excluded from the total and can no longer be updated.
#[tokio::test]
async fn test_deleted_product_mid_session() {
    let service = cart_service(vec![
        product(1, "Harbor Lantern", 6400, 10),
        product(2, "Weathered Wall Hook", 1800, 20),
    ]);
    let session = SessionKey::generate();

    service.add_item(&session, ProductId::new(1), 1).await.unwrap();
    service.add_item(&session, ProductId::new(2), 2).await.unwrap();
    service.catalog().delete(ProductId::new(1));

    let view = service.view(&session).await.unwrap();
    assert_eq!(view.lines.len(), 2);
    assert!(view.lines[0].unavailable);
    assert_eq!(view.lines[0].title, "Harbor Lantern");
    assert_eq!(view.grand_total.cents(), 3600);

    // Stock can no longer be validated, so a quantity change is refused...
    let err = service
        .update_item(&session, ProductId::new(1), 2)
        .await
        .unwrap_err();
    assert!(matches!(err, CartError::ProductNotFound(_)));

    // ...but the shopper can still drop the line, via remove or update-to-zero.
    let view = service
        .update_item(&session, ProductId::new(1), 0)
        .await
        .unwrap();
    assert_eq!(view.lines.len(), 1);
    assert!(!view.lines[0].unavailable);
}
