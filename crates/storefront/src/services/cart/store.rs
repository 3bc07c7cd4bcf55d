//! The cart store: session-scoped cart persistence.
//!
//! Holds the [`Cart`] for each session, addressed by an explicit
//! [`SessionKey`]. Absence is an ordinary state - loading a key that has no
//! cart yet yields an empty cart. Saves are last-writer-wins; two in-flight
//! operations on the same session can race past each other's validation
//! (see the cart service docs), which is accepted for a cart.

use std::time::Duration;

use driftwood_core::{Cart, SessionKey};

/// Session-keyed cart persistence.
#[allow(async_fn_in_trait)]
pub trait CartStore {
    /// The session's current cart, or an empty cart if none exists yet.
    async fn load(&self, key: &SessionKey) -> Cart;

    /// Replace the session's cart. Last-writer-wins.
    async fn save(&self, key: &SessionKey, cart: Cart);

    /// Remove the session's cart entirely (used after checkout).
    async fn clear(&self, key: &SessionKey);
}

/// In-process cart store with session-lifetime expiry.
///
/// Carts are held in a [`moka`] cache whose time-to-idle matches the session
/// expiry, so an abandoned cart disappears with its session. There is no
/// cross-session durability by design.
#[derive(Clone)]
pub struct SessionCartStore {
    carts: moka::future::Cache<SessionKey, Cart>,
}

impl SessionCartStore {
    /// Create a store whose carts idle out after `time_to_idle`.
    #[must_use]
    pub fn new(time_to_idle: Duration) -> Self {
        Self {
            carts: moka::future::Cache::builder()
                .time_to_idle(time_to_idle)
                .build(),
        }
    }
}

impl CartStore for SessionCartStore {
    async fn load(&self, key: &SessionKey) -> Cart {
        self.carts.get(key).await.unwrap_or_default()
    }

    async fn save(&self, key: &SessionKey, cart: Cart) {
        self.carts.insert(key.clone(), cart).await;
    }

    async fn clear(&self, key: &SessionKey) {
        self.carts.invalidate(key).await;
    }
}
