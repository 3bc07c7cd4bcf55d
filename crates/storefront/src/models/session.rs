//! Session-related types.
//!
//! Well-known keys for values stored in the visitor session.

/// Session keys for visitor state.
pub mod keys {
    /// Key for the cart store key (`driftwood_core::SessionKey`) owned by
    /// this visitor. Minted on the first cart operation.
    pub const CART_KEY: &str = "cart_key";
}
