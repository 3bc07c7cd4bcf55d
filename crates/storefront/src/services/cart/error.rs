//! Cart operation errors.
//!
//! All variants except `Catalog` are locally recoverable: the caller surfaces
//! a user-facing message and the cart is left exactly as it was before the
//! failed operation.

use thiserror::Error;

use driftwood_core::ProductId;

use crate::services::catalog::CatalogError;

/// A cart operation failure.
#[derive(Debug, Error)]
pub enum CartError {
    /// The referenced product does not resolve in the catalog.
    #[error("product {0} not found in catalog")]
    ProductNotFound(ProductId),

    /// A non-positive quantity was requested.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(u32),

    /// The resulting quantity would exceed available stock.
    #[error("insufficient stock: requested quantity {requested}, {available} available")]
    InsufficientStock { requested: u32, available: u32 },

    /// Catalog storage fault, reported upward as infrastructure failure.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl CartError {
    /// Message suitable for rendering to the visitor.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::ProductNotFound(_) => "That product is no longer available.".to_string(),
            Self::InvalidQuantity(_) => "Quantity must be at least 1.".to_string(),
            Self::InsufficientStock { available, .. } => {
                format!("Only {available} in stock.")
            }
            Self::Catalog(_) => "Something went wrong. Please try again.".to_string(),
        }
    }
}
