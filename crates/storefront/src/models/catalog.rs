//! Catalog entities: pages, categories, and products.
//!
//! These are read-side models hydrated from `PostgreSQL` by the repositories
//! in [`crate::db`]. The cart subsystem only ever reads them.

use driftwood_core::{CategoryId, PageId, Price, ProductId};

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// URL slug, unique across products.
    pub slug: String,
    pub description: String,
    /// Owning category, if any.
    pub category_id: Option<CategoryId>,
    /// Current unit price.
    pub price: Price,
    /// Units available for sale.
    pub stock: u32,
    /// Primary image path, relative to the static file root.
    pub image: Option<String>,
}

/// A product category.
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub id: CategoryId,
    pub title: String,
    /// URL slug, unique across categories.
    pub slug: String,
}

/// A CMS content page.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub id: PageId,
    pub title: String,
    /// URL slug, unique across pages.
    pub slug: String,
    pub content: String,
    /// Navigation sort order.
    pub sorting: i32,
}
