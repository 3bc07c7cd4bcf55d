//! Product repository for database operations.
//!
//! Prices are stored as `NUMERIC(10, 2)` and converted to fixed-point
//! [`Price`] values on read; a row that cannot be converted is reported as
//! data corruption rather than silently skipped.

use rust_decimal::Decimal;
use sqlx::PgPool;

use driftwood_core::{CategoryId, CurrencyCode, Price, ProductId};

use super::RepositoryError;
use crate::models::Product;

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i32,
    title: String,
    slug: String,
    description: String,
    category_id: Option<i32>,
    price: Decimal,
    stock: i32,
    image: Option<String>,
}

impl ProductRow {
    fn into_product(self) -> Result<Product, RepositoryError> {
        let price = Price::from_decimal(self.price, CurrencyCode::USD).ok_or_else(|| {
            RepositoryError::DataCorruption(format!(
                "invalid price {} for product {}",
                self.price, self.id
            ))
        })?;
        let stock = u32::try_from(self.stock).map_err(|_| {
            RepositoryError::DataCorruption(format!(
                "negative stock {} for product {}",
                self.stock, self.id
            ))
        })?;

        Ok(Product {
            id: ProductId::new(self.id),
            title: self.title,
            slug: self.slug,
            description: self.description,
            category_id: self.category_id.map(CategoryId::new),
            price,
            stock,
            image: self.image,
        })
    }
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all products, ordered by title.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if a row holds an invalid price or
    /// stock value.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, title, slug, description, category_id, price, stock, image
            FROM product
            ORDER BY title
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(ProductRow::into_product).collect()
    }

    /// List the products in a category, ordered by title.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if a row holds an invalid price or
    /// stock value.
    pub async fn list_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, title, slug, description, category_id, price, stock, image
            FROM product
            WHERE category_id = $1
            ORDER BY title
            ",
        )
        .bind(category_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(ProductRow::into_product).collect()
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if the row holds an invalid price
    /// or stock value.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, title, slug, description, category_id, price, stock, image
            FROM product
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(ProductRow::into_product).transpose()
    }

    /// Get a product by its URL slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if the row holds an invalid price
    /// or stock value.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, title, slug, description, category_id, price, stock, image
            FROM product
            WHERE slug = $1
            ",
        )
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        row.map(ProductRow::into_product).transpose()
    }
}
