//! CMS page repository for database operations.

use sqlx::PgPool;

use driftwood_core::PageId;

use super::RepositoryError;
use crate::models::Page;

#[derive(sqlx::FromRow)]
struct PageRow {
    id: i32,
    title: String,
    slug: String,
    content: String,
    sorting: i32,
}

impl From<PageRow> for Page {
    fn from(row: PageRow) -> Self {
        Self {
            id: PageId::new(row.id),
            title: row.title,
            slug: row.slug,
            content: row.content,
            sorting: row.sorting,
        }
    }
}

/// Repository for CMS page database operations.
pub struct PageRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PageRepository<'a> {
    /// Create a new page repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all pages in navigation order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Page>, RepositoryError> {
        let rows = sqlx::query_as::<_, PageRow>(
            r"
            SELECT id, title, slug, content, sorting
            FROM page
            ORDER BY sorting, title
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Page::from).collect())
    }

    /// Get a page by its URL slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Page>, RepositoryError> {
        let row = sqlx::query_as::<_, PageRow>(
            r"
            SELECT id, title, slug, content, sorting
            FROM page
            WHERE slug = $1
            ",
        )
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Page::from))
    }
}
