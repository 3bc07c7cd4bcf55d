//! Category route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};

use super::products::ProductView;
use crate::db::{CategoryRepository, ProductRepository};
use crate::error::{AppError, Result};
use crate::filters;
use crate::models::Category;
use crate::state::AppState;

/// Category display data for templates.
#[derive(Clone)]
pub struct CategoryView {
    pub title: String,
    pub slug: String,
}

impl From<&Category> for CategoryView {
    fn from(category: &Category) -> Self {
        Self {
            title: category.title.clone(),
            slug: category.slug.clone(),
        }
    }
}

/// Category listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "categories/index.html")]
pub struct CategoriesIndexTemplate {
    pub categories: Vec<CategoryView>,
}

/// Category detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "categories/show.html")]
pub struct CategoryShowTemplate {
    pub category: CategoryView,
    pub products: Vec<ProductView>,
}

/// Display the category listing page.
pub async fn index(State(state): State<AppState>) -> Result<CategoriesIndexTemplate> {
    let categories = CategoryRepository::new(state.pool()).list().await?;

    Ok(CategoriesIndexTemplate {
        categories: categories.iter().map(CategoryView::from).collect(),
    })
}

/// Display the products in a category.
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<CategoryShowTemplate> {
    let category = CategoryRepository::new(state.pool())
        .get_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("category {slug}")))?;

    let products = ProductRepository::new(state.pool())
        .list_by_category(category.id)
        .await?;

    Ok(CategoryShowTemplate {
        category: CategoryView::from(&category),
        products: products.iter().map(ProductView::from).collect(),
    })
}
