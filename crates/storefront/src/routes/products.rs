//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::filters;
use crate::models::Product;
use crate::state::AppState;

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub price: String,
    pub in_stock: bool,
    pub image: Option<String>,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i32(),
            title: product.title.clone(),
            slug: product.slug.clone(),
            description: product.description.clone(),
            price: product.price.to_string(),
            in_stock: product.stock > 0,
            image: product.image.clone(),
        }
    }
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub products: Vec<ProductView>,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: ProductView,
}

/// Display product listing page.
pub async fn index(State(state): State<AppState>) -> Result<ProductsIndexTemplate> {
    let products = ProductRepository::new(state.pool()).list().await?;

    Ok(ProductsIndexTemplate {
        products: products.iter().map(ProductView::from).collect(),
    })
}

/// Display product detail page.
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<ProductShowTemplate> {
    let product = ProductRepository::new(state.pool())
        .get_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {slug}")))?;

    Ok(ProductShowTemplate {
        product: ProductView::from(&product),
    })
}
