//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;

use super::products::ProductView;
use crate::error::Result;
use crate::filters;
use crate::services::catalog::Catalog;
use crate::state::AppState;

/// Number of products shown on the home page.
const FEATURED_COUNT: usize = 8;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub products: Vec<ProductView>,
}

/// Display the home page with a featured product grid.
pub async fn home(State(state): State<AppState>) -> Result<HomeTemplate> {
    let products = state.catalog().products().await?;

    Ok(HomeTemplate {
        products: products
            .iter()
            .take(FEATURED_COUNT)
            .map(ProductView::from)
            .collect(),
    })
}
