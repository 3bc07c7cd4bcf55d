//! CMS page route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};

use crate::db::PageRepository;
use crate::error::{AppError, Result};
use crate::filters;
use crate::models::Page;
use crate::state::AppState;

/// Page display data for templates.
#[derive(Clone)]
pub struct PageView {
    pub title: String,
    pub content: String,
}

impl From<&Page> for PageView {
    fn from(page: &Page) -> Self {
        Self {
            title: page.title.clone(),
            content: page.content.clone(),
        }
    }
}

/// CMS page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/show.html")]
pub struct PageShowTemplate {
    pub page: PageView,
}

/// Display a CMS page by slug.
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<PageShowTemplate> {
    let page = PageRepository::new(state.pool())
        .get_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("page {slug}")))?;

    Ok(PageShowTemplate {
        page: PageView::from(&page),
    })
}
