//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Each visitor's cart store key is minted on the first cart operation and
//! kept in the session; every cart service call takes it explicitly.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{AppendHeaders, IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use driftwood_core::{ProductId, SessionKey};

use crate::error::AppError;
use crate::filters;
use crate::models::session::keys as session_keys;
use crate::services::cart::{CartError, CartView};
use crate::state::AppState;

// =============================================================================
// Session Helpers
// =============================================================================

/// Get the cart store key from the session, if one has been minted.
async fn existing_cart_key(session: &Session) -> Option<SessionKey> {
    session
        .get::<SessionKey>(session_keys::CART_KEY)
        .await
        .ok()
        .flatten()
}

/// Get the cart store key from the session, minting one on first use.
async fn ensure_cart_key(session: &Session) -> Result<SessionKey, AppError> {
    let existing = session
        .get::<SessionKey>(session_keys::CART_KEY)
        .await
        .map_err(|e| AppError::Internal(format!("session load: {e}")))?;
    if let Some(key) = existing {
        return Ok(key);
    }

    let key = SessionKey::generate();
    session
        .insert(session_keys::CART_KEY, &key)
        .await
        .map_err(|e| AppError::Internal(format!("session save: {e}")))?;
    Ok(key)
}

/// Split a cart failure into infrastructure errors (bubbled up) and
/// user-recoverable validation errors (rendered inline).
fn infra_error(err: CartError) -> AppError {
    match err {
        CartError::Catalog(e) => AppError::Catalog(e),
        // view() only fails on catalog faults; mutations route their
        // validation errors through the inline fragment path instead.
        other => AppError::Internal(other.to_string()),
    }
}

// =============================================================================
// Forms & Templates
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: i32,
    pub quantity: Option<u32>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: i32,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: i32,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Inline cart error fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_error.html")]
pub struct CartErrorTemplate {
    pub message: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display cart page.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
) -> Result<CartShowTemplate, AppError> {
    let cart = match existing_cart_key(&session).await {
        Some(key) => state.cart().view(&key).await.map_err(infra_error)?,
        None => CartView::empty(),
    };

    Ok(CartShowTemplate { cart })
}

/// Add item to cart (HTMX).
///
/// Returns the cart count badge plus an HTMX trigger so other fragments
/// refresh. Validation failures render an inline message without touching
/// the cart.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Response, AppError> {
    let key = ensure_cart_key(&session).await?;
    let quantity = form.quantity.unwrap_or(1);

    match state
        .cart()
        .add_item(&key, ProductId::new(form.product_id), quantity)
        .await
    {
        Ok(view) => Ok((
            AppendHeaders([("HX-Trigger", "cart-updated")]),
            CartCountTemplate {
                count: view.item_count,
            },
        )
            .into_response()),
        Err(CartError::Catalog(e)) => Err(AppError::Catalog(e)),
        Err(err) => Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            CartErrorTemplate {
                message: err.user_message(),
            },
        )
            .into_response()),
    }
}

/// Update cart item quantity (HTMX).
///
/// The quantity is absolute; zero removes the line.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response, AppError> {
    let key = ensure_cart_key(&session).await?;

    match state
        .cart()
        .update_item(&key, ProductId::new(form.product_id), form.quantity)
        .await
    {
        Ok(view) => Ok((
            AppendHeaders([("HX-Trigger", "cart-updated")]),
            CartItemsTemplate { cart: view },
        )
            .into_response()),
        Err(CartError::Catalog(e)) => Err(AppError::Catalog(e)),
        Err(err) => Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            CartErrorTemplate {
                message: err.user_message(),
            },
        )
            .into_response()),
    }
}

/// Remove item from cart (HTMX). Idempotent.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response, AppError> {
    let key = ensure_cart_key(&session).await?;

    let view = state
        .cart()
        .remove_item(&key, ProductId::new(form.product_id))
        .await
        .map_err(infra_error)?;

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate { cart: view },
    )
        .into_response())
}

/// Empty the cart (HTMX). Idempotent.
#[instrument(skip(state, session))]
pub async fn clear(State(state): State<AppState>, session: Session) -> Response {
    let cart = match existing_cart_key(&session).await {
        Some(key) => state.cart().clear_cart(&key).await,
        None => CartView::empty(),
    };

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate { cart },
    )
        .into_response()
}

/// Get cart count badge (HTMX).
#[instrument(skip(state, session))]
pub async fn count(
    State(state): State<AppState>,
    session: Session,
) -> Result<CartCountTemplate, AppError> {
    let count = match existing_cart_key(&session).await {
        Some(key) => {
            state
                .cart()
                .view(&key)
                .await
                .map_err(infra_error)?
                .item_count
        }
        None => 0,
    };

    Ok(CartCountTemplate { count })
}
