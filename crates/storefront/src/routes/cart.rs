//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Every mutation answers with the re-rendered drawer and an `HX-Trigger`
//! so the badge refreshes itself.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use jyoti_core::{Cart, CartLine, ProductId, catalog};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::state::AppState;

/// Event name the badge and drawer listen for.
pub const CART_UPDATED_EVENT: &str = "cart-updated";

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub unit: String,
    pub image: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u64,
}

impl From<&CartLine> for CartItemView {
    fn from(line: &CartLine) -> Self {
        Self {
            id: line.product.id.to_string(),
            name: line.product.name.clone(),
            unit: line.product.unit.clone(),
            image: line.product.image.clone(),
            quantity: line.quantity(),
            price: line.product.price.to_string(),
            line_price: line.line_total().to_string(),
        }
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.lines().iter().map(CartItemView::from).collect(),
            subtotal: cart.total().to_string(),
            item_count: cart.count(),
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: String,
    pub delta: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: String,
}

/// Cart drawer fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_drawer.html")]
pub struct CartDrawerTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub cart_count: u64,
}

/// Drawer response that also tells the page the cart changed.
fn updated(cart: CartView) -> Response {
    (
        AppendHeaders([("HX-Trigger", CART_UPDATED_EVENT)]),
        CartDrawerTemplate { cart },
    )
        .into_response()
}

/// Display the cart drawer.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<CartDrawerTemplate> {
    let visitor = state.visitors().resolve(&session).await?;
    let cart = CartView::from(&*visitor.cart().lock().await);
    Ok(CartDrawerTemplate { cart })
}

/// Add one unit of a product (HTMX).
///
/// Unknown product ids are rejected with 404.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let id = ProductId::new(form.product_id);
    let product =
        catalog::find(&id).ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    let visitor = state.visitors().resolve(&session).await?;
    let cart = {
        let mut cart = visitor.cart().lock().await;
        cart.add_item(product);
        CartView::from(&*cart)
    };

    add_breadcrumb("cart", "Added to cart", &[("product_id", id.as_str())]);
    Ok(updated(cart))
}

/// Change a line's quantity by a signed delta (HTMX).
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let id = ProductId::new(form.product_id);
    let visitor = state.visitors().resolve(&session).await?;
    let cart = {
        let mut cart = visitor.cart().lock().await;
        cart.change_quantity(&id, form.delta);
        CartView::from(&*cart)
    };
    Ok(updated(cart))
}

/// Remove a line (HTMX).
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    let id = ProductId::new(form.product_id);
    let visitor = state.visitors().resolve(&session).await?;
    let cart = {
        let mut cart = visitor.cart().lock().await;
        cart.remove_item(&id);
        CartView::from(&*cart)
    };

    add_breadcrumb("cart", "Removed from cart", &[("product_id", id.as_str())]);
    Ok(updated(cart))
}

/// Get cart count badge (HTMX).
#[instrument(skip(state, session))]
pub async fn count(State(state): State<AppState>, session: Session) -> Result<CartCountTemplate> {
    let visitor = state.visitors().resolve(&session).await?;
    let cart_count = visitor.cart().lock().await.count();
    Ok(CartCountTemplate { cart_count })
}
