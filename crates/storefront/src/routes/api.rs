//! JSON API for the menu, cart and chat state.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Serialize;
use tower_sessions::Session;
use tracing::instrument;

use jyoti_core::{CartLine, CategoryFilter, ChatSession, Price, Product, catalog};

use crate::error::Result;
use crate::routes::menu::MenuParams;
use crate::state::AppState;

/// Filtered menu.
#[derive(Debug, Serialize)]
pub struct MenuResponse {
    pub category: CategoryFilter,
    pub search: String,
    pub products: Vec<&'static Product>,
}

/// Cart snapshot.
#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub lines: Vec<CartLine>,
    pub total: Price,
    pub count: u64,
}

/// `GET /api/menu`
#[instrument]
pub async fn menu(Query(params): Query<MenuParams>) -> Result<Json<MenuResponse>> {
    let query = params.into_query()?;
    let products = query.apply(catalog::catalog());
    Ok(Json(MenuResponse {
        category: query.category,
        search: query.search,
        products,
    }))
}

/// `GET /api/cart`
#[instrument(skip(state, session))]
pub async fn cart(State(state): State<AppState>, session: Session) -> Result<Json<CartResponse>> {
    let visitor = state.visitors().resolve(&session).await?;
    let cart = visitor.cart().lock().await;
    Ok(Json(CartResponse {
        lines: cart.lines().to_vec(),
        total: cart.total(),
        count: cart.count(),
    }))
}

/// `GET /api/chat`
#[instrument(skip(state, session))]
pub async fn chat(State(state): State<AppState>, session: Session) -> Result<Json<ChatSession>> {
    let visitor = state.visitors().resolve(&session).await?;
    let chat = visitor.chat().lock().await.clone();
    Ok(Json(chat))
}
