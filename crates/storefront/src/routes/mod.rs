//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /health                 - Health check
//!
//! # Menu
//! GET  /menu?category=&q=      - Menu grid fragment (HTMX)
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart drawer
//! POST /cart/add               - Add one unit (returns drawer, triggers cart-updated)
//! POST /cart/update            - Change quantity by delta (returns drawer)
//! POST /cart/remove            - Remove line (returns drawer)
//! GET  /cart/count             - Cart count badge
//!
//! # Simulated actions
//! POST /checkout               - Order acknowledgement with total
//! POST /brochure               - Brochure download acknowledgement
//!
//! # Chat host
//! GET  /chat                   - Transcript fragment
//! POST /chat                   - Send a message (rate limited per IP)
//!
//! # Reservations
//! GET  /reservations/new       - Reservation form fragment
//! POST /reservations           - Submit a reservation
//!
//! # JSON API
//! GET  /api/menu?category=&q=  - Filtered products
//! GET  /api/cart               - Cart lines, total and count
//! GET  /api/chat               - Transcript and pending flag
//! ```

pub mod api;
pub mod cart;
pub mod chat;
pub mod checkout;
pub mod home;
pub mod menu;
pub mod reservations;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::chat_rate_limiter;
use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create the chat routes router. Only sending is rate limited.
pub fn chat_routes() -> Router<AppState> {
    Router::new().route(
        "/",
        post(chat::send)
            .route_layer(chat_rate_limiter())
            .get(chat::show),
    )
}

/// Create the reservation routes router.
pub fn reservation_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(reservations::create))
        .route("/new", get(reservations::new))
}

/// Create the JSON API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/menu", get(api::menu))
        .route("/cart", get(api::cart))
        .route("/chat", get(api::chat))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/menu", get(menu::grid))
        .nest("/cart", cart_routes())
        .route("/checkout", post(checkout::checkout))
        .route("/brochure", post(checkout::brochure))
        .nest("/chat", chat_routes())
        .nest("/reservations", reservation_routes())
        .nest("/api", api_routes())
}
