//! Simulated checkout and brochure download.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tower_sessions::Session;
use tracing::{info, instrument};

use jyoti_core::{Price, SHOP};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Acknowledgement fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/notice.html")]
pub struct NoticeTemplate {
    pub title: String,
    pub message: String,
}

fn checkout_message(total: Price) -> String {
    format!(
        "Thank you for choosing {}! Your order total is {total}. This is a demo, but our treats in Teliyarganj are real!",
        SHOP.name
    )
}

/// Acknowledge a checkout. No payment is taken and the cart is kept.
#[instrument(skip(state, session))]
pub async fn checkout(State(state): State<AppState>, session: Session) -> Result<NoticeTemplate> {
    let visitor = state.visitors().resolve(&session).await?;
    let (total, count) = {
        let cart = visitor.cart().lock().await;
        (cart.total(), cart.count())
    };
    if count == 0 {
        return Err(AppError::EmptyCart);
    }

    info!(total = %total, items = count, "demo checkout");
    Ok(NoticeTemplate {
        title: "Order Placed".to_string(),
        message: checkout_message(total),
    })
}

/// Acknowledge a brochure download request.
#[instrument]
pub async fn brochure() -> NoticeTemplate {
    NoticeTemplate {
        title: "Brochure Download Started!".to_string(),
        message: format!("For bulk and festive orders, write to us at {}.", SHOP.email),
    }
}
