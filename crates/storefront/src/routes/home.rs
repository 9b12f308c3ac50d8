//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tower_sessions::Session;
use tracing::instrument;

use jyoti_core::{MenuQuery, SHOP, ShopInfo, catalog};

use crate::error::Result;
use crate::filters;
use crate::routes::chat::ChatTemplate;
use crate::routes::menu::{MenuView, ProductCardView};
use crate::state::AppState;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub shop: ShopInfo,
    pub best_sellers: Vec<ProductCardView>,
    pub menu: MenuView,
    pub cart_count: u64,
    pub chat: ChatTemplate,
}

/// Display the home page: best sellers, the full menu, cart badge and chat.
#[instrument(skip(state, session))]
pub async fn home(State(state): State<AppState>, session: Session) -> Result<HomeTemplate> {
    let visitor = state.visitors().resolve(&session).await?;
    let cart_count = visitor.cart().lock().await.count();
    let chat = ChatTemplate::from(&*visitor.chat().lock().await);

    Ok(HomeTemplate {
        shop: SHOP,
        best_sellers: catalog::best_sellers().map(ProductCardView::from).collect(),
        menu: MenuView::new(&MenuQuery::default()),
        cart_count,
        chat,
    })
}
