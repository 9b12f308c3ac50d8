//! Menu grid route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::Query;
use serde::Deserialize;
use tracing::instrument;

use jyoti_core::{CategoryFilter, MenuQuery, Product, catalog};

use crate::error::Result;

/// Query string for the menu grid.
#[derive(Debug, Default, Deserialize)]
pub struct MenuParams {
    pub category: Option<String>,
    pub q: Option<String>,
}

impl MenuParams {
    /// Parse into a catalog query. Search text is trimmed; a missing or
    /// empty category means "All".
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` for an unknown category slug.
    pub fn into_query(self) -> Result<MenuQuery> {
        let category = self
            .category
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .parse::<CategoryFilter>()?;
        let search = self.q.as_deref().map(str::trim).unwrap_or_default();
        Ok(MenuQuery::new(category, search))
    }
}

/// A category tab.
#[derive(Clone)]
pub struct TabView {
    pub slug: &'static str,
    pub label: &'static str,
    pub active: bool,
}

/// Product card display data.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub unit: String,
    pub image: String,
    pub category: &'static str,
    pub best_seller: bool,
    pub pure_ghee: bool,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.to_string(),
            unit: product.unit.clone(),
            image: product.image.clone(),
            category: product.category.label(),
            best_seller: product.best_seller,
            pure_ghee: product.is_pure_ghee(),
        }
    }
}

/// Menu section display data: tabs, current search and matching products.
#[derive(Clone)]
pub struct MenuView {
    pub tabs: Vec<TabView>,
    pub search: String,
    pub products: Vec<ProductCardView>,
}

impl MenuView {
    /// Apply `query` to the catalog.
    #[must_use]
    pub fn new(query: &MenuQuery) -> Self {
        Self {
            tabs: CategoryFilter::tabs()
                .map(|tab| TabView {
                    slug: tab.slug(),
                    label: tab.label(),
                    active: tab == query.category,
                })
                .collect(),
            search: query.search.clone(),
            products: query
                .apply(catalog::catalog())
                .into_iter()
                .map(ProductCardView::from)
                .collect(),
        }
    }
}

/// Menu grid fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/menu.html")]
pub struct MenuTemplate {
    pub menu: MenuView,
}

/// Render the menu grid for a tab and search text.
#[instrument]
pub async fn grid(Query(params): Query<MenuParams>) -> Result<MenuTemplate> {
    let query = params.into_query()?;
    Ok(MenuTemplate {
        menu: MenuView::new(&query),
    })
}
