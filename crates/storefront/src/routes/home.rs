//! Home page: the public catalog of active products.

use std::sync::Arc;

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use crate::db::products::ProductRepository;
use crate::error::Result;
use crate::filters;
use crate::models::Product;
use crate::state::{AppState, CatalogKey};

/// Product card display data.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: rust_decimal::Decimal,
    pub image_url: String,
    pub sold_out: bool,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i32(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            image_url: product
                .image_url
                .clone()
                .unwrap_or_else(|| "/static/placeholder.svg".to_string()),
            sold_out: product.stock == 0,
        }
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub products: Vec<ProductCardView>,
}

/// Home page: hero plus the active-products grid, newest first.
///
/// The listing is served from the catalog cache; a miss falls through to the
/// database.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> Result<HomeTemplate> {
    let pool = state.pool().clone();
    let products: Arc<Vec<Product>> = state
        .catalog_cache()
        .try_get_with(CatalogKey::ActiveProducts, async move {
            ProductRepository::new(&pool)
                .list_active()
                .await
                .map(Arc::new)
        })
        .await
        .map_err(|e: Arc<crate::db::RepositoryError>| {
            crate::error::AppError::Internal(e.to_string())
        })?;

    Ok(HomeTemplate {
        products: products.iter().map(ProductCardView::from).collect(),
    })
}
