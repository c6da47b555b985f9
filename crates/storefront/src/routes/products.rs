//! Product detail page.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use tracing::instrument;

use reis_core::ProductId;

use crate::db::products::ProductRepository;
use crate::error::{AppError, Result};
use crate::filters;
use crate::models::Product;
use crate::state::AppState;

/// Stock at or below this renders the urgency bar.
const URGENCY_THRESHOLD: i32 = 10;

/// Product detail display data.
pub struct ProductDetailView {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: rust_decimal::Decimal,
    pub image_url: String,
    pub gallery: Vec<String>,
    pub stock: i32,
    pub cpf_limit: Option<i32>,
    pub blocked: bool,
    pub sold_out: bool,
    /// Highest quantity the selector offers (stock and cap folded).
    pub max_quantity: i64,
    /// Urgency bar fill percentage, when the bar is shown.
    pub urgency_pct: Option<i32>,
}

impl ProductDetailView {
    fn new(product: &Product, gallery: Vec<String>) -> Self {
        let urgency_pct = (product.stock > 0 && product.stock <= URGENCY_THRESHOLD)
            .then(|| (product.stock * 100 / URGENCY_THRESHOLD).clamp(5, 100));

        Self {
            id: product.id.as_i32(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            image_url: product
                .image_url
                .clone()
                .or_else(|| gallery.first().cloned())
                .unwrap_or_else(|| "/static/placeholder.svg".to_string()),
            gallery,
            stock: product.stock,
            cpf_limit: product.cpf_limit,
            blocked: product.cpf_limit == Some(0),
            sold_out: product.stock == 0,
            max_quantity: product.max_order_quantity(),
            urgency_pct,
        }
    }
}

/// Product detail template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: ProductDetailView,
}

/// Product detail page.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<ProductShowTemplate> {
    let repo = ProductRepository::new(state.pool());
    let id = ProductId::new(id);

    let product = repo
        .get(id)
        .await?
        .filter(|p| p.is_active)
        .ok_or_else(|| AppError::NotFound(format!("produto {id}")))?;

    let gallery = repo
        .images(id)
        .await?
        .into_iter()
        .map(|img| img.image_url)
        .collect();

    Ok(ProductShowTemplate {
        product: ProductDetailView::new(&product, gallery),
    })
}
