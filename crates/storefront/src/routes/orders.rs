//! Customer order history.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tower_sessions::Session;
use tracing::instrument;

use reis_core::format_brl;

use crate::db::orders::OrderRepository;
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::{Order, take_flash};
use crate::state::AppState;

/// One order, formatted for the history page.
pub struct OrderView {
    pub id: i32,
    pub reference: String,
    pub status: &'static str,
    pub status_label: &'static str,
    pub payment_label: String,
    pub delivery_address: String,
    pub notes: Option<String>,
    pub total: String,
    pub placed_at: String,
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.as_i32(),
            reference: format!("#{:06}", order.id.as_i32()),
            status: order.status.as_str(),
            status_label: order.status.label(),
            payment_label: format!("{} na entrega", order.payment_method.label()),
            delivery_address: order.delivery_address.clone(),
            notes: order.notes.clone(),
            total: format_brl(order.total),
            placed_at: order
                .created_at
                .format("%d/%m/%Y %H:%M")
                .to_string(),
        }
    }
}

/// Order history template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersIndexTemplate {
    pub orders: Vec<OrderView>,
    pub flash: Option<String>,
}

/// The customer's orders, newest first.
#[instrument(skip(state, session, user))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
) -> Result<OrdersIndexTemplate> {
    let orders = OrderRepository::new(state.pool())
        .list_for_user(user.id)
        .await?;

    Ok(OrdersIndexTemplate {
        orders: orders.iter().map(OrderView::from).collect(),
        flash: take_flash(&session).await,
    })
}
