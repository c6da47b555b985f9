//! Dashboard: status cards and the order workflow board.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tower_sessions::Session;
use tracing::instrument;

use reis_core::{OrderStatus, format_brl};

use crate::db::orders::OrderRepository;
use crate::error::Result;
use crate::middleware::RequireAdminAuth;
use crate::models::{CurrentAdmin, OrderWithCustomer, StatusCounts, take_flash};
use crate::services::whatsapp;
use crate::state::AppState;

/// One option of the per-order status selector.
pub struct StatusOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// One order on the workflow board.
pub struct OrderBoardView {
    pub id: i32,
    pub reference: String,
    pub customer_name: String,
    pub phone: String,
    pub delivery_address: String,
    pub payment_label: String,
    pub total: String,
    pub placed_at: String,
    pub notes: Option<String>,
    pub status_label: &'static str,
    pub status_options: Vec<StatusOption>,
    pub whatsapp_url: String,
}

impl OrderBoardView {
    fn new(order: &OrderWithCustomer, country_code: &str) -> Self {
        let reference = format!("#{:06}", order.id.as_i32());
        let phone = order.contact_phone().to_string();
        let whatsapp_url = whatsapp::link(
            country_code,
            &phone,
            &whatsapp::order_greeting(&order.customer_name, &reference),
        );

        Self {
            id: order.id.as_i32(),
            reference,
            customer_name: order.customer_name.clone(),
            phone,
            delivery_address: order.delivery_address.clone(),
            payment_label: format!("{} na entrega", order.payment_method.label()),
            total: format_brl(order.total),
            placed_at: order.created_at.format("%d/%m/%Y %H:%M").to_string(),
            notes: order.notes.clone(),
            status_label: order.status.label(),
            status_options: OrderStatus::ALL
                .iter()
                .map(|s| StatusOption {
                    value: s.as_str(),
                    label: s.label(),
                    selected: *s == order.status,
                })
                .collect(),
            whatsapp_url,
        }
    }
}

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub admin: CurrentAdmin,
    pub counts: StatusCounts,
    pub orders: Vec<OrderBoardView>,
    pub flash: Option<String>,
}

/// Dashboard: counts per status plus every order, newest first.
#[instrument(skip(admin, state, session))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
) -> Result<DashboardTemplate> {
    let repo = OrderRepository::new(state.pool());
    let counts = repo.status_counts().await?;
    let orders = repo.list_with_customers().await?;

    let country_code = &state.config().whatsapp_country_code;

    Ok(DashboardTemplate {
        admin,
        counts,
        orders: orders
            .iter()
            .map(|o| OrderBoardView::new(o, country_code))
            .collect(),
        flash: take_flash(&session).await,
    })
}
