//! Order actions: status workflow and the printable declaration of content.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use reis_core::{Cpf, OrderId, OrderStatus, format_brl};

use crate::db::orders::OrderRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdminAuth;
use crate::models::set_flash;
use crate::state::AppState;

/// Status update form data.
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: String,
}

/// Set an order's status.
///
/// Any status may be set from any other; the workflow has no transition
/// guard. Only back-office staff ever reach this handler.
#[instrument(skip(admin, state, session))]
pub async fn update_status(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    session: Session,
    Form(form): Form<StatusForm>,
) -> Result<Response> {
    let status: OrderStatus = form
        .status
        .parse()
        .map_err(|_| AppError::BadRequest("Status inválido".to_string()))?;

    OrderRepository::new(state.pool())
        .set_status(OrderId::new(id), status)
        .await?;

    tracing::info!(order_id = id, admin_id = %admin.id, status = %status, "order status updated");
    set_flash(&session, "Status atualizado!").await;

    Ok(Redirect::to("/").into_response())
}

// =============================================================================
// Declaration of content
// =============================================================================

/// One item row on the declaration.
pub struct DeclarationItemView {
    pub name: String,
    pub quantity: i32,
    pub unit_price: String,
    pub subtotal: String,
}

/// Printable declaration-of-content document.
///
/// The document is rendered as print-ready HTML; turning it into paper (or
/// PDF) is the browser's job.
#[derive(Template, WebTemplate)]
#[template(path = "orders/declaration.html")]
pub struct DeclarationTemplate {
    pub store_legal_name: String,
    pub store_cnpj: String,
    pub order_reference: String,
    pub order_date: String,
    pub payment_label: String,
    pub total: String,
    pub customer_name: String,
    pub customer_cpf: String,
    pub customer_phone: String,
    pub delivery_address: String,
    pub items: Vec<DeclarationItemView>,
    pub printed_at: String,
}

/// Render the declaration of content for one order.
#[instrument(skip(_admin, state))]
pub async fn declaration(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<DeclarationTemplate> {
    let repo = OrderRepository::new(state.pool());
    let order_id = OrderId::new(id);

    let order = repo
        .get_with_customer(order_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("pedido {id}")))?;

    let items = repo
        .items(order_id)
        .await?
        .iter()
        .map(|item| DeclarationItemView {
            name: item.product_name.clone(),
            quantity: item.quantity,
            unit_price: format_brl(item.price),
            subtotal: format_brl(item.subtotal()),
        })
        .collect();

    let customer_cpf = Cpf::parse(&order.cpf)
        .map_or_else(|_| order.cpf.clone(), |c| c.formatted());

    let store = &state.config().store;

    Ok(DeclarationTemplate {
        store_legal_name: store.legal_name.clone(),
        store_cnpj: store.cnpj.clone(),
        order_reference: format!("#{:06}", order.id.as_i32()),
        order_date: order.created_at.format("%d/%m/%Y %H:%M").to_string(),
        payment_label: format!("{} na entrega", order.payment_method.label()),
        total: format_brl(order.total),
        customer_name: order.customer_name.clone(),
        customer_cpf,
        customer_phone: order.contact_phone().to_string(),
        delivery_address: order.delivery_address.clone(),
        items,
        printed_at: chrono::Utc::now().format("%d/%m/%Y %H:%M UTC").to_string(),
    })
}
