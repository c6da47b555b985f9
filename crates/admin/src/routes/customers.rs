//! Customer management.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use reis_core::{Cpf, UserId};

use crate::db::customers::{CustomerRepository, ProfileUpdate};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdminAuth;
use crate::models::{CustomerProfile, set_flash, take_flash};
use crate::services::whatsapp;
use crate::state::AppState;

/// List query params.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Free-text filter: name, CPF or phone digits.
    pub q: Option<String>,
}

/// Profile edit form data.
#[derive(Debug, Deserialize)]
pub struct EditForm {
    pub full_name: String,
    pub phone: String,
    pub cpf: Option<String>,
    pub address: Option<String>,
    pub rg_url: Option<String>,
}

/// One customer card on the list page.
pub struct CustomerView {
    pub id: i32,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub cpf: String,
    pub address: String,
    pub rg_url: Option<String>,
    pub whatsapp_url: String,
}

impl CustomerView {
    fn new(profile: &CustomerProfile, country_code: &str) -> Self {
        let cpf = profile
            .cpf
            .as_deref()
            .and_then(|c| Cpf::parse(c).ok())
            .map_or_else(|| "-".to_string(), |c| c.formatted());

        Self {
            id: profile.id.as_i32(),
            full_name: profile.full_name.clone(),
            email: profile.email.clone(),
            phone: profile.phone.clone(),
            cpf,
            address: profile.address.clone().unwrap_or_else(|| "-".to_string()),
            rg_url: profile.rg_url.clone(),
            whatsapp_url: whatsapp::link(
                country_code,
                &profile.phone,
                &whatsapp::contact_greeting(&profile.full_name),
            ),
        }
    }
}

/// The edit form's view of a profile.
pub struct CustomerEditView {
    pub id: i32,
    pub full_name: String,
    pub phone: String,
    pub cpf: String,
    pub address: String,
    pub rg_url: String,
}

/// Customer list template.
#[derive(Template, WebTemplate)]
#[template(path = "customers/index.html")]
pub struct CustomersIndexTemplate {
    pub customers: Vec<CustomerView>,
    pub query: String,
    pub flash: Option<String>,
}

/// Customer edit template.
#[derive(Template, WebTemplate)]
#[template(path = "customers/edit.html")]
pub struct CustomerEditTemplate {
    pub customer: CustomerEditView,
    pub flash: Option<String>,
}

/// Customer list, filtered by name/CPF/phone when `q` is given.
#[instrument(skip(_admin, state, session))]
pub async fn index(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
    session: Session,
) -> Result<CustomersIndexTemplate> {
    let profiles = CustomerRepository::new(state.pool()).list().await?;

    let q = query.q.unwrap_or_default();
    let country_code = &state.config().whatsapp_country_code;

    let customers = profiles
        .iter()
        .filter(|p| p.matches(&q))
        .map(|p| CustomerView::new(p, country_code))
        .collect();

    Ok(CustomersIndexTemplate {
        customers,
        query: q,
        flash: take_flash(&session).await,
    })
}

/// Customer edit form.
///
/// When the profile has no address on file, the most recent order's delivery
/// address is offered instead.
#[instrument(skip(_admin, state, session))]
pub async fn edit_page(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    session: Session,
) -> Result<CustomerEditTemplate> {
    let repo = CustomerRepository::new(state.pool());
    let id = UserId::new(id);

    let profile = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("cliente {id}")))?;

    let address = match &profile.address {
        Some(address) => address.clone(),
        None => repo.latest_order_address(id).await?.unwrap_or_default(),
    };

    Ok(CustomerEditTemplate {
        customer: CustomerEditView {
            id: profile.id.as_i32(),
            full_name: profile.full_name.clone(),
            phone: profile.phone.clone(),
            cpf: profile.cpf.clone().unwrap_or_default(),
            address,
            rg_url: profile.rg_url.clone().unwrap_or_default(),
        },
        flash: take_flash(&session).await,
    })
}

/// Update a customer profile.
#[instrument(skip(admin, state, session, form))]
pub async fn update(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    session: Session,
    Form(form): Form<EditForm>,
) -> Result<Response> {
    let id = UserId::new(id);

    let full_name = form.full_name.trim();
    if full_name.is_empty() {
        return Err(AppError::BadRequest("Nome é obrigatório".to_string()));
    }

    let phone: String = form.phone.chars().filter(char::is_ascii_digit).collect();
    if phone.is_empty() {
        return Err(AppError::BadRequest("Telefone é obrigatório".to_string()));
    }

    // An empty CPF clears the field; a present one must be valid.
    let cpf = match form.cpf.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        Some(raw) => Some(
            Cpf::parse(raw)
                .map_err(|_| AppError::BadRequest("CPF inválido".to_string()))?
                .into_inner(),
        ),
        None => None,
    };

    let address = form
        .address
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty());
    let rg_url = form
        .rg_url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty());

    CustomerRepository::new(state.pool())
        .update(
            id,
            &ProfileUpdate {
                full_name,
                phone: &phone,
                cpf: cpf.as_deref(),
                address,
                rg_url,
            },
        )
        .await?;

    tracing::info!(customer_id = %id, admin_id = %admin.id, "customer updated");
    set_flash(&session, "Cliente atualizado").await;

    Ok(Redirect::to("/customers").into_response())
}
