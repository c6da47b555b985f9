//! Customer registration data ("Meu Cadastro").

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use reis_core::Cpf;

use crate::db::users::UserRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Profile display data.
pub struct ProfileView {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub cpf: String,
    pub address: String,
    pub rg_url: Option<String>,
}

/// Profile page template.
#[derive(Template, WebTemplate)]
#[template(path = "profile/show.html")]
pub struct ProfileTemplate {
    pub profile: ProfileView,
}

/// The customer's registration data.
#[instrument(skip(state, user))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<ProfileTemplate> {
    let account = UserRepository::new(state.pool())
        .get_by_id(user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("cadastro".to_string()))?;

    // Stored CPFs are normalized digits; show them formatted.
    let cpf = account
        .cpf
        .as_deref()
        .and_then(|c| Cpf::parse(c).ok())
        .map_or_else(|| "-".to_string(), |c| c.formatted());

    Ok(ProfileTemplate {
        profile: ProfileView {
            full_name: account.full_name,
            email: account.email,
            phone: account.phone,
            cpf,
            address: account.address.unwrap_or_else(|| "-".to_string()),
            rg_url: account.rg_url,
        },
    })
}
