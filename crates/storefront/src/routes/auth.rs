//! Login, registration and logout.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::auth::{clear_current_user, set_current_user};
use crate::models::{CurrentUser, set_flash, take_flash};
use crate::services::auth::{AuthService, Registration};
use crate::state::AppState;

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub phone: String,
    pub cpf: String,
    pub address: Option<String>,
    pub rg_url: Option<String>,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub flash: Option<String>,
}

/// Registration page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub flash: Option<String>,
}

/// Login page.
#[instrument(skip(session))]
pub async fn login_page(session: Session) -> LoginTemplate {
    LoginTemplate {
        flash: take_flash(&session).await,
    }
}

/// Login action.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    match AuthService::new(state.pool())
        .login(&form.email, &form.password)
        .await
    {
        Ok(user) => {
            // A fresh session id on privilege change
            session.cycle_id().await.ok();
            set_current_user(
                &session,
                &CurrentUser {
                    id: user.id,
                    email: user.email.clone(),
                    full_name: user.full_name.clone(),
                },
            )
            .await
            .map_err(|e| AppError::Internal(format!("failed to store session: {e}")))?;

            tracing::info!(user_id = %user.id, "customer logged in");
            Ok(Redirect::to("/").into_response())
        }
        Err(err) => {
            set_flash(&session, &AppError::Auth(err).user_message()).await;
            Ok(Redirect::to("/auth/login").into_response())
        }
    }
}

/// Registration page.
#[instrument(skip(session))]
pub async fn register_page(session: Session) -> RegisterTemplate {
    RegisterTemplate {
        flash: take_flash(&session).await,
    }
}

/// Registration action: creates the account and logs it in.
#[instrument(skip(state, session, form))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Response> {
    let registration = Registration {
        email: &form.email,
        password: &form.password,
        full_name: &form.full_name,
        phone: &form.phone,
        cpf: &form.cpf,
        address: form.address.as_deref(),
        rg_url: form.rg_url.as_deref(),
    };

    match AuthService::new(state.pool()).register(registration).await {
        Ok(user) => {
            session.cycle_id().await.ok();
            set_current_user(
                &session,
                &CurrentUser {
                    id: user.id,
                    email: user.email.clone(),
                    full_name: user.full_name.clone(),
                },
            )
            .await
            .map_err(|e| AppError::Internal(format!("failed to store session: {e}")))?;

            tracing::info!(user_id = %user.id, "customer registered");
            Ok(Redirect::to("/").into_response())
        }
        Err(err) => {
            set_flash(&session, &AppError::Auth(err).user_message()).await;
            Ok(Redirect::to("/auth/register").into_response())
        }
    }
}

/// Logout action.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_current_user(&session).await {
        tracing::warn!("failed to clear session user: {e}");
    }
    session.flush().await.ok();
    Redirect::to("/").into_response()
}
