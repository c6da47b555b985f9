//! Back-office login and logout.

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
use crate::middleware::auth::{clear_current_admin, set_current_admin};
use crate::models::{CurrentAdmin, set_flash, take_flash};
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
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
        Ok(account) => {
            session.cycle_id().await.ok();
            set_current_admin(
                &session,
                &CurrentAdmin {
                    id: account.id,
                    email: account.email.clone(),
                    full_name: account.full_name.clone(),
                },
            )
            .await
            .map_err(|e| AppError::Internal(format!("failed to store session: {e}")))?;

            tracing::info!(admin_id = %account.id, "admin logged in");
            Ok(Redirect::to("/").into_response())
        }
        Err(err) => {
            tracing::warn!(email = %form.email, "admin login refused");
            set_flash(&session, &AppError::Auth(err).user_message()).await;
            Ok(Redirect::to("/auth/login").into_response())
        }
    }
}

/// Logout action.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_current_admin(&session).await {
        tracing::warn!("failed to clear admin session: {e}");
    }
    session.flush().await.ok();
    Redirect::to("/auth/login").into_response()
}
