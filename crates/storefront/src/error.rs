//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side errors to
//! Sentry before responding to the client. Route handlers return
//! `Result<T, AppError>`.
//!
//! Every failure reaches the customer as one message on the page it came
//! from; what differs is the text, not the treatment. Validation errors keep
//! their specific wording, infrastructure errors are collapsed to a generic
//! one.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::checkout::CheckoutError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Checkout was refused.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Template rendering failed.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// The customer-facing message for this error.
    ///
    /// Validation errors keep their specific wording; infrastructure
    /// failures collapse to a generic one so internals never leak.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Database(_) | Self::Template(_) | Self::Internal(_) => {
                "Erro interno, tente novamente".to_string()
            }
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => "Email ou senha incorretos".to_string(),
                AuthError::UserAlreadyExists => "Já existe uma conta com este email".to_string(),
                AuthError::InvalidEmail(_) => "Email inválido".to_string(),
                AuthError::InvalidCpf(_) => "CPF inválido".to_string(),
                AuthError::WeakPassword(msg) => msg.clone(),
                AuthError::MissingField(field) => format!("Preencha o campo {field}"),
                AuthError::Repository(_) | AuthError::Hash(_) => {
                    "Erro interno, tente novamente".to_string()
                }
            },
            Self::Checkout(err) => match err {
                CheckoutError::Repository(_) => "Erro ao finalizar pedido".to_string(),
                other => other.to_string(),
            },
            Self::NotFound(_) => "Não encontrado".to_string(),
            Self::Unauthorized(_) => "Faça login para continuar".to_string(),
            Self::BadRequest(msg) => msg.clone(),
        }
    }

    /// Whether this error is a server-side failure worth reporting.
    fn is_server_error(&self) -> bool {
        match self {
            Self::Database(_) | Self::Template(_) | Self::Internal(_) => true,
            Self::Auth(err) => matches!(
                err,
                AuthError::Repository(_) | AuthError::Hash(_)
            ),
            Self::Checkout(err) => matches!(err, CheckoutError::Repository(_)),
            _ => false,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Database(_) | Self::Template(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::UserAlreadyExists => StatusCode::CONFLICT,
                AuthError::Repository(_) | AuthError::Hash(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
                _ => StatusCode::BAD_REQUEST,
            },
            Self::Checkout(err) => match err {
                CheckoutError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
                _ => StatusCode::BAD_REQUEST,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let message = self.user_message();

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            status_of(AppError::NotFound("x".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(AppError::Unauthorized("x".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(AppError::BadRequest("x".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::Internal("x".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_checkout_validation_is_client_error() {
        let err = AppError::Checkout(CheckoutError::EmptyCart);
        assert!(!err.is_server_error());
        assert_eq!(status_of(err), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_auth_conflict_status() {
        assert_eq!(
            status_of(AppError::Auth(AuthError::UserAlreadyExists)),
            StatusCode::CONFLICT
        );
    }
}
