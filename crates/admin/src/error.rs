//! Unified error handling with Sentry integration for the back office.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::uploads::UploadError;

/// Application-level error type for the admin panel.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Storing an uploaded file failed.
    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated as admin.
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
    /// The operator-facing message for this error.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Database(RepositoryError::Conflict(msg)) => msg.clone(),
            Self::Database(_) | Self::Template(_) | Self::Internal(_) => {
                "Erro interno, tente novamente".to_string()
            }
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => "Credenciais inválidas".to_string(),
                _ => "Erro interno, tente novamente".to_string(),
            },
            Self::Upload(UploadError::UnsupportedType(_)) => {
                "Tipo de imagem não suportado".to_string()
            }
            Self::Upload(UploadError::Io(_)) => "Falha ao salvar a imagem".to_string(),
            Self::NotFound(_) => "Não encontrado".to_string(),
            Self::Unauthorized(_) => "Acesso negado".to_string(),
            Self::BadRequest(msg) => msg.clone(),
        }
    }

    fn is_server_error(&self) -> bool {
        match self {
            Self::Database(RepositoryError::Conflict(_) | RepositoryError::NotFound) => false,
            Self::Database(_) | Self::Template(_) | Self::Internal(_) => true,
            Self::Auth(err) => matches!(err, AuthError::Repository(_) | AuthError::Hash(_)),
            Self::Upload(err) => matches!(err, UploadError::Io(_)),
            _ => false,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Database(RepositoryError::NotFound) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(RepositoryError::Conflict(_)) => StatusCode::CONFLICT,
            Self::Database(_) | Self::Template(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Upload(UploadError::UnsupportedType(_)) | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Upload(UploadError::Io(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        };

        (status, self.user_message()).into_response()
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
            status_of(AppError::Auth(AuthError::InvalidCredentials)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(AppError::Upload(UploadError::UnsupportedType(
                "a.exe".to_string()
            ))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::Database(RepositoryError::NotFound)),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_conflict_message_is_preserved() {
        let err = AppError::Database(RepositoryError::Conflict("produto em uso".to_string()));
        assert_eq!(err.user_message(), "produto em uso");
        assert_eq!(status_of(err), StatusCode::CONFLICT);
    }
}
