//! Authentication error type.

use reis_core::{CpfError, EmailError};

use crate::db::RepositoryError;

/// Errors from registration and login.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The email address failed validation.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// The CPF failed validation.
    #[error("invalid CPF: {0}")]
    InvalidCpf(#[from] CpfError),

    /// The password does not meet requirements.
    #[error("weak password: {0}")]
    WeakPassword(String),

    /// A required registration field is empty.
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// An account already exists for this email.
    #[error("account already exists")]
    UserAlreadyExists,

    /// Email or password did not match.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Password hashing or verification failed internally.
    #[error("password hashing error: {0}")]
    Hash(String),

    /// Underlying repository failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
