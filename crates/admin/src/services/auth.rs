//! Back-office authentication.
//!
//! Same email + password scheme as the storefront, but the lookup only
//! matches accounts holding the `admin` role, so a customer password can
//! never open the panel.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordVerifier},
};
use sqlx::PgPool;

use reis_core::Email;

use crate::db::RepositoryError;
use crate::db::admins::{AdminAccount, AdminRepository};

/// Errors from admin login.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Email/password mismatch, or the account holds no admin role.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Password verification failed internally.
    #[error("password hashing error: {0}")]
    Hash(String),

    /// Underlying repository failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Admin authentication service.
pub struct AuthService<'a> {
    admins: AdminRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new admin auth service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            admins: AdminRepository::new(pool),
        }
    }

    /// Login with email and password; requires the `admin` role.
    ///
    /// A missing account, a wrong password and a missing role are all the
    /// same `InvalidCredentials` to the caller.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` on any mismatch.
    pub async fn login(&self, email: &str, password: &str) -> Result<AdminAccount, AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let account = self
            .admins
            .get_admin_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let parsed =
            PasswordHash::new(&account.password_hash).map_err(|e| AuthError::Hash(e.to_string()))?;
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .map_err(|_| AuthError::InvalidCredentials)?;

        Ok(account)
    }
}
