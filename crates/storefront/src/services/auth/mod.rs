//! Authentication service.
//!
//! Email + password accounts, Argon2id hashed. Registration collects the
//! delivery profile (name, phone, CPF, address, optional RG document link)
//! in the same step, matching the single signup form of the shop.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use reis_core::{Cpf, Email};

use crate::db::RepositoryError;
use crate::db::users::{NewUser, UserRepository};
use crate::models::User;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Registration form data, still unvalidated.
#[derive(Debug)]
pub struct Registration<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub full_name: &'a str,
    pub phone: &'a str,
    pub cpf: &'a str,
    pub address: Option<&'a str>,
    pub rg_url: Option<&'a str>,
}

/// Authentication service over the users repository.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new customer account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` / `InvalidCpf` / `WeakPassword` /
    /// `MissingField` on validation failures and `UserAlreadyExists` if the
    /// email is taken.
    pub async fn register(&self, form: Registration<'_>) -> Result<User, AuthError> {
        let email = Email::parse(form.email)?;
        validate_password(form.password)?;
        let cpf = Cpf::parse(form.cpf)?;

        let full_name = form.full_name.trim();
        if full_name.is_empty() {
            return Err(AuthError::MissingField("nome"));
        }
        let phone = digits_only(form.phone);
        if phone.is_empty() {
            return Err(AuthError::MissingField("telefone"));
        }

        let password_hash = hash_password(form.password)?;

        let user = self
            .users
            .create(NewUser {
                email: &email,
                password_hash: &password_hash,
                full_name,
                phone: &phone,
                cpf: cpf.as_str(),
                address: form.address.map(str::trim).filter(|a| !a.is_empty()),
                rg_url: form.rg_url.map(str::trim).filter(|u| !u.is_empty()),
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let (user, password_hash) = self
            .users
            .get_with_password_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        Ok(user)
    }
}

/// Validate password strength.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "a senha deve ter pelo menos {MIN_PASSWORD_LENGTH} caracteres"
        )));
    }
    Ok(())
}

/// Hash a password using Argon2id.
pub(crate) fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AuthError::Hash(e.to_string()))
}

/// Verify a password against a stored Argon2 hash.
pub(crate) fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed = PasswordHash::new(hash).map_err(|e| AuthError::Hash(e.to_string()))?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AuthError::InvalidCredentials)
}

/// Strip everything but ASCII digits (phone numbers arrive formatted).
fn digits_only(s: &str) -> String {
    s.chars().filter(char::is_ascii_digit).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(verify_password("correct horse battery", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong password", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_validate_password_too_short() {
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(validate_password("long enough").is_ok());
    }

    #[test]
    fn test_digits_only() {
        assert_eq!(digits_only("(11) 99999-9999"), "11999999999");
        assert_eq!(digits_only("abc"), "");
    }
}
