//! Customer account queries.

use sqlx::PgPool;

use reis_core::{Email, Role, UserId};

use super::{RepositoryError, is_unique_violation};
use crate::models::User;

const USER_COLUMNS: &str =
    "id, email, full_name, phone, cpf, address, rg_url, created_at, updated_at";

/// Everything the registration form provides for a new account.
#[derive(Debug)]
pub struct NewUser<'a> {
    pub email: &'a Email,
    pub password_hash: &'a str,
    pub full_name: &'a str,
    pub phone: &'a str,
    pub cpf: &'a str,
    pub address: Option<&'a str>,
    pub rg_url: Option<&'a str>,
}

/// Repository for customer account operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by their email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let user =
            sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(id)
                .fetch_optional(self.pool)
                .await?;

        Ok(user)
    }

    /// Get a user together with their password hash, for login verification.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_with_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, UserWithHash>(&format!(
            "SELECT {USER_COLUMNS}, password_hash FROM users WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|r| (r.user, r.password_hash)))
    }

    /// Create a new customer account plus its `customer` role row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new_user: NewUser<'_>) -> Result<User, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let user = sqlx::query_as::<_, User>(&format!(
            r"
            INSERT INTO users (email, password_hash, full_name, phone, cpf, address, rg_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {USER_COLUMNS}
            "
        ))
        .bind(new_user.email.as_str())
        .bind(new_user.password_hash)
        .bind(new_user.full_name)
        .bind(new_user.phone)
        .bind(new_user.cpf)
        .bind(new_user.address)
        .bind(new_user.rg_url)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                RepositoryError::Conflict(format!("email already registered: {}", new_user.email))
            } else {
                RepositoryError::Database(e)
            }
        })?;

        sqlx::query("INSERT INTO user_roles (user_id, role) VALUES ($1, $2)")
            .bind(user.id)
            .bind(Role::Customer)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(user)
    }
}

/// Internal row shape for `get_with_password_hash`.
#[derive(sqlx::FromRow)]
struct UserWithHash {
    #[sqlx(flatten)]
    user: User,
    password_hash: String,
}
