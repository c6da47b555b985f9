//! Back-office account lookup.

use sqlx::{FromRow, PgPool};

use reis_core::{Email, Role, UserId};

use super::RepositoryError;

/// The fields needed to verify an admin login.
#[derive(Debug, FromRow)]
pub struct AdminAccount {
    pub id: UserId,
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
}

/// Repository for admin authentication.
pub struct AdminRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AdminRepository<'a> {
    /// Create a new admin repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// A user by email, only if they hold the `admin` role.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_admin_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<AdminAccount>, RepositoryError> {
        let account = sqlx::query_as::<_, AdminAccount>(
            r"
            SELECT u.id, u.email, u.full_name, u.password_hash
            FROM users u
            JOIN user_roles r ON r.user_id = u.id AND r.role = $2
            WHERE u.email = $1
            ",
        )
        .bind(email.as_str())
        .bind(Role::Admin)
        .fetch_optional(self.pool)
        .await?;

        Ok(account)
    }
}
