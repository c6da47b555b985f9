//! Customer profile queries for the back office.

use sqlx::PgPool;

use reis_core::UserId;

use super::RepositoryError;
use crate::models::CustomerProfile;

const PROFILE_COLUMNS: &str = "id, email, full_name, phone, cpf, address, rg_url, created_at";

/// Editable profile fields.
#[derive(Debug)]
pub struct ProfileUpdate<'a> {
    pub full_name: &'a str,
    pub phone: &'a str,
    pub cpf: Option<&'a str>,
    pub address: Option<&'a str>,
    pub rg_url: Option<&'a str>,
}

/// Repository for customer management.
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All profiles ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<CustomerProfile>, RepositoryError> {
        let profiles = sqlx::query_as::<_, CustomerProfile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM users ORDER BY full_name ASC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(profiles)
    }

    /// One profile.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: UserId) -> Result<Option<CustomerProfile>, RepositoryError> {
        let profile = sqlx::query_as::<_, CustomerProfile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(profile)
    }

    /// Update a profile's contact fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the profile does not exist.
    pub async fn update(
        &self,
        id: UserId,
        update: &ProfileUpdate<'_>,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE users
            SET full_name = $2, phone = $3, cpf = $4, address = $5, rg_url = $6,
                updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(update.full_name)
        .bind(update.phone)
        .bind(update.cpf)
        .bind(update.address)
        .bind(update.rg_url)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// The delivery address of the customer's most recent order, used as a
    /// fallback when the profile has no address on file.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn latest_order_address(
        &self,
        id: UserId,
    ) -> Result<Option<String>, RepositoryError> {
        let address: Option<String> = sqlx::query_scalar(
            r"
            SELECT delivery_address
            FROM orders
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT 1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(address)
    }
}
