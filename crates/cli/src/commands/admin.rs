//! Admin provisioning command.
//!
//! Creates the administrative identity directly against the database with
//! elevated credentials: the user row (promoting an existing account if the
//! email is already registered) plus its `admin` role row. Running it twice
//! is harmless.

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};

use reis_core::{Email, Role, UserId};

use super::{CommandError, connect};

/// Create (or promote) an admin user.
///
/// # Errors
///
/// Returns `CommandError::InvalidInput` for a malformed email and
/// `CommandError::Database` on query failures.
pub async fn create_admin(
    email: &str,
    password: &str,
    name: &str,
    phone: &str,
) -> Result<UserId, CommandError> {
    let email = Email::parse(email)
        .map_err(|e| CommandError::InvalidInput(format!("email: {e}")))?;
    if password.len() < 8 {
        return Err(CommandError::InvalidInput(
            "password must be at least 8 characters".to_string(),
        ));
    }
    let phone: String = phone.chars().filter(char::is_ascii_digit).collect();
    if phone.is_empty() {
        return Err(CommandError::InvalidInput("phone is required".to_string()));
    }

    let password_hash = hash_password(password)?;

    let pool = connect().await?;

    tracing::info!("Ensuring admin user: {}", email);

    // Create the account, or refresh the existing one's password and profile.
    let user_id: UserId = sqlx::query_scalar(
        r"
        INSERT INTO users (email, password_hash, full_name, phone)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (email)
        DO UPDATE SET password_hash = EXCLUDED.password_hash,
                      full_name = EXCLUDED.full_name,
                      phone = EXCLUDED.phone,
                      updated_at = NOW()
        RETURNING id
        ",
    )
    .bind(email.as_str())
    .bind(&password_hash)
    .bind(name)
    .bind(&phone)
    .fetch_one(&pool)
    .await?;

    tracing::info!("User ensured: {}", user_id);

    // Grant the admin role if it isn't there yet.
    sqlx::query(
        r"
        INSERT INTO user_roles (user_id, role)
        VALUES ($1, $2)
        ON CONFLICT (user_id, role) DO NOTHING
        ",
    )
    .bind(user_id)
    .bind(Role::Admin)
    .execute(&pool)
    .await?;

    tracing::info!("Admin role set for user: {}", user_id);
    tracing::warn!("The password was set from the command line; change it after first login.");

    Ok(user_id)
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, CommandError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| CommandError::Hash(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password_produces_phc_string() {
        let hash = hash_password("super secret").expect("hash");
        assert!(hash.starts_with("$argon2"));
    }
}
