//! Customer account row type.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use reis_core::UserId;

/// A registered customer.
///
/// The password hash is never part of this type; it is fetched separately by
/// the auth service when verifying a login.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub full_name: String,
    pub phone: String,
    pub cpf: Option<String>,
    pub address: Option<String>,
    pub rg_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
