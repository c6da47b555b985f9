//! Session-stored values and their keys.

use serde::{Deserialize, Serialize};

use reis_core::UserId;

/// Keys under which values are stored in the tower-sessions session.
pub mod session_keys {
    /// The shopping cart ([`crate::models::Cart`]).
    pub const CART: &str = "cart";
    /// The logged-in customer ([`super::CurrentUser`]).
    pub const CURRENT_USER: &str = "current_user";
    /// One-shot message shown on the next page render.
    pub const FLASH: &str = "flash";
}

/// Store a one-shot message for the next page render.
pub async fn set_flash(session: &tower_sessions::Session, message: &str) {
    if let Err(e) = session.insert(session_keys::FLASH, message.to_string()).await {
        tracing::warn!("failed to store flash message: {e}");
    }
}

/// Take (and clear) the pending flash message, if any.
pub async fn take_flash(session: &tower_sessions::Session) -> Option<String> {
    session
        .remove::<String>(session_keys::FLASH)
        .await
        .ok()
        .flatten()
}

/// The logged-in customer, as carried in the session cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub email: String,
    pub full_name: String,
}
