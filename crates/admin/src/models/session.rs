//! Session-stored values for the back office.

use serde::{Deserialize, Serialize};

use reis_core::UserId;

/// Keys under which values are stored in the admin session.
pub mod session_keys {
    /// The logged-in admin ([`super::CurrentAdmin`]).
    pub const CURRENT_ADMIN: &str = "current_admin";
    /// One-shot message shown on the next page render.
    pub const FLASH: &str = "flash";
}

/// The logged-in back-office user, as carried in the session cookie.
///
/// Only accounts holding the `admin` role ever reach this point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAdmin {
    pub id: UserId,
    pub email: String,
    pub full_name: String,
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
