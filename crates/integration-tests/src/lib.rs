//! Integration tests for Reis Imports.
//!
//! # Running Tests
//!
//! The live tests drive real servers over HTTP and are `#[ignore]`d by
//! default. To run them:
//!
//! ```bash
//! # migrate and seed a local database
//! cargo run -p reis-cli -- migrate
//! cargo run -p reis-cli -- seed
//! cargo run -p reis-cli -- admin create -e admin@test.local -p 'test-password-1' -n Admin --phone 11999999999
//!
//! # start both binaries, then
//! cargo test -p reis-integration-tests -- --ignored
//! ```
//!
//! Base URLs are configurable via `STOREFRONT_BASE_URL` and
//! `ADMIN_BASE_URL`.

/// Base URL for the storefront (configurable via environment).
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Base URL for the admin panel (configurable via environment).
#[must_use]
pub fn admin_base_url() -> String {
    std::env::var("ADMIN_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

/// A client with a cookie store, so sessions survive across requests.
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
pub fn client_with_cookies() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_base_urls() {
        assert!(storefront_base_url().starts_with("http"));
        assert!(admin_base_url().starts_with("http"));
    }
}
