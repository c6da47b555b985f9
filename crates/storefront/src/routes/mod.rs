//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page (catalog of active products)
//! GET  /health                 - Health check
//!
//! # Products
//! GET  /products/{id}          - Product detail
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart page with the checkout form
//! POST /cart/add               - Add to cart (returns count, triggers cart-updated)
//! POST /cart/update            - Update quantity (returns cart_items fragment)
//! POST /cart/remove            - Remove item (returns cart_items fragment)
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Checkout
//! POST /checkout               - Validate and place the order
//!
//! # Orders (requires auth)
//! GET  /orders                 - The customer's order history
//!
//! # Profile (requires auth)
//! GET  /profile                - Registration data
//!
//! # Auth
//! GET  /auth/login             - Login page
//! POST /auth/login             - Login action
//! GET  /auth/register          - Register page
//! POST /auth/register          - Register action
//! POST /auth/logout            - Logout action
//! ```

pub mod auth;
pub mod cart;
pub mod home;
pub mod orders;
pub mod products;
pub mod profile;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::rate_limit;
use crate::state::AppState;

/// Create the auth routes router (rate-limited).
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
        .layer(rate_limit::auth_rate_limiter())
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/products/{id}", get(products::show))
        .nest("/cart", cart_routes())
        .route(
            "/checkout",
            post(cart::checkout).layer(rate_limit::checkout_rate_limiter()),
        )
        .route("/orders", get(orders::index))
        .route("/profile", get(profile::show))
        .nest("/auth", auth_routes())
}
