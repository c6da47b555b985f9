//! HTTP route handlers for the back office.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                                 - Dashboard: status cards + order workflow
//! GET  /health                           - Health check
//!
//! # Orders
//! POST /orders/{id}/status               - Set an order's status
//! GET  /orders/{id}/declaration          - Printable declaration of content
//!
//! # Products
//! GET  /products                         - Product list
//! GET  /products/new                     - New product form
//! POST /products/new                     - Create product (multipart)
//! GET  /products/{id}/edit               - Edit form
//! POST /products/{id}/edit               - Update product (multipart)
//! POST /products/{id}/delete             - Delete product
//! POST /products/{id}/images/{image_id}/delete - Remove a gallery image
//!
//! # Customers
//! GET  /customers                        - Customer list (?q= filter)
//! GET  /customers/{id}/edit              - Edit form
//! POST /customers/{id}/edit              - Update profile
//!
//! # Finance
//! GET  /finance                          - Month/year revenue and daily goals
//! POST /finance/goals                    - Upsert daily goals
//! POST /finance/goals/auto               - Generate goals from last week
//! GET  /finance/best-sellers             - Best-seller ranking
//!
//! # Auth
//! GET  /auth/login                       - Login page
//! POST /auth/login                       - Login action
//! POST /auth/logout                      - Logout action
//! ```

pub mod auth;
pub mod best_sellers;
pub mod customers;
pub mod dashboard;
pub mod finance;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create all routes for the admin panel.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::index))
        // Orders
        .route("/orders/{id}/status", post(orders::update_status))
        .route("/orders/{id}/declaration", get(orders::declaration))
        // Products
        .route("/products", get(products::index))
        .route(
            "/products/new",
            get(products::new_page).post(products::create),
        )
        .route(
            "/products/{id}/edit",
            get(products::edit_page).post(products::update),
        )
        .route("/products/{id}/delete", post(products::delete))
        .route(
            "/products/{id}/images/{image_id}/delete",
            post(products::delete_image),
        )
        // Customers
        .route("/customers", get(customers::index))
        .route(
            "/customers/{id}/edit",
            get(customers::edit_page).post(customers::update),
        )
        // Finance
        .route("/finance", get(finance::index))
        .route("/finance/goals", post(finance::save_goals))
        .route("/finance/goals/auto", post(finance::auto_goals))
        .route("/finance/best-sellers", get(best_sellers::index))
        // Auth
        .route("/auth/login", get(auth::login_page).post(auth::login))
        .route("/auth/logout", post(auth::logout))
}
