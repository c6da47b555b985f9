//! Integration tests for the storefront cart and checkout flow.
//!
//! These tests require:
//! - A migrated, seeded `PostgreSQL` database (reis-cli migrate && reis-cli seed)
//! - The storefront running (cargo run -p reis-storefront)
//!
//! Run with: cargo test -p reis-integration-tests -- --ignored

use reis_integration_tests::{client_with_cookies, storefront_base_url};

/// A CPF with valid check digits, for forms that validate it.
const VALID_CPF: &str = "529.982.247-25";

/// Register a throwaway customer and leave the client logged in.
async fn register_customer(client: &reqwest::Client, email: &str) {
    let base_url = storefront_base_url();
    let resp = client
        .post(format!("{base_url}/auth/register"))
        .form(&[
            ("email", email),
            ("password", "integration-pass-1"),
            ("full_name", "Cliente Teste"),
            ("phone", "(11) 98888-7777"),
            ("cpf", VALID_CPF),
            ("address", "Rua dos Testes, 42"),
        ])
        .send()
        .await
        .expect("register request");

    assert!(
        resp.status().is_redirection(),
        "registration should redirect, got {}",
        resp.status()
    );
}

#[tokio::test]
#[ignore = "Requires running storefront and a seeded database"]
async fn test_health_endpoints() {
    let base_url = storefront_base_url();
    let client = client_with_cookies();

    let resp = client
        .get(format!("{base_url}/health"))
        .send()
        .await
        .expect("health request");
    assert_eq!(resp.status(), 200);

    let resp = client
        .get(format!("{base_url}/health/ready"))
        .send()
        .await
        .expect("readiness request");
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
#[ignore = "Requires running storefront and a seeded database"]
async fn test_home_lists_products() {
    let client = client_with_cookies();
    let resp = client
        .get(storefront_base_url())
        .send()
        .await
        .expect("home request");
    assert_eq!(resp.status(), 200);

    let body = resp.text().await.expect("home body");
    assert!(body.contains("Produtos Exclusivos"));
}

#[tokio::test]
#[ignore = "Requires running storefront and a seeded database"]
async fn test_cart_roundtrip() {
    let base_url = storefront_base_url();
    let client = client_with_cookies();

    // Add product 1 to the cart.
    let resp = client
        .post(format!("{base_url}/cart/add"))
        .form(&[("product_id", "1"), ("quantity", "1")])
        .send()
        .await
        .expect("cart add");
    assert_eq!(resp.status(), 200);

    // The badge fragment now counts one unit.
    let count = client
        .get(format!("{base_url}/cart/count"))
        .send()
        .await
        .expect("cart count")
        .text()
        .await
        .expect("count body");
    assert!(count.contains('1'), "badge should show 1, got: {count}");

    // Remove it again.
    let resp = client
        .post(format!("{base_url}/cart/remove"))
        .form(&[("product_id", "1")])
        .send()
        .await
        .expect("cart remove");
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
#[ignore = "Requires running storefront and a seeded database"]
async fn test_checkout_requires_login() {
    let base_url = storefront_base_url();
    let client = client_with_cookies();

    let resp = client
        .post(format!("{base_url}/checkout"))
        .form(&[
            ("delivery_address", "Rua A, 1"),
            ("phone", "11999999999"),
            ("cpf", VALID_CPF),
            ("payment_method", "cash"),
        ])
        .send()
        .await
        .expect("checkout request");

    // Anonymous checkout bounces to the login page.
    assert!(resp.status().is_redirection());
}

#[tokio::test]
#[ignore = "Requires running storefront and a seeded database"]
async fn test_checkout_empty_cart_is_refused() {
    let base_url = storefront_base_url();
    let client = client_with_cookies();

    let email = format!("cliente+{}@test.local", std::process::id());
    register_customer(&client, &email).await;

    let resp = client
        .post(format!("{base_url}/checkout"))
        .form(&[
            ("delivery_address", "Rua A, 1"),
            ("phone", "11999999999"),
            ("cpf", VALID_CPF),
            ("payment_method", "cash"),
        ])
        .send()
        .await
        .expect("checkout request");

    // Refused checkouts flash a message and land back on the cart page.
    assert!(resp.status().is_redirection());
    let location = resp
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert_eq!(location, "/cart");
}
