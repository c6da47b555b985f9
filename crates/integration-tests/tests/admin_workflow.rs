//! Integration tests for the back-office order workflow.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database with the admin identity provisioned
//!   (reis-cli admin create -e admin@test.local -p 'test-password-1' ...)
//! - The admin panel running (cargo run -p reis-admin)
//!
//! Run with: cargo test -p reis-integration-tests -- --ignored

use reis_integration_tests::{admin_base_url, client_with_cookies};

/// Log in as the provisioned test admin.
async fn login_admin(client: &reqwest::Client) {
    let base_url = admin_base_url();
    let resp = client
        .post(format!("{base_url}/auth/login"))
        .form(&[
            ("email", "admin@test.local"),
            ("password", "test-password-1"),
        ])
        .send()
        .await
        .expect("login request");

    assert!(resp.status().is_redirection());
    let location = resp
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert_eq!(location, "/", "login should land on the dashboard");
}

#[tokio::test]
#[ignore = "Requires running admin panel and a provisioned database"]
async fn test_dashboard_requires_login() {
    let base_url = admin_base_url();
    let client = client_with_cookies();

    let resp = client
        .get(format!("{base_url}/"))
        .send()
        .await
        .expect("dashboard request");

    // Anonymous access bounces to the login page.
    assert!(resp.status().is_redirection());
}

#[tokio::test]
#[ignore = "Requires running admin panel and a provisioned database"]
async fn test_login_and_dashboard() {
    let base_url = admin_base_url();
    let client = client_with_cookies();
    login_admin(&client).await;

    let resp = client
        .get(format!("{base_url}/"))
        .send()
        .await
        .expect("dashboard request");
    assert_eq!(resp.status(), 200);

    let body = resp.text().await.expect("dashboard body");
    assert!(body.contains("Painel Administrativo"));
    assert!(body.contains("Pendentes"));
}

#[tokio::test]
#[ignore = "Requires running admin panel and a provisioned database"]
async fn test_wrong_password_is_refused() {
    let base_url = admin_base_url();
    let client = client_with_cookies();

    let resp = client
        .post(format!("{base_url}/auth/login"))
        .form(&[("email", "admin@test.local"), ("password", "wrong")])
        .send()
        .await
        .expect("login request");

    assert!(resp.status().is_redirection());
    let location = resp
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert_eq!(location, "/auth/login", "bad login should bounce back");
}

#[tokio::test]
#[ignore = "Requires running admin panel and a provisioned database"]
async fn test_finance_page_renders() {
    let base_url = admin_base_url();
    let client = client_with_cookies();
    login_admin(&client).await;

    let resp = client
        .get(format!("{base_url}/finance"))
        .send()
        .await
        .expect("finance request");
    assert_eq!(resp.status(), 200);

    let body = resp.text().await.expect("finance body");
    assert!(body.contains("Total do mês"));
    assert!(body.contains("Metas diárias"));
}

#[tokio::test]
#[ignore = "Requires running admin panel and a provisioned database"]
async fn test_best_sellers_page_renders() {
    let base_url = admin_base_url();
    let client = client_with_cookies();
    login_admin(&client).await;

    let resp = client
        .get(format!("{base_url}/finance/best-sellers?range=month"))
        .send()
        .await
        .expect("best sellers request");
    assert_eq!(resp.status(), 200);

    let body = resp.text().await.expect("best sellers body");
    assert!(body.contains("Itens mais vendidos"));
}
