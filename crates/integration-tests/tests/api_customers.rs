//! Integration tests for customers and login.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database (`ecshop migrate`)
//! - The storefront server running (`cargo run -p ecshop-storefront`)
//!
//! Run with: cargo test -p ecshop-integration-tests -- --ignored

use ecshop_integration_tests::{
    TEST_PASSWORD, base_url, client, create_customer, login, unique_email,
};
use reqwest::StatusCode;
use serde_json::{Value, json};

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_customer_lifecycle() {
    let client = client();
    let base_url = base_url();
    let email = unique_email("lifecycle");

    let created = create_customer(&client, &email).await;
    let id = &created["customerId"];
    assert_eq!(created["email"], email.as_str());
    assert!(created.get("password").is_none());
    assert!(created.get("passwordHash").is_none());

    let resp = client
        .get(format!("{base_url}/api/customers/email/{email}"))
        .send()
        .await
        .expect("Failed to look up by email");
    assert_eq!(resp.status(), StatusCode::OK);
    let found: Value = resp.json().await.expect("Failed to parse customer");
    assert_eq!(&found["customerId"], id);

    let resp = client
        .delete(format!("{base_url}/api/customers/{id}"))
        .send()
        .await
        .expect("Failed to delete customer");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = client
        .get(format!("{base_url}/api/customers/{id}"))
        .send()
        .await
        .expect("Failed to get customer");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_duplicate_email_is_conflict() {
    let client = client();
    let email = unique_email("duplicate");
    create_customer(&client, &email).await;

    let resp = client
        .post(format!("{}/api/customers", base_url()))
        .json(&json!({ "name": "Again", "email": email, "password": TEST_PASSWORD }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_short_password_is_rejected() {
    let resp = client()
        .post(format!("{}/api/customers", base_url()))
        .json(&json!({ "name": "Short", "email": unique_email("short"), "password": "abc" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_unknown_customer_is_404() {
    let resp = client()
        .get(format!("{}/api/customers/999999999", base_url()))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_login_and_me() {
    let client = client();
    let email = unique_email("login");
    let created = create_customer(&client, &email).await;

    let token = login(&client, &email, TEST_PASSWORD).await;

    let resp = client
        .get(format!("{}/api/auth/me", base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to fetch current customer");
    assert_eq!(resp.status(), StatusCode::OK);
    let me: Value = resp.json().await.expect("Failed to parse customer");
    assert_eq!(me["customerId"], created["customerId"]);
    assert!(me["lastLogin"].is_string());
}

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_login_with_wrong_password() {
    let client = client();
    let email = unique_email("wrong-password");
    create_customer(&client, &email).await;

    let resp = client
        .post(format!("{}/api/auth/login", base_url()))
        .json(&json!({ "email": email, "password": "not-the-password" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Login failed: invalid email or password");
    assert!(body.get("token").is_none());
}

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_customer_token_cannot_delete_all() {
    let client = client();
    let email = unique_email("not-admin");
    create_customer(&client, &email).await;
    let token = login(&client, &email, TEST_PASSWORD).await;

    let resp = client
        .delete(format!("{}/api/customers", base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}
