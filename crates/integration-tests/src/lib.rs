//! Integration tests for EC Shop.
//!
//! # Running Tests
//!
//! ```bash
//! # Migrate and start the server against a scratch database
//! cargo run -p ecshop-cli -- migrate
//! cargo run -p ecshop-storefront
//!
//! # Run the ignored tests
//! cargo test -p ecshop-integration-tests -- --ignored
//! ```
//!
//! `STOREFRONT_BASE_URL` overrides the default `http://localhost:8080`.
//! Tests that need an administrator read `ECSHOP_ADMIN_EMAIL` and
//! `ECSHOP_ADMIN_PASSWORD` (create one with `ecshop customer create --admin`).

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use uuid::Uuid;

/// Base URL for the storefront API.
#[must_use]
pub fn base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:8080".to_string())
}

/// HTTP client for the tests.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .build()
        .expect("Failed to create HTTP client")
}

/// An email address no other test run has used.
#[must_use]
pub fn unique_email(label: &str) -> String {
    format!("{label}-{}@example.com", Uuid::new_v4().simple())
}

/// Password that satisfies the length rule.
pub const TEST_PASSWORD: &str = "correct-horse-battery";

async fn post_json(client: &Client, path: &str, body: &Value) -> Value {
    let resp = client
        .post(format!("{}{path}", base_url()))
        .json(body)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::CREATED, "POST {path}");
    resp.json().await.expect("Failed to parse response")
}

/// Register a customer and return the created record.
///
/// # Panics
///
/// Panics if the server rejects the request.
pub async fn create_customer(client: &Client, email: &str) -> Value {
    post_json(
        client,
        "/api/customers",
        &json!({
            "name": "Integration Test",
            "email": email,
            "password": TEST_PASSWORD,
            "phoneNumber": "0912345678",
        }),
    )
    .await
}

/// Create an active category with a unique name.
///
/// # Panics
///
/// Panics if the server rejects the request.
pub async fn create_category(client: &Client) -> Value {
    post_json(
        client,
        "/api/categories",
        &json!({ "categoriesName": format!("Category {}", Uuid::new_v4().simple()) }),
    )
    .await
}

/// Create a product priced at `price` in `category_id`.
///
/// # Panics
///
/// Panics if the server rejects the request.
pub async fn create_product(client: &Client, category_id: &Value, price: f64) -> Value {
    post_json(
        client,
        "/api/products",
        &json!({
            "categoriesId": category_id,
            "productName": "Oolong Tea 150g",
            "sku": format!("SKU-{}", Uuid::new_v4().simple()),
            "price": price,
            "quantityInStock": 20,
        }),
    )
    .await
}

/// Create an unpaid order for `customer_id`.
///
/// # Panics
///
/// Panics if the server rejects the request.
pub async fn create_order(client: &Client, customer_id: &Value, total: f64) -> Value {
    post_json(
        client,
        "/api/orders",
        &json!({
            "customerId": customer_id,
            "totalAmount": total,
            "paymentStatus": "Pending",
            "shippingStatus": "Processing",
        }),
    )
    .await
}

/// Add a line to an order.
///
/// # Panics
///
/// Panics if the server rejects the request.
pub async fn create_order_detail(
    client: &Client,
    order_id: &Value,
    product_id: &Value,
    quantity: i32,
    unit_price: f64,
) -> Value {
    post_json(
        client,
        "/api/order-details",
        &json!({
            "ordersId": order_id,
            "productsId": product_id,
            "quantity": quantity,
            "unitPrice": unit_price,
        }),
    )
    .await
}

/// Log in and return the bearer token.
///
/// # Panics
///
/// Panics if the login fails.
pub async fn login(client: &Client, email: &str, password: &str) -> String {
    let resp = client
        .post(format!("{}/api/auth/login", base_url()))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to log in");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse login response");
    body["token"]
        .as_str()
        .expect("login response carries a token")
        .to_string()
}
