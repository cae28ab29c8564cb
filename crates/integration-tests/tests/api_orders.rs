//! Integration tests for orders, order lines and payments.
//!
//! Requires a migrated database and a running storefront server.

use ecshop_integration_tests::{
    base_url, client, create_category, create_customer, create_order, create_order_detail,
    create_product, unique_email,
};
use reqwest::StatusCode;
use serde_json::{Value, json};

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_last_order_id() {
    let client = client();
    let customer = create_customer(&client, &unique_email("last-order")).await;
    let order = create_order(&client, &customer["customerId"], 250.0).await;

    let resp = client
        .get(format!("{}/api/orders/last", base_url()))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::OK);
    let last: Value = resp.json().await.expect("Failed to parse id");

    // Other tests may create orders concurrently
    assert!(last.as_i64().expect("bare id") >= order["ordersId"].as_i64().expect("id"));
}

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_partial_order_update() {
    let client = client();
    let customer = create_customer(&client, &unique_email("patch-order")).await;
    let order = create_order(&client, &customer["customerId"], 99.0).await;
    let id = &order["ordersId"];

    let resp = client
        .put(format!("{}/api/orders/{id}", base_url()))
        .json(&json!({ "shippingStatus": "Shipped", "trackingNumber": "TW123" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = resp.json().await.expect("Failed to parse order");
    assert_eq!(updated["shippingStatus"], "Shipped");
    assert_eq!(updated["trackingNumber"], "TW123");
    assert_eq!(updated["paymentStatus"], order["paymentStatus"]);
    assert_eq!(updated["totalAmount"], order["totalAmount"]);
}

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_order_line_summaries() {
    let client = client();
    let customer = create_customer(&client, &unique_email("summary")).await;
    let category = create_category(&client).await;
    let product = create_product(&client, &category["categoriesId"], 150.0).await;
    let order = create_order(&client, &customer["customerId"], 300.0).await;
    let order_id = &order["ordersId"];
    create_order_detail(&client, order_id, &product["productsId"], 2, 150.0).await;

    let resp = client
        .get(format!("{}/api/order-details/order/{order_id}", base_url()))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::OK);
    let lines: Vec<Value> = resp.json().await.expect("Failed to parse lines");
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["productName"], product["productName"]);
    assert_eq!(lines[0]["quantity"], 2);
}

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_discount_above_unit_price_is_rejected() {
    let client = client();
    let customer = create_customer(&client, &unique_email("discount")).await;
    let category = create_category(&client).await;
    let product = create_product(&client, &category["categoriesId"], 50.0).await;
    let order = create_order(&client, &customer["customerId"], 50.0).await;

    let resp = client
        .post(format!("{}/api/order-details", base_url()))
        .json(&json!({
            "ordersId": order["ordersId"],
            "productsId": product["productsId"],
            "quantity": 1,
            "unitPrice": 50,
            "discount": 60,
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_payment_by_order() {
    let client = client();
    let base_url = base_url();
    let customer = create_customer(&client, &unique_email("payment")).await;
    let order = create_order(&client, &customer["customerId"], 420.0).await;
    let order_id = &order["ordersId"];

    let resp = client
        .get(format!("{base_url}/api/payments/order/{order_id}"))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = client
        .post(format!("{base_url}/api/payments"))
        .json(&json!({
            "ordersId": order_id,
            "paymentMethod": "Credit",
            "transactionAmount": 420,
            "transactionStatus": "Success",
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = client
        .get(format!("{base_url}/api/payments/order/{order_id}"))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .delete(format!("{base_url}/api/payments/order/{order_id}"))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}
