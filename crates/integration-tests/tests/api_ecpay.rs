//! Integration tests for the ECPay checkout pages.
//!
//! The server must run with the ECPay stage credentials (the defaults), or
//! with `ECPAY_HASH_KEY` / `ECPAY_HASH_IV` exported to the tests as well.
//! Requires a migrated database.

use ecshop_integration_tests::{
    base_url, client, create_category, create_customer, create_order, create_order_detail,
    create_product, unique_email,
};
use ecshop_core::PaymentStatus;
use ecshop_storefront::services::ecpay::check_mac;
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

fn hash_key() -> String {
    std::env::var("ECPAY_HASH_KEY").unwrap_or_else(|_| "pwFHCqoQZGmho4w6".to_string())
}

fn hash_iv() -> String {
    std::env::var("ECPAY_HASH_IV").unwrap_or_else(|_| "EkRm7iFT261dpevs".to_string())
}

/// Post a signed callback for `order_id` with the given `RtnCode`.
async fn post_callback(client: &Client, order_id: &Value, rtn_code: &str) -> String {
    let trade_no = format!("EC0101000000ID{order_id}");
    let mut params = vec![
        ("MerchantID", "3002607".to_string()),
        ("MerchantTradeNo", trade_no),
        ("RtnCode", rtn_code.to_string()),
        ("RtnMsg", if rtn_code == "1" { "Succeeded" } else { "Failed" }.to_string()),
        ("TradeAmt", "300".to_string()),
    ];
    let mac = check_mac::compute(
        params.iter().map(|(k, v)| (*k, v.as_str())),
        &hash_key(),
        &hash_iv(),
    );
    params.push((check_mac::CHECK_MAC_FIELD, mac));

    let resp = client
        .post(format!("{}/pages/ecpay/return", base_url()))
        .form(&params)
        .send()
        .await
        .expect("Failed to post callback");
    assert_eq!(resp.status(), StatusCode::OK);
    resp.text().await.expect("callback body")
}

async fn get_order(client: &Client, order_id: &Value) -> reqwest::Response {
    client
        .get(format!("{}/api/orders/{order_id}", base_url()))
        .send()
        .await
        .expect("Failed to get order")
}

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_send_renders_checkout_form() {
    let client = client();
    let customer = create_customer(&client, &unique_email("checkout")).await;
    let category = create_category(&client).await;
    let product = create_product(&client, &category["categoriesId"], 150.0).await;
    let order = create_order(&client, &customer["customerId"], 300.0).await;
    let order_id = &order["ordersId"];
    create_order_detail(&client, order_id, &product["productsId"], 2, 150.0).await;

    let resp = client
        .post(format!("{}/pages/ecpay/send", base_url()))
        .json(&json!({ "ordersId": order_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::OK);
    let html = resp.text().await.expect("html body");

    assert!(html.contains(r#"name="TotalAmount" value="300""#));
    assert!(html.contains(&format!("ID{order_id}\"")));
    assert!(html.contains("Oolong Tea 150g x 2"));
    assert!(html.contains(r#"name="CheckMacValue""#));
}

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_send_rejects_amount_mismatch() {
    let client = client();
    let customer = create_customer(&client, &unique_email("mismatch")).await;
    let order = create_order(&client, &customer["customerId"], 300.0).await;

    let resp = client
        .post(format!("{}/pages/ecpay/send", base_url()))
        .json(&json!({ "ordersId": order["ordersId"], "totalAmount": 1 }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_send_for_unknown_order_is_404() {
    let resp = client()
        .post(format!("{}/pages/ecpay/send", base_url()))
        .json(&json!({ "ordersId": 999_999_999 }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_paid_callback_marks_order_paid() {
    let client = client();
    let customer = create_customer(&client, &unique_email("paid")).await;
    let order = create_order(&client, &customer["customerId"], 300.0).await;
    let order_id = &order["ordersId"];

    assert_eq!(post_callback(&client, order_id, "1").await, "OK");

    let updated: Value = get_order(&client, order_id)
        .await
        .json()
        .await
        .expect("Failed to parse order");
    assert_eq!(updated["paymentStatus"], PaymentStatus::PAID);

    // A paid order cannot be checked out again
    let resp = client
        .post(format!("{}/pages/ecpay/send", base_url()))
        .json(&json!({ "ordersId": order_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_failed_callback_deletes_order() {
    let client = client();
    let customer = create_customer(&client, &unique_email("failed")).await;
    let category = create_category(&client).await;
    let product = create_product(&client, &category["categoriesId"], 300.0).await;
    let order = create_order(&client, &customer["customerId"], 300.0).await;
    let order_id = &order["ordersId"];
    create_order_detail(&client, order_id, &product["productsId"], 1, 300.0).await;

    assert_eq!(post_callback(&client, order_id, "10100058").await, "OK");

    assert_eq!(get_order(&client, order_id).await.status(), StatusCode::NOT_FOUND);
    let resp = client
        .get(format!("{}/api/order-details/order/{order_id}", base_url()))
        .send()
        .await
        .expect("Failed to send request");
    let lines: Vec<Value> = resp.json().await.expect("Failed to parse lines");
    assert!(lines.is_empty());
}

#[tokio::test]
#[ignore = "Requires running storefront server and PostgreSQL"]
async fn test_tampered_callback_is_ignored() {
    let client = client();
    let customer = create_customer(&client, &unique_email("tampered")).await;
    let order = create_order(&client, &customer["customerId"], 300.0).await;
    let order_id = &order["ordersId"];

    let body = format!(
        "MerchantTradeNo=EC0101000000ID{order_id}&RtnCode=1&RtnMsg=Succeeded&CheckMacValue=00FF"
    );
    let resp = client
        .post(format!("{}/pages/ecpay/return", base_url()))
        .header("content-type", "application/x-www-form-urlencoded")
        .body(body)
        .send()
        .await
        .expect("Failed to post callback");
    assert_eq!(resp.text().await.expect("body"), "OK");

    let unchanged: Value = get_order(&client, order_id)
        .await
        .json()
        .await
        .expect("Failed to parse order");
    assert_eq!(unchanged["paymentStatus"], "Pending");
}
