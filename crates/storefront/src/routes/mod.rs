//! HTTP route handlers for the storefront API.
//!
//! # Route Structure
//!
//! ```text
//! # Customers
//! GET    /api/customers                       - List customers
//! POST   /api/customers                       - Register a customer
//! DELETE /api/customers                       - Delete all (admin)
//! GET    /api/customers/{id}                  - Customer by ID
//! PUT    /api/customers/{id}                  - Update profile fields
//! DELETE /api/customers/{id}                  - Delete customer
//! GET    /api/customers/email/{email}         - Lookup by email
//! GET    /api/customers/name/{name}           - Lookup by name
//! GET    /api/customers/phone/{phone}         - Lookup by phone number
//!
//! # Catalog
//! GET|POST|DELETE     /api/categories
//! GET|PUT|DELETE      /api/categories/{id}
//! GET    /api/categories/name/{name}
//! GET    /api/categories/status/{is_active}
//! GET|POST|DELETE     /api/products
//! GET|PUT|POST|DELETE /api/products/{id}
//! PUT    /api/products/{id}/update-stock      - Body is the new stock level
//! GET    /api/products/name/{name}
//! GET    /api/products/category/{id}
//! GET    /api/products/price?minPrice=&maxPrice=
//! GET    /api/products/featured
//!
//! # Orders
//! GET|POST|DELETE     /api/orders
//! GET    /api/orders/last                     - ID of the newest order
//! GET|PUT|DELETE      /api/orders/{id}
//! GET    /api/orders/customer/{id}
//! GET    /api/orders/status/cancelled/{is_cancelled}
//! GET|POST|DELETE     /api/order-details
//! GET|PUT|DELETE      /api/order-details/{id}
//! GET|DELETE          /api/order-details/order/{orders_id}
//! GET    /api/order-details/product/{id}
//! GET|POST|DELETE     /api/payments
//! GET|PUT|DELETE      /api/payments/{id}
//! GET|DELETE          /api/payments/order/{orders_id}
//!
//! # Cart
//! GET|POST|DELETE     /api/shopping-carts
//! GET|PUT|DELETE      /api/shopping-carts/{id}
//! GET|DELETE          /api/shopping-carts/customer/{id}
//! GET|DELETE          /api/shopping-carts/product/{id}
//!
//! # Auth
//! POST   /api/auth/login                      - Email/password login (rate limited)
//! GET    /api/auth/me                         - Current customer (bearer token)
//!
//! # ECPay
//! POST   /pages/ecpay/send                    - Auto-submitting checkout form
//! POST   /pages/ecpay/return                  - Payment result callback
//! ```
//!
//! Every collection-wide `DELETE` requires an `ADMIN` token.

pub mod auth;
pub mod categories;
pub mod customers;
pub mod ecpay;
pub mod order_details;
pub mod orders;
pub mod payments;
pub mod products;
pub mod shopping_carts;

use axum::Router;

use crate::config::StorefrontConfig;
use crate::state::AppState;

/// Create the `/api` routes router.
pub fn api_routes(config: &StorefrontConfig) -> Router<AppState> {
    Router::new()
        .nest("/customers", customers::router())
        .nest("/categories", categories::router())
        .nest("/products", products::router())
        .nest("/orders", orders::router())
        .nest("/order-details", order_details::router())
        .nest("/payments", payments::router())
        .nest("/shopping-carts", shopping_carts::router())
        .nest("/auth", auth::router(config.trust_proxy_headers))
}

/// Create all routes for the storefront.
pub fn routes(config: &StorefrontConfig) -> Router<AppState> {
    Router::new()
        .nest("/api", api_routes(config))
        .nest("/pages/ecpay", ecpay::router())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode, header},
        response::Response,
    };
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use super::*;

    /// Router backed by a pool that never connects.
    ///
    /// Only requests rejected before touching the database can be tested
    /// this way.
    fn app() -> Router {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/ecshop_test")
            .unwrap();
        let config = StorefrontConfig::for_tests();
        routes(&config).with_state(AppState::new(config, pool))
    }

    async fn send(method: Method, uri: &str, body: Body) -> Response {
        app()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(body)
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_me_requires_token() {
        let response = send(Method::GET, "/api/auth/me", Body::empty()).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }

    #[tokio::test]
    async fn test_me_rejects_garbage_token() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/api/auth/me")
                    .header(header::AUTHORIZATION, "Bearer not.a.token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_delete_all_requires_admin_token() {
        for uri in [
            "/api/customers",
            "/api/categories",
            "/api/products",
            "/api/orders",
            "/api/order-details",
            "/api/payments",
            "/api/shopping-carts",
        ] {
            let response = send(Method::DELETE, uri, Body::empty()).await;
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_cart_line_without_customer_is_rejected() {
        let response = send(
            Method::POST,
            "/api/shopping-carts",
            Body::from(r#"{"productsId": 3, "quantity": 1}"#),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(response).await, "Invalid customer ID");
    }

    #[tokio::test]
    async fn test_cart_line_without_product_is_rejected() {
        let response = send(
            Method::PUT,
            "/api/shopping-carts/7",
            Body::from(r#"{"customerId": 1}"#),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(response).await, "Invalid product ID");
    }

    #[tokio::test]
    async fn test_malformed_callback_is_still_acknowledged() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/pages/ecpay/return")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("RtnCode=1"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, ecpay::CALLBACK_ACK);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let response = send(Method::GET, "/api/warehouses", Body::empty()).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
