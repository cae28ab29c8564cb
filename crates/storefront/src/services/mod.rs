//! Business logic between the HTTP handlers and the repositories.
//!
//! Services borrow the pool per request and are cheap to construct.
//!
//! # Services
//!
//! - `auth` - Password login and login tokens
//! - `ecpay` - ECPay checkout form and payment callbacks
//! - one service per shop entity (customers, catalog, orders, carts)

pub mod auth;
pub mod categories;
pub mod customers;
pub mod ecpay;
pub mod order_details;
pub mod orders;
pub mod payments;
pub mod products;
pub mod shopping_carts;

pub use categories::CategoryService;
pub use customers::CustomerService;
pub use ecpay::EcpayService;
pub use order_details::OrderDetailService;
pub use orders::OrderService;
pub use payments::PaymentService;
pub use products::ProductService;
pub use shopping_carts::ShoppingCartService;
