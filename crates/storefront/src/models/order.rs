//! Order types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ecshop_core::{CustomerId, OrderId};

/// An order placed by a customer.
///
/// `payment_status` and `shipping_status` are free text; the payment
/// callback writes [`ecshop_core::PaymentStatus::PAID`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub orders_id: OrderId,
    pub customer_id: CustomerId,
    pub order_date: DateTime<Utc>,
    pub total_amount: Decimal,
    pub payment_status: String,
    pub shipping_status: String,
    pub shipping_address: Option<String>,
    pub billing_address: Option<String>,
    pub payment_method: Option<String>,
    pub tracking_number: Option<String>,
    pub estimated_delivery_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub is_cancelled: bool,
    pub cancellation_date: Option<DateTime<Utc>>,
    pub updated_date: DateTime<Utc>,
}

/// Body for `POST /api/orders`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub customer_id: CustomerId,
    /// Defaults to the time of insertion.
    #[serde(default)]
    pub order_date: Option<DateTime<Utc>>,
    pub total_amount: Decimal,
    pub payment_status: String,
    pub shipping_status: String,
    #[serde(default)]
    pub shipping_address: Option<String>,
    #[serde(default)]
    pub billing_address: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub tracking_number: Option<String>,
    #[serde(default)]
    pub estimated_delivery_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub is_cancelled: bool,
    #[serde(default)]
    pub cancellation_date: Option<DateTime<Utc>>,
}

/// Body for `PUT /api/orders/{id}`.
///
/// Only fields present (and non-null) in the body are changed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPatch {
    pub customer_id: Option<CustomerId>,
    pub order_date: Option<DateTime<Utc>>,
    pub total_amount: Option<Decimal>,
    pub payment_status: Option<String>,
    pub shipping_status: Option<String>,
    pub shipping_address: Option<String>,
    pub billing_address: Option<String>,
    pub payment_method: Option<String>,
    pub tracking_number: Option<String>,
    pub estimated_delivery_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub is_cancelled: Option<bool>,
    pub cancellation_date: Option<DateTime<Utc>>,
}
