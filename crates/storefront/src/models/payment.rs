//! Payment record types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ecshop_core::{OrderId, PaymentId};

/// A payment record. At most one exists per order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub payments_id: PaymentId,
    pub orders_id: OrderId,
    pub payment_method: Option<String>,
    pub transaction_date: DateTime<Utc>,
    pub transaction_amount: Decimal,
    pub transaction_status: String,
    pub gateway_response: Option<String>,
}

/// Body for creating or replacing a payment record.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInput {
    pub orders_id: OrderId,
    #[serde(default)]
    pub payment_method: Option<String>,
    /// Defaults to the time of the write.
    #[serde(default)]
    pub transaction_date: Option<DateTime<Utc>>,
    pub transaction_amount: Decimal,
    pub transaction_status: String,
    #[serde(default)]
    pub gateway_response: Option<String>,
}
