//! Order line item types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ecshop_core::{OrderDetailId, OrderId, ProductId, line_subtotal};

/// An order line item.
///
/// Serializes with a derived `subTotal`; the subtotal is never stored.
#[derive(Debug, Clone)]
pub struct OrderDetail {
    pub order_details_id: OrderDetailId,
    pub orders_id: OrderId,
    pub products_id: ProductId,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub discount: Decimal,
}

impl OrderDetail {
    /// `(unit_price - discount) * quantity`.
    #[must_use]
    pub fn sub_total(&self) -> Decimal {
        line_subtotal(self.unit_price, self.discount, self.quantity)
    }
}

impl Serialize for OrderDetail {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Wire<'a> {
            order_details_id: OrderDetailId,
            orders_id: OrderId,
            products_id: ProductId,
            quantity: i32,
            unit_price: &'a Decimal,
            discount: &'a Decimal,
            sub_total: Decimal,
        }

        Wire {
            order_details_id: self.order_details_id,
            orders_id: self.orders_id,
            products_id: self.products_id,
            quantity: self.quantity,
            unit_price: &self.unit_price,
            discount: &self.discount,
            sub_total: self.sub_total(),
        }
        .serialize(serializer)
    }
}

/// Body for creating or replacing an order line item.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetailInput {
    pub orders_id: OrderId,
    pub products_id: ProductId,
    pub quantity: i32,
    pub unit_price: Decimal,
    #[serde(default)]
    pub discount: Decimal,
}

/// Line item joined with its product name (`GET /api/order-details/order/{id}`).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetailSummary {
    pub order_detail_id: OrderDetailId,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
}
