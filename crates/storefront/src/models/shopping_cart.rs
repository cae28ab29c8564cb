//! Shopping cart line types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ecshop_core::{CustomerId, ProductId, ShoppingCartId};

use super::default_quantity;

/// One product in a customer's cart.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingCart {
    pub shopping_cart_id: ShoppingCartId,
    pub customer_id: CustomerId,
    pub products_id: ProductId,
    pub quantity: i32,
    pub date_added: DateTime<Utc>,
    pub account_paid: bool,
    pub notes: Option<String>,
}

/// Body for creating or replacing a cart line.
///
/// The ids are optional here so a missing id can be answered with a
/// specific message instead of a generic deserialization error.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingCartInput {
    #[serde(default)]
    pub customer_id: Option<CustomerId>,
    #[serde(default)]
    pub products_id: Option<ProductId>,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
    /// Defaults to the time of insertion.
    #[serde(default)]
    pub date_added: Option<DateTime<Utc>>,
    #[serde(default)]
    pub account_paid: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A cart line whose ids have been checked.
#[derive(Debug, Clone)]
pub struct ValidCartLine {
    pub customer_id: CustomerId,
    pub products_id: ProductId,
    pub quantity: i32,
    pub date_added: Option<DateTime<Utc>>,
    pub account_paid: bool,
    pub notes: Option<String>,
}

/// Reason a cart line was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CartLineError {
    #[error("Invalid customer ID")]
    MissingCustomer,
    #[error("Invalid product ID")]
    MissingProduct,
}

impl TryFrom<ShoppingCartInput> for ValidCartLine {
    type Error = CartLineError;

    fn try_from(input: ShoppingCartInput) -> Result<Self, Self::Error> {
        let customer_id = input.customer_id.ok_or(CartLineError::MissingCustomer)?;
        let products_id = input.products_id.ok_or(CartLineError::MissingProduct)?;

        Ok(Self {
            customer_id,
            products_id,
            quantity: input.quantity,
            date_added: input.date_added,
            account_paid: input.account_paid,
            notes: input.notes,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_customer_rejected_first() {
        let input: ShoppingCartInput = serde_json::from_str("{}").unwrap();
        let err = ValidCartLine::try_from(input).unwrap_err();
        assert_eq!(err, CartLineError::MissingCustomer);
        assert_eq!(err.to_string(), "Invalid customer ID");
    }

    #[test]
    fn test_missing_product_rejected() {
        let input: ShoppingCartInput = serde_json::from_str(r#"{"customerId":4}"#).unwrap();
        let err = ValidCartLine::try_from(input).unwrap_err();
        assert_eq!(err.to_string(), "Invalid product ID");
    }

    #[test]
    fn test_valid_line_defaults_quantity() {
        let input: ShoppingCartInput =
            serde_json::from_str(r#"{"customerId":4,"productsId":9}"#).unwrap();
        let line = ValidCartLine::try_from(input).unwrap();
        assert_eq!(line.quantity, 1);
        assert!(!line.account_paid);
        assert_eq!(line.products_id, ProductId::new(9));
    }
}
