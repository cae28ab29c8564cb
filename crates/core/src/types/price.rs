//! Money arithmetic on [`Decimal`] amounts.
//!
//! Amounts are stored as `NUMERIC(18,2)`; these helpers never round through
//! floating point.

use rust_decimal::{Decimal, RoundingStrategy};

/// Line subtotal for an order detail: `(unit_price - discount) * quantity`.
///
/// The discount is a per-unit amount, not a rate.
///
/// ```
/// use ecshop_core::line_subtotal;
/// use rust_decimal::Decimal;
///
/// let subtotal = line_subtotal(Decimal::new(5000, 2), Decimal::new(500, 2), 3);
/// assert_eq!(subtotal, Decimal::new(13500, 2));
/// ```
#[must_use]
pub fn line_subtotal(unit_price: Decimal, discount: Decimal, quantity: i32) -> Decimal {
    (unit_price - discount) * Decimal::from(quantity)
}

/// Round an amount to a whole number of currency units (half away from zero).
///
/// The payment gateway only accepts integer amounts. Returns `None` when the
/// rounded value does not fit in an `i64`.
#[must_use]
pub fn whole_amount(amount: Decimal) -> Option<i64> {
    use rust_decimal::prelude::ToPrimitive;

    amount
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_subtotal() {
        let subtotal = line_subtotal(Decimal::new(5000, 2), Decimal::new(500, 2), 3);
        assert_eq!(subtotal, Decimal::new(13500, 2));
        assert_eq!(subtotal.to_string(), "135.00");
    }

    #[test]
    fn test_line_subtotal_zero_quantity() {
        assert_eq!(
            line_subtotal(Decimal::new(1999, 2), Decimal::ZERO, 0),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_whole_amount_rounds_half_up() {
        assert_eq!(whole_amount(Decimal::new(10000, 2)), Some(100));
        assert_eq!(whole_amount(Decimal::new(10050, 2)), Some(101));
        assert_eq!(whole_amount(Decimal::new(10049, 2)), Some(100));
    }
}
