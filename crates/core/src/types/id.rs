//! Integer primary keys, one newtype per table.
//!
//! Every table uses a `SERIAL` key. Wrapping each in its own type keeps a
//! `ProductId` from being bound where a `CategoryId` belongs. On the wire
//! the IDs are bare JSON numbers.

/// Declare one or more `i32`-backed ID types.
///
/// Each generated type is `Copy`, serializes transparently, parses from a
/// path segment via `FromStr`, and (with the `postgres` feature) binds as an
/// `INTEGER`.
///
/// ```rust
/// # use ecshop_core::define_ids;
/// define_ids!(WishlistId);
///
/// let id: WishlistId = "12".parse().unwrap();
/// assert_eq!(id.as_i32(), 12);
/// ```
#[macro_export]
macro_rules! define_ids {
    ($($name:ident),+ $(,)?) => {$(
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
            ::serde::Serialize, ::serde::Deserialize,
        )]
        #[cfg_attr(feature = "postgres", derive(::sqlx::Type))]
        #[cfg_attr(feature = "postgres", sqlx(transparent))]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            #[must_use]
            pub const fn as_i32(self) -> i32 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ::core::num::ParseIntError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                s.trim().parse().map(Self)
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    )+};
}

// Wire names follow the column names (`customerId`, `categoriesId`,
// `productsId`, ...); the Rust names stay singular.
define_ids!(
    CustomerId,
    CategoryId,
    ProductId,
    OrderId,
    OrderDetailId,
    PaymentId,
    ShoppingCartId,
);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_serialize_as_bare_integers() {
        let json = serde_json::to_string(&CustomerId::new(42)).unwrap();
        assert_eq!(json, "42");

        let id: ProductId = serde_json::from_str("7").unwrap();
        assert_eq!(id.as_i32(), 7);
    }

    #[test]
    fn test_from_str_trims() {
        let id: OrderId = " 15 ".parse().unwrap();
        assert_eq!(id, OrderId::new(15));
        assert!("15a".parse::<OrderId>().is_err());
        assert!("".parse::<CategoryId>().is_err());
    }

    #[test]
    fn test_display_matches_inner_value() {
        assert_eq!(ShoppingCartId::new(3).to_string(), "3");
        assert_eq!(i32::from(PaymentId::from(-1)), -1);
    }
}
