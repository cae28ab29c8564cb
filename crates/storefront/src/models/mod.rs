//! Domain models for the storefront.
//!
//! Each entity has a record type (what the API returns) and input types
//! (what POST and PUT bodies carry). JSON uses camelCase names and flat
//! foreign-key ids (`customerId`, `productsId`, ...).

pub mod category;
pub mod customer;
pub mod order;
pub mod order_detail;
pub mod payment;
pub mod product;
pub mod shopping_cart;

pub use category::{Category, CategoryInput};
pub use customer::{Customer, CustomerUpdate, NewCustomer};
pub use order::{NewOrder, Order, OrderPatch};
pub use order_detail::{OrderDetail, OrderDetailInput, OrderDetailSummary};
pub use payment::{Payment, PaymentInput};
pub use product::{NewProduct, Product, ProductUpdate};
pub use shopping_cart::{CartLineError, ShoppingCart, ShoppingCartInput, ValidCartLine};

pub(crate) const fn default_true() -> bool {
    true
}

pub(crate) const fn default_quantity() -> i32 {
    1
}

/// Serde adapter for binary images: base64 strings on the wire.
///
/// Accepts bare base64 or a `data:<mime>;base64,` URL. An empty string
/// deserializes as no image.
pub(crate) mod image_base64 {
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::ref_option)]
    pub fn serialize<S>(image: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match image {
            Some(bytes) => serializer.serialize_some(&STANDARD.encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Some(encoded) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        let payload = match encoded.split_once(',') {
            Some((header, data)) if header.starts_with("data:") => data,
            _ => encoded.as_str(),
        };
        let payload = payload.trim();
        if payload.is_empty() {
            return Ok(None);
        }
        STANDARD
            .decode(payload)
            .map(Some)
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize)]
    struct WithImage {
        #[serde(default, with = "super::image_base64")]
        image: Option<Vec<u8>>,
    }

    #[test]
    fn test_image_serializes_as_base64() {
        let json = serde_json::to_string(&WithImage {
            image: Some(b"png".to_vec()),
        })
        .unwrap();
        assert_eq!(json, r#"{"image":"cG5n"}"#);
    }

    #[test]
    fn test_image_accepts_data_url() {
        let parsed: WithImage =
            serde_json::from_str(r#"{"image":"data:image/png;base64,cG5n"}"#).unwrap();
        assert_eq!(parsed.image.as_deref(), Some(&b"png"[..]));
    }

    #[test]
    fn test_image_empty_or_missing_is_none() {
        let parsed: WithImage = serde_json::from_str(r#"{"image":""}"#).unwrap();
        assert!(parsed.image.is_none());
        let parsed: WithImage = serde_json::from_str("{}").unwrap();
        assert!(parsed.image.is_none());
    }

    #[test]
    fn test_image_rejects_garbage() {
        assert!(serde_json::from_str::<WithImage>(r#"{"image":"!!!"}"#).is_err());
    }
}
