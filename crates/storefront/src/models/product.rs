//! Catalog product types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ecshop_core::{CategoryId, ProductId};

use super::image_base64;

const fn default_threshold_level() -> i32 {
    10
}

/// A catalog product.
///
/// `rating` and `reviews_count` are supplied by clients; nothing here
/// aggregates reviews.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub products_id: ProductId,
    pub categories_id: CategoryId,
    pub product_name: String,
    pub sku: String,
    pub price: Decimal,
    pub discount_rate: f32,
    pub quantity_in_stock: i32,
    pub last_restocked: Option<DateTime<Utc>>,
    pub threshold_level: i32,
    pub warehouse_location: Option<String>,
    pub description: Option<String>,
    pub is_featured: bool,
    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
    #[serde(with = "image_base64")]
    pub image: Option<Vec<u8>>,
    pub rating: f32,
    pub reviews_count: i32,
}

/// Body for `POST /api/products`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub categories_id: CategoryId,
    pub product_name: String,
    pub sku: String,
    pub price: Decimal,
    #[serde(default)]
    pub discount_rate: f32,
    #[serde(default)]
    pub quantity_in_stock: i32,
    #[serde(default)]
    pub last_restocked: Option<DateTime<Utc>>,
    #[serde(default = "default_threshold_level")]
    pub threshold_level: i32,
    #[serde(default)]
    pub warehouse_location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default, with = "image_base64")]
    pub image: Option<Vec<u8>>,
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub reviews_count: i32,
}

/// Body for `PUT /api/products/{id}` and `POST /api/products/{id}`.
///
/// The SKU is fixed at creation. `image` is only applied by the POST form
/// of the update, and only when non-empty.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    pub categories_id: CategoryId,
    pub product_name: String,
    pub price: Decimal,
    #[serde(default)]
    pub discount_rate: f32,
    #[serde(default)]
    pub quantity_in_stock: i32,
    #[serde(default)]
    pub last_restocked: Option<DateTime<Utc>>,
    #[serde(default = "default_threshold_level")]
    pub threshold_level: i32,
    #[serde(default)]
    pub warehouse_location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub reviews_count: i32,
    #[serde(default, with = "image_base64")]
    pub image: Option<Vec<u8>>,
}
