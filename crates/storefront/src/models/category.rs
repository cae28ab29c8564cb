//! Product category types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ecshop_core::CategoryId;

use super::default_true;

/// A product category.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub categories_id: CategoryId,
    pub categories_name: String,
    pub description: Option<String>,
    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
    pub is_active: bool,
}

/// Body for creating or replacing a category.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInput {
    pub categories_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}
