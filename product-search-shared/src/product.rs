//! Product document type.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A product as supplied by indexing clients and returned from searches.
///
/// Products are immutable once indexed; re-indexing a product with the same
/// name simply stores a new document. Optional fields are omitted from the
/// serialized form so engine documents stay sparse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product display name.
    pub name: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Category slug (keyword field in the index).
    #[serde(default)]
    pub category: String,
    /// Unit price.
    #[serde(default)]
    pub price: f64,
    /// Units in stock.
    #[serde(default)]
    pub stock: i64,
    /// Open key/value specification mapping.
    #[serde(default)]
    pub specifications: HashMap<String, String>,
    /// Brand name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// Average review rating.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    /// Number of reviews behind the rating.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews_count: Option<i64>,
    /// Image URL (stored, not indexed).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Product {
    /// Create a product with only the required fields set.
    pub fn new(name: impl Into<String>, category: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            category: category.into(),
            price,
            stock: 0,
            specifications: HashMap::new(),
            brand: None,
            rating: None,
            reviews_count: None,
            image_url: None,
        }
    }
}
