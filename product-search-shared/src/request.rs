//! Extracted product request and product info types.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A structured product request extracted from an email by the LLM.
///
/// Requests are ephemeral: they are consumed as a query seed for product
/// matching and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRequest {
    /// Requested product name.
    pub product_name: String,
    /// Free-text description of the request.
    #[serde(default)]
    pub description: String,
    /// Requested specifications as key/value pairs.
    #[serde(default)]
    pub specifications: HashMap<String, String>,
    /// Requested quantity.
    #[serde(default)]
    pub quantity: i64,
    /// Request priority (free text, e.g. "high").
    #[serde(default)]
    pub priority: String,
}

/// Product information extracted from an image by the vision model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductInfo {
    /// Identified product name.
    pub product_name: String,
    /// Description of the product as seen in the image.
    #[serde(default)]
    pub description: String,
    /// Extracted specifications.
    #[serde(default)]
    pub specifications: HashMap<String, String>,
    /// Identified category.
    #[serde(default)]
    pub category: String,
    /// Estimated price range (free text, e.g. "$700-$900").
    #[serde(default)]
    pub estimated_price_range: String,
}

impl ProductInfo {
    /// The fixed record used when image extraction fails entirely.
    pub fn unknown() -> Self {
        Self {
            product_name: "Unknown Product".to_string(),
            description: "Product extracted from image".to_string(),
            specifications: HashMap::new(),
            category: "general".to_string(),
            estimated_price_range: "Unknown".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let request: ProductRequest =
            serde_json::from_str(r#"{"product_name":"USB-C dock"}"#).unwrap();

        assert_eq!(request.product_name, "USB-C dock");
        assert_eq!(request.quantity, 0);
        assert!(request.specifications.is_empty());
    }

    #[test]
    fn test_unknown_product_info() {
        let info = ProductInfo::unknown();
        assert_eq!(info.product_name, "Unknown Product");
        assert_eq!(info.category, "general");
        assert!(info.specifications.is_empty());
    }
}
