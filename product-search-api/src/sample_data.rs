//! Embedded sample catalog for the seeding endpoint.

use product_search_shared::Product;

const SAMPLE_PRODUCTS_JSON: &str = include_str!("sample_products.json");

/// Parse the embedded sample catalog.
pub fn sample_products() -> Result<Vec<Product>, serde_json::Error> {
    serde_json::from_str(SAMPLE_PRODUCTS_JSON)
}
