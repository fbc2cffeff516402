//! Engine document preparation.
//!
//! Transforms a [`Product`] into the document shape stored in the index:
//! the product fields plus completion-suggester inputs and, when provided,
//! the dense embedding vector.

use serde::Serialize;

use product_search_shared::Product;

/// Suggester weight for product-name suggestions.
const NAME_SUGGEST_WEIGHT: u32 = 10;

/// Suggester weight for category suggestions.
const CATEGORY_SUGGEST_WEIGHT: u32 = 5;

/// A completion-suggester field value.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SuggestField {
    /// Inputs the suggester will complete against.
    pub input: Vec<String>,
    /// Relative weight among suggestions.
    pub weight: u32,
}

/// The engine-specific document written to the product index.
#[derive(Debug, Clone, Serialize)]
pub struct ProductDocument {
    #[serde(flatten)]
    pub product: Product,
    /// Name suggester inputs: the full name plus each word token, so both
    /// whole-name and per-word prefixes complete.
    pub name_suggest: SuggestField,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_suggest: Option<SuggestField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
}

impl ProductDocument {
    /// Prepare a product for indexing.
    ///
    /// The name suggester receives the full name and each individual word
    /// token (weight 10); the category suggester receives the category
    /// (weight 5). The embedding is attached verbatim when provided; its
    /// length is validated by the engine against the mapping's declared
    /// dimension, not here.
    pub fn prepare(product: &Product, embedding: Option<&[f32]>) -> Self {
        let mut inputs = vec![product.name.clone()];
        inputs.extend(product.name.split_whitespace().map(str::to_string));

        let category_suggest = if product.category.is_empty() {
            None
        } else {
            Some(SuggestField {
                input: vec![product.category.clone()],
                weight: CATEGORY_SUGGEST_WEIGHT,
            })
        };

        Self {
            product: product.clone(),
            name_suggest: SuggestField {
                input: inputs,
                weight: NAME_SUGGEST_WEIGHT,
            },
            category_suggest,
            embedding: embedding.map(<[f32]>::to_vec),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_name_suggest_inputs() {
        let product = Product::new("iPhone 14 Pro", "phones", 999.0);
        let doc = ProductDocument::prepare(&product, None);

        assert_eq!(
            doc.name_suggest.input,
            vec!["iPhone 14 Pro", "iPhone", "14", "Pro"]
        );
        assert_eq!(doc.name_suggest.weight, 10);
    }

    #[test]
    fn test_prepare_category_suggest() {
        let product = Product::new("iPhone 14", "phones", 799.0);
        let doc = ProductDocument::prepare(&product, None);

        let category = doc.category_suggest.unwrap();
        assert_eq!(category.input, vec!["phones"]);
        assert_eq!(category.weight, 5);
    }

    #[test]
    fn test_prepare_without_category() {
        let mut product = Product::new("Mystery Box", "", 1.0);
        product.category = String::new();

        let doc = ProductDocument::prepare(&product, None);
        assert!(doc.category_suggest.is_none());
    }

    #[test]
    fn test_prepare_attaches_embedding() {
        let product = Product::new("iPhone 14", "phones", 799.0);
        let embedding = vec![0.5_f32; 4];
        let doc = ProductDocument::prepare(&product, Some(&embedding));

        assert_eq!(doc.embedding.as_deref(), Some(&embedding[..]));
    }

    #[test]
    fn test_serialized_document_shape() {
        let product = Product::new("iPhone 14", "phones", 799.0);
        let doc = ProductDocument::prepare(&product, None);
        let value = serde_json::to_value(&doc).unwrap();

        // Product fields flattened alongside the suggest fields
        assert_eq!(value["name"], "iPhone 14");
        assert_eq!(value["name_suggest"]["weight"], 10);
        assert!(value.get("embedding").is_none());
    }
}
