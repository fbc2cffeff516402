//! OpenSearch index configuration and mappings.
//!
//! This module defines the index settings and mappings for the product
//! search index.

use serde_json::{json, Value};

/// The name of the product index.
pub const INDEX_NAME: &str = "products";

/// Dimensionality of the stored embedding vectors.
///
/// Writes carrying an embedding of any other length are rejected by the
/// engine, so this constant must stay in sync with the embedding model.
pub const EMBEDDING_DIM: usize = 768;

/// Get the index settings and mappings for the product index.
///
/// The configuration includes:
/// - **edge_ngram autocomplete analyzer**: prefix tokens (1-20 chars) on a
///   dedicated `autocomplete` subfield of name and description
/// - **search_as_you_type**: built-in n-gram fields for prefix matching on
///   name and description, plus a `standard` subfield for best-fields
///   scoring
/// - **Completion suggesters**: `name_suggest` and `category_suggest` for
///   the autocomplete endpoint
/// - **knn_vector**: fixed-width embedding field scored by brute-force
///   cosine similarity
/// - **Keyword fields**: category and brand for filtering and boosting
///
/// Changing anything here requires a full index recreation; there is no
/// in-place mapping migration.
pub fn get_index_settings() -> Value {
    json!({
        "settings": {
            "analysis": {
                "tokenizer": {
                    "autocomplete_tokenizer": {
                        "type": "edge_ngram",
                        "min_gram": 1,
                        "max_gram": 20,
                        "token_chars": ["letter", "digit"]
                    }
                },
                "analyzer": {
                    "autocomplete_index": {
                        "type": "custom",
                        "tokenizer": "autocomplete_tokenizer",
                        "filter": ["lowercase"]
                    },
                    "autocomplete_search": {
                        "type": "custom",
                        "tokenizer": "standard",
                        "filter": ["lowercase"]
                    },
                    "search_as_you_type_analyzer": {
                        "type": "custom",
                        "tokenizer": "standard",
                        "filter": ["lowercase", "stop", "snowball"]
                    }
                }
            }
        },
        "mappings": {
            "properties": {
                "name": {
                    "type": "search_as_you_type",
                    "analyzer": "search_as_you_type_analyzer",
                    "fields": {
                        "standard": {
                            "type": "text",
                            "analyzer": "standard"
                        },
                        "autocomplete": {
                            "type": "text",
                            "analyzer": "autocomplete_index",
                            "search_analyzer": "autocomplete_search"
                        }
                    }
                },
                "name_suggest": {
                    "type": "completion",
                    "analyzer": "simple",
                    "preserve_separators": true,
                    "preserve_position_increments": true,
                    "max_input_length": 50
                },
                "description": {
                    "type": "search_as_you_type",
                    "analyzer": "search_as_you_type_analyzer",
                    "fields": {
                        "standard": {
                            "type": "text",
                            "analyzer": "standard"
                        },
                        "autocomplete": {
                            "type": "text",
                            "analyzer": "autocomplete_index",
                            "search_analyzer": "autocomplete_search"
                        }
                    }
                },
                "category": {
                    "type": "keyword"
                },
                "category_suggest": {
                    "type": "completion",
                    "analyzer": "simple"
                },
                "specifications": {
                    "type": "object"
                },
                "price": {
                    "type": "float"
                },
                "stock": {
                    "type": "integer"
                },
                "image_url": {
                    "type": "keyword",
                    "index": false
                },
                "brand": {
                    "type": "keyword"
                },
                "rating": {
                    "type": "float"
                },
                "reviews_count": {
                    "type": "integer"
                },
                "embedding": {
                    "type": "knn_vector",
                    "dimension": EMBEDDING_DIM
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_settings_structure() {
        let settings = get_index_settings();

        // Check analyzers exist
        assert_eq!(
            settings["settings"]["analysis"]["tokenizer"]["autocomplete_tokenizer"]["type"],
            "edge_ngram"
        );
        assert!(settings["settings"]["analysis"]["analyzer"]["autocomplete_index"].is_object());

        // Check search_as_you_type fields
        assert_eq!(
            settings["mappings"]["properties"]["name"]["type"],
            "search_as_you_type"
        );
        assert_eq!(
            settings["mappings"]["properties"]["description"]["type"],
            "search_as_you_type"
        );

        // Check completion suggesters
        assert_eq!(
            settings["mappings"]["properties"]["name_suggest"]["type"],
            "completion"
        );
        assert_eq!(
            settings["mappings"]["properties"]["category_suggest"]["type"],
            "completion"
        );

        // Check keyword and vector fields
        assert_eq!(settings["mappings"]["properties"]["category"]["type"], "keyword");
        assert_eq!(
            settings["mappings"]["properties"]["embedding"]["dimension"],
            EMBEDDING_DIM
        );
    }

    #[test]
    fn test_image_url_not_indexed() {
        let settings = get_index_settings();
        assert_eq!(
            settings["mappings"]["properties"]["image_url"]["index"],
            false
        );
    }

    #[test]
    fn test_index_name() {
        assert_eq!(INDEX_NAME, "products");
    }

    #[test]
    fn test_settings_are_deterministic() {
        // Recreating the index must yield the same mapping both times.
        assert_eq!(get_index_settings(), get_index_settings());
    }
}
