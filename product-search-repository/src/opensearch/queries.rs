//! OpenSearch query builders.
//!
//! This module provides functions to build the search, instant-search,
//! autocomplete, and vector-search request bodies. Each builder is a fixed
//! template parameterized by the query text and result size.

use serde_json::{json, Value};

/// Server-side timeout for the instant-search primary query.
const INSTANT_TIMEOUT: &str = "50ms";

/// Server-side timeout for the instant-search fallback query.
const INSTANT_FALLBACK_TIMEOUT: &str = "20ms";

/// Server-side timeout for the autocomplete query.
const SUGGEST_TIMEOUT: &str = "30ms";

/// Fields returned by the latency-optimized queries.
const DISPLAY_FIELDS: [&str; 9] = [
    "name",
    "brand",
    "category",
    "price",
    "stock",
    "rating",
    "reviews_count",
    "image_url",
    "description",
];

/// Build the standard search query.
///
/// The query combines:
/// - `bool_prefix` multi-match over the `search_as_you_type` n-gram
///   subfields of name (boost 3) and description (boost 2)
/// - a `best_fields` multi-match across the analyzed text fields with
///   per-field boosts and a 0.3 tie-breaker, so documents matching several
///   clauses beat single-clause matches
/// - a match on the edge n-gram `name.autocomplete` subfield for prefix
///   hits (boost 2)
pub fn build_search_query(query_text: &str, size: usize) -> Value {
    json!({
        "query": {
            "bool": {
                "should": [
                    {
                        "multi_match": {
                            "query": query_text,
                            "type": "bool_prefix",
                            "fields": [
                                "name",
                                "name._2gram",
                                "name._3gram"
                            ],
                            "boost": 3
                        }
                    },
                    {
                        "multi_match": {
                            "query": query_text,
                            "type": "bool_prefix",
                            "fields": [
                                "description",
                                "description._2gram",
                                "description._3gram"
                            ],
                            "boost": 2
                        }
                    },
                    {
                        "multi_match": {
                            "query": query_text,
                            "fields": ["name.standard^4", "description.standard^2", "brand^2", "category^1"],
                            "type": "best_fields",
                            "tie_breaker": 0.3
                        }
                    },
                    {
                        "match": {
                            "name.autocomplete": {
                                "query": query_text,
                                "boost": 2
                            }
                        }
                    }
                ],
                "minimum_should_match": 1
            }
        },
        "size": size
    })
}

/// Build the instant-search primary query.
///
/// A reduced query shape with an aggressive server-side timeout: a
/// phrase-prefix on name with a small expansion cap plus boosted term
/// matches on name and brand. Only display fields are returned.
pub fn build_instant_query(query_text: &str, size: usize) -> Value {
    json!({
        "query": {
            "bool": {
                "should": [
                    {
                        "match_phrase_prefix": {
                            "name": {
                                "query": query_text,
                                "max_expansions": 5
                            }
                        }
                    },
                    {
                        "match": {
                            "name": {
                                "query": query_text,
                                "boost": 2
                            }
                        }
                    },
                    {
                        "match": {
                            "brand": {
                                "query": query_text,
                                "boost": 1.5
                            }
                        }
                    }
                ],
                "minimum_should_match": 1
            }
        },
        "_source": DISPLAY_FIELDS,
        "size": size,
        "timeout": INSTANT_TIMEOUT
    })
}

/// Build the instant-search fallback query.
///
/// Used when the primary instant query fails or times out: a single
/// unboosted match on name with an even tighter timeout. Fewer or worse
/// results are acceptable here.
pub fn build_instant_fallback_query(query_text: &str, size: usize) -> Value {
    json!({
        "query": {
            "match": {
                "name": query_text
            }
        },
        "_source": DISPLAY_FIELDS,
        "size": size,
        "timeout": INSTANT_FALLBACK_TIMEOUT
    })
}

/// Build the autocomplete query.
///
/// Issues a completion-suggester lookup on `name_suggest` (deduplicated at
/// the engine) combined with a phrase-prefix match on name as a secondary
/// suggestion source.
pub fn build_suggest_query(prefix: &str, size: usize) -> Value {
    json!({
        "suggest": {
            "product_suggestions": {
                "prefix": prefix,
                "completion": {
                    "field": "name_suggest",
                    "size": size,
                    "skip_duplicates": true
                }
            }
        },
        "query": {
            "match_phrase_prefix": {
                "name": {
                    "query": prefix,
                    "max_expansions": 3
                }
            }
        },
        "_source": ["name", "category", "brand"],
        "size": 3,
        "timeout": SUGGEST_TIMEOUT
    })
}

/// Build the vector-similarity query.
///
/// Scores every document by cosine similarity between the query embedding
/// and the stored `embedding` field, offset by +1.0 to keep scores
/// non-negative. This is a full-index linear scan with no
/// approximate-nearest-neighbor structure, appropriate only for small
/// catalogs.
pub fn build_vector_query(embedding: &[f32], size: usize) -> Value {
    json!({
        "query": {
            "script_score": {
                "query": { "match_all": {} },
                "script": {
                    "source": "cosineSimilarity(params.query_vector, doc['embedding']) + 1.0",
                    "params": { "query_vector": embedding }
                }
            }
        },
        "size": size
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_search_query() {
        let query = build_search_query("iphone", 10);

        let should = query["query"]["bool"]["should"].as_array().unwrap();
        assert_eq!(should.len(), 4);

        // Name n-grams boosted above description n-grams
        assert_eq!(should[0]["multi_match"]["type"], "bool_prefix");
        assert_eq!(should[0]["multi_match"]["boost"], 3);
        assert_eq!(should[1]["multi_match"]["boost"], 2);

        // best_fields clause with tie breaker
        assert_eq!(should[2]["multi_match"]["type"], "best_fields");
        assert_eq!(should[2]["multi_match"]["tie_breaker"], 0.3);
        let fields = should[2]["multi_match"]["fields"].as_array().unwrap();
        assert_eq!(fields[0], "name.standard^4");

        assert_eq!(query["query"]["bool"]["minimum_should_match"], 1);
        assert_eq!(query["size"], 10);
    }

    #[test]
    fn test_build_instant_query() {
        let query = build_instant_query("mac", 5);

        let should = query["query"]["bool"]["should"].as_array().unwrap();
        assert_eq!(should.len(), 3);
        assert_eq!(
            should[0]["match_phrase_prefix"]["name"]["max_expansions"],
            5
        );
        assert_eq!(should[1]["match"]["name"]["boost"], 2);
        assert_eq!(should[2]["match"]["brand"]["boost"], 1.5);

        assert_eq!(query["timeout"], "50ms");
        assert!(query["_source"].is_array());
    }

    #[test]
    fn test_build_instant_fallback_query() {
        let query = build_instant_fallback_query("mac", 5);

        // Single unboosted match, tighter timeout than the primary
        assert_eq!(query["query"]["match"]["name"], "mac");
        assert_eq!(query["timeout"], "20ms");
        assert_eq!(query["size"], 5);
    }

    #[test]
    fn test_build_suggest_query() {
        let query = build_suggest_query("iph", 5);

        let completion = &query["suggest"]["product_suggestions"]["completion"];
        assert_eq!(completion["field"], "name_suggest");
        assert_eq!(completion["size"], 5);
        assert_eq!(completion["skip_duplicates"], true);

        assert_eq!(
            query["query"]["match_phrase_prefix"]["name"]["max_expansions"],
            3
        );
        assert_eq!(query["timeout"], "30ms");
    }

    #[test]
    fn test_build_vector_query() {
        let embedding = vec![0.1_f32, 0.2, 0.3];
        let query = build_vector_query(&embedding, 5);

        let script = &query["query"]["script_score"]["script"];
        assert_eq!(
            script["source"],
            "cosineSimilarity(params.query_vector, doc['embedding']) + 1.0"
        );
        assert_eq!(
            script["params"]["query_vector"].as_array().unwrap().len(),
            3
        );
        assert!(query["query"]["script_score"]["query"]["match_all"].is_object());
        assert_eq!(query["size"], 5);
    }
}
