//! Result reranking.
//!
//! Reorders a candidate list either by hosted-model relevance scores or by
//! a position-based heuristic. A slow or unavailable model must never
//! block or fail the overall search: every scoring failure is isolated to
//! its candidate and degraded to the heuristic score.

use tracing::warn;

use crate::groq::CandidateScorer;
use product_search_shared::{Product, SearchResult};

/// Lowest score the position heuristic can assign.
const HEURISTIC_FLOOR: f64 = 10.0;

/// Maximum characters of the query sent to the scoring model.
const MAX_QUERY_CHARS: usize = 100;

/// Maximum characters of the product name in the scoring summary.
const MAX_NAME_CHARS: usize = 100;

/// Position-based heuristic score: `max(100 - 5 * index, 10)`.
///
/// Monotonically decreasing in input rank, so the heuristic alone always
/// preserves the engine's ordering.
pub fn heuristic_score(index: usize) -> f64 {
    (100.0 - 5.0 * index as f64).max(HEURISTIC_FLOOR)
}

/// Outcome of scoring one candidate.
///
/// Kept per candidate and resolved afterward so a model failure degrades
/// exactly one score instead of unwinding the whole request.
#[derive(Debug)]
enum ScoreOutcome {
    /// Score returned by the hosted model.
    Scored(f64),
    /// Model call or parse failed; the position heuristic applies.
    Fallback { reason: String },
}

/// Rerank candidates and attach relevance scores.
///
/// With no scorer, every candidate gets the position heuristic and input
/// order is preserved. With a scorer, each candidate is scored
/// individually (clamped to [0, 100]); the list is then stable-sorted
/// descending by score, so ties keep their original input order. The
/// result is truncated to `top_k`.
pub async fn rerank(
    scorer: Option<&dyn CandidateScorer>,
    query: &str,
    products: Vec<Product>,
    top_k: usize,
) -> Vec<SearchResult> {
    if products.is_empty() {
        return Vec::new();
    }

    let mut results: Vec<SearchResult> = match scorer {
        None => products
            .into_iter()
            .enumerate()
            .map(|(i, product)| SearchResult {
                product,
                relevance_score: heuristic_score(i),
            })
            .collect(),
        Some(scorer) => {
            let query = truncate_chars(query, MAX_QUERY_CHARS);
            let mut scored = Vec::with_capacity(products.len());

            for (i, product) in products.into_iter().enumerate() {
                let summary = candidate_summary(&product);
                let outcome = match scorer.score(&query, &summary).await {
                    Ok(score) if score.is_finite() => ScoreOutcome::Scored(score.clamp(0.0, 100.0)),
                    Ok(score) => ScoreOutcome::Fallback {
                        reason: format!("non-finite score {score}"),
                    },
                    Err(e) => ScoreOutcome::Fallback {
                        reason: e.to_string(),
                    },
                };

                let relevance_score = match outcome {
                    ScoreOutcome::Scored(score) => score,
                    ScoreOutcome::Fallback { reason } => {
                        warn!(
                            candidate = %product.name,
                            position = i,
                            reason = %reason,
                            "Scoring failed, using position heuristic"
                        );
                        heuristic_score(i)
                    }
                };

                scored.push(SearchResult {
                    product,
                    relevance_score,
                });
            }

            // Stable sort: equal scores keep their input order
            scored.sort_by(|a, b| {
                b.relevance_score
                    .partial_cmp(&a.relevance_score)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            scored
        }
    };

    results.truncate(top_k);
    results
}

/// Concise product summary sent to the scoring model.
fn candidate_summary(product: &Product) -> String {
    format!(
        "Name: {}\nCategory: {}\nBrand: {}",
        truncate_chars(&product.name, MAX_NAME_CHARS),
        if product.category.is_empty() { "N/A" } else { product.category.as_str() },
        product.brand.as_deref().unwrap_or("N/A"),
    )
}

/// Truncate to at most `max` characters on a char boundary.
fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    use crate::error::LlmError;

    /// Scorer fake returning a preconfigured outcome per call.
    struct FakeScorer {
        responses: Mutex<Vec<Result<f64, LlmError>>>,
    }

    impl FakeScorer {
        fn new(responses: Vec<Result<f64, LlmError>>) -> Self {
            Self {
                responses: Mutex::new(responses),
            }
        }
    }

    #[async_trait]
    impl CandidateScorer for FakeScorer {
        async fn score(&self, _query: &str, _candidate: &str) -> Result<f64, LlmError> {
            self.responses.lock().unwrap().remove(0)
        }
    }

    fn products(names: &[&str]) -> Vec<Product> {
        names
            .iter()
            .map(|n| Product::new(*n, "phones", 100.0))
            .collect()
    }

    #[tokio::test]
    async fn test_heuristic_scores_follow_position_formula() {
        let results = rerank(None, "phone", products(&["A", "B", "C"]), 10).await;

        assert_eq!(results.len(), 3);
        for (i, result) in results.iter().enumerate() {
            assert_eq!(result.relevance_score, (100.0 - 5.0 * i as f64).max(10.0));
        }
        // Input order preserved
        assert_eq!(results[0].product.name, "A");
        assert_eq!(results[2].product.name, "C");
    }

    #[test]
    fn test_heuristic_floor() {
        assert_eq!(heuristic_score(0), 100.0);
        assert_eq!(heuristic_score(18), 10.0);
        assert_eq!(heuristic_score(19), 10.0);
        assert_eq!(heuristic_score(100), 10.0);
    }

    #[tokio::test]
    async fn test_heuristic_truncates_to_top_k() {
        let results = rerank(None, "phone", products(&["A", "B", "C", "D"]), 2).await;
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].product.name, "A");
    }

    #[tokio::test]
    async fn test_scored_results_sorted_descending() {
        let scorer = FakeScorer::new(vec![Ok(40.0), Ok(90.0), Ok(70.0)]);
        let results = rerank(Some(&scorer), "phone", products(&["A", "B", "C"]), 10).await;

        assert_eq!(results[0].product.name, "B");
        assert_eq!(results[0].relevance_score, 90.0);
        assert_eq!(results[1].product.name, "C");
        assert_eq!(results[2].product.name, "A");
    }

    #[tokio::test]
    async fn test_tied_scores_keep_input_order() {
        let scorer = FakeScorer::new(vec![Ok(50.0), Ok(50.0), Ok(50.0)]);
        let results = rerank(Some(&scorer), "phone", products(&["A", "B", "C"]), 10).await;

        assert_eq!(results[0].product.name, "A");
        assert_eq!(results[1].product.name, "B");
        assert_eq!(results[2].product.name, "C");
    }

    #[tokio::test]
    async fn test_scoring_failure_degrades_only_that_candidate() {
        let scorer = FakeScorer::new(vec![
            Ok(20.0),
            Err(LlmError::request("timed out")),
            Ok(30.0),
        ]);
        let results = rerank(Some(&scorer), "phone", products(&["A", "B", "C"]), 10).await;

        // B stays in the output with the position-1 heuristic score (95)
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].product.name, "B");
        assert_eq!(results[0].relevance_score, 95.0);
        assert_eq!(results[1].product.name, "C");
        assert_eq!(results[2].product.name, "A");
    }

    #[tokio::test]
    async fn test_scores_clamped_to_range() {
        let scorer = FakeScorer::new(vec![Ok(250.0), Ok(-10.0)]);
        let results = rerank(Some(&scorer), "phone", products(&["A", "B"]), 10).await;

        assert_eq!(results[0].relevance_score, 100.0);
        assert_eq!(results[1].relevance_score, 0.0);
    }

    #[tokio::test]
    async fn test_non_finite_score_falls_back() {
        let scorer = FakeScorer::new(vec![Ok(f64::NAN)]);
        let results = rerank(Some(&scorer), "phone", products(&["A"]), 10).await;

        assert_eq!(results[0].relevance_score, 100.0);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let results = rerank(None, "phone", Vec::new(), 10).await;
        assert!(results.is_empty());
    }

    #[test]
    fn test_candidate_summary() {
        let mut product = Product::new("iPhone 14", "phones", 799.0);
        product.brand = Some("Apple".to_string());

        let summary = candidate_summary(&product);
        assert_eq!(summary, "Name: iPhone 14\nCategory: phones\nBrand: Apple");
    }

    #[test]
    fn test_truncate_chars_respects_boundaries() {
        let text = "héllo wörld";
        assert_eq!(truncate_chars(text, 4), "héll");
        assert_eq!(truncate_chars("short", 100), "short");
    }
}
