//! Fan-out to every enabled web-search provider concurrently, tolerating
//! partial failures, and fuse the results into one ranked, deduplicated
//! list bounded by an aggregate budget.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;

use qo_domain::trace::TraceEvent;

use crate::traits::{SearchProvider, SearchResultItem};

#[derive(Debug, Clone)]
pub struct FusedItem {
    pub url: String,
    pub title: String,
    pub snippet: String,
    pub score: f32,
    pub providers: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct FusedResults {
    pub items: Vec<FusedItem>,
    /// Providers that were invoked and did not time out or error.
    pub succeeded_providers: Vec<String>,
}

/// A single provider's per-call budget (default 5s, spec §4.4) plus the
/// aggregate budget across the whole fan-out.
pub struct ParallelSearchEngine {
    providers: Vec<Arc<dyn SearchProvider>>,
    per_provider_budget: Duration,
    aggregate_budget: Duration,
}

impl ParallelSearchEngine {
    pub fn new(
        providers: Vec<Arc<dyn SearchProvider>>,
        per_provider_budget: Duration,
        aggregate_budget: Duration,
    ) -> Self {
        ParallelSearchEngine {
            providers,
            per_provider_budget,
            aggregate_budget,
        }
    }

    /// Whether any search provider is registered. Used by route_decision
    /// to choose between a parallel-search route and an LLM-knowledge-only
    /// route for `general_info` queries.
    pub fn has_providers(&self) -> bool {
        !self.providers.is_empty()
    }

    pub async fn search(&self, correlation_id: &str, query: &str) -> FusedResults {
        if self.providers.is_empty() {
            return FusedResults::default();
        }

        let arrival_counter = Arc::new(AtomicU64::new(0));
        let per_provider_budget = self.per_provider_budget;

        // Each leg is its own per-provider-timeout future; run them all
        // concurrently via `join_all` but race the whole join against the
        // aggregate budget so a slow minority never blocks the others'
        // already-collected results past that ceiling.
        let mut legs = futures_util::stream::FuturesUnordered::new();
        for provider in self.providers.iter().cloned() {
            let arrival_counter = arrival_counter.clone();
            let query = query.to_string();
            let correlation_id = correlation_id.to_string();
            legs.push(async move {
                let name = provider.name().to_string();
                let outcome = tokio::time::timeout(per_provider_budget, provider.search(&query)).await;
                match outcome {
                    Err(_) => {
                        TraceEvent::SearchProviderTimedOut {
                            correlation_id,
                            provider: name,
                            budget_ms: per_provider_budget.as_millis() as u64,
                        }
                        .emit();
                        None
                    }
                    Ok(Err(reason)) => {
                        TraceEvent::AdapterCallFailed {
                            correlation_id,
                            adapter: name,
                            reason: reason.to_string(),
                        }
                        .emit();
                        None
                    }
                    Ok(Ok(items)) => {
                        let arrival = arrival_counter.fetch_add(1, Ordering::SeqCst);
                        Some((name, provider.weight(), items, arrival))
                    }
                }
            });
        }

        let mut per_provider_results = Vec::new();
        let deadline = tokio::time::Instant::now() + self.aggregate_budget;
        loop {
            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            if remaining.is_zero() {
                break;
            }
            match tokio::time::timeout(remaining, legs.next()).await {
                Ok(Some(result)) => per_provider_results.push(result),
                Ok(None) => break, // all legs finished
                Err(_) => break,   // aggregate budget reached
            }
        }

        fuse(per_provider_results)
    }
}

fn fuse(per_provider_results: Vec<Option<(String, f32, Vec<SearchResultItem>, u64)>>) -> FusedResults {
    let mut by_key: HashMap<String, FusedItem> = HashMap::new();
    let mut order: HashMap<String, u64> = HashMap::new();
    let mut succeeded_providers = Vec::new();

    for entry in per_provider_results.into_iter().flatten() {
        let (provider_name, weight, items, arrival) = entry;
        succeeded_providers.push(provider_name.clone());
        for item in items {
            let key = canonicalize_key(&item.url, &item.title);
            let weighted = weight * item.score;
            order.entry(key.clone()).or_insert(arrival);
            by_key
                .entry(key)
                .and_modify(|existing| {
                    if weighted > existing.score {
                        existing.score = weighted;
                    }
                    if !existing.providers.contains(&provider_name) {
                        existing.providers.push(provider_name.clone());
                    }
                })
                .or_insert(FusedItem {
                    url: item.url,
                    title: item.title,
                    snippet: item.snippet,
                    score: weighted,
                    providers: vec![provider_name.clone()],
                });
        }
    }

    let mut items: Vec<FusedItem> = by_key.into_values().collect();
    items.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| {
                let ka = canonicalize_key(&a.url, &a.title);
                let kb = canonicalize_key(&b.url, &b.title);
                order.get(&ka).cmp(&order.get(&kb))
            })
    });

    FusedResults {
        items,
        succeeded_providers,
    }
}

fn canonicalize_key(url: &str, title: &str) -> String {
    let trimmed = url
        .trim()
        .trim_end_matches('/')
        .to_lowercase();
    if !trimmed.is_empty() {
        trimmed
    } else {
        title.trim().to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(url: &str, title: &str, score: f32) -> SearchResultItem {
        SearchResultItem {
            url: url.to_string(),
            title: title.to_string(),
            snippet: String::new(),
            score,
        }
    }

    #[test]
    fn fuse_deduplicates_by_canonicalized_url() {
        let results = vec![
            Some(("a".to_string(), 1.0, vec![item("https://x.com/page/", "X", 0.8)], 0)),
            Some(("b".to_string(), 1.0, vec![item("https://x.com/page", "X dup", 0.6)], 1)),
        ];
        let fused = fuse(results);
        assert_eq!(fused.items.len(), 1);
        assert_eq!(fused.items[0].providers.len(), 2);
    }

    #[test]
    fn fuse_orders_by_weighted_score_descending() {
        let results = vec![Some((
            "a".to_string(),
            1.0,
            vec![item("https://a", "A", 0.2), item("https://b", "B", 0.9)],
            0,
        ))];
        let fused = fuse(results);
        assert_eq!(fused.items[0].url, "https://b");
    }

    #[test]
    fn empty_providers_is_not_an_error() {
        let fused = fuse(vec![]);
        assert!(fused.items.is_empty());
    }
}
