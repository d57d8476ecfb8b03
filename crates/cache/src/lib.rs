//! Content-addressed cache of finalized responses. Checked on read for
//! TTL expiry; lazily swept on insert once the map grows past a size
//! threshold, the same opportunistic-sweep-on-access design the session
//! store uses for its own eviction.

pub mod key;

use std::time::{Duration, Instant};

use dashmap::DashMap;
use qo_domain::request::{ChatResponse, Verdict};
use qo_domain::source::Source;
use qo_domain::trace::TraceEvent;

pub use key::cache_key;

#[derive(Clone)]
pub struct CacheEntry {
    pub response: std::sync::Arc<ChatResponse>,
    pub verdict: Verdict,
    pub sources: Vec<Source>,
    inserted_at: Instant,
}

pub struct ResponseCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
    sweep_threshold: usize,
}

impl ResponseCache {
    pub fn new(ttl: Duration, sweep_threshold: usize) -> Self {
        ResponseCache {
            entries: DashMap::new(),
            ttl,
            sweep_threshold,
        }
    }

    pub fn get(&self, correlation_id: &str, key: &str) -> Option<CacheEntry> {
        let entry = self.entries.get(key)?;
        if entry.inserted_at.elapsed() > self.ttl {
            drop(entry);
            self.entries.remove(key);
            TraceEvent::CacheMiss {
                correlation_id: correlation_id.to_string(),
                key_prefix: key_prefix(key),
            }
            .emit();
            return None;
        }
        let cloned = entry.clone();
        TraceEvent::CacheHit {
            correlation_id: correlation_id.to_string(),
            key_prefix: key_prefix(key),
        }
        .emit();
        Some(cloned)
    }

    pub fn insert(&self, key: String, response: std::sync::Arc<ChatResponse>, verdict: Verdict, sources: Vec<Source>) {
        if self.entries.len() >= self.sweep_threshold {
            self.sweep_expired();
        }
        self.entries.insert(
            key,
            CacheEntry {
                response,
                verdict,
                sources,
                inserted_at: Instant::now(),
            },
        );
    }

    fn sweep_expired(&self) {
        let ttl = self.ttl;
        self.entries.retain(|_, v| v.inserted_at.elapsed() <= ttl);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn key_prefix(key: &str) -> String {
    key.chars().take(8).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use qo_domain::intent::Intent;
    use qo_domain::request::{ChatResponse, Timings};

    fn fake_response() -> std::sync::Arc<ChatResponse> {
        std::sync::Arc::new(ChatResponse {
            id: "r1".into(),
            choices: vec![],
            session_id: "s1".into(),
            sources: vec![],
            intent: Intent::Weather,
            confidence: 0.9,
            validated: true,
            model_used: Some("small-model".into()),
            timings: Timings::default(),
        })
    }

    #[test]
    fn insert_then_get_round_trips() {
        let cache = ResponseCache::new(Duration::from_secs(60), 1000);
        cache.insert("k1".into(), fake_response(), Verdict::Pass, vec![]);
        let entry = cache.get("c1", "k1");
        assert!(entry.is_some());
    }

    #[test]
    fn expired_entry_is_a_miss() {
        let cache = ResponseCache::new(Duration::from_millis(1), 1000);
        cache.insert("k1".into(), fake_response(), Verdict::Pass, vec![]);
        std::thread::sleep(Duration::from_millis(5));
        assert!(cache.get("c1", "k1").is_none());
    }

    #[test]
    fn missing_key_is_a_miss() {
        let cache = ResponseCache::new(Duration::from_secs(60), 1000);
        assert!(cache.get("c1", "missing").is_none());
    }
}
