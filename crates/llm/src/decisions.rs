use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::VecDeque;

use crate::tiers::ModelTier;

/// A single routing decision record, kept for `/metrics` and a debug
/// endpoint; not evidence, not part of the response payload.
#[derive(Debug, Clone, Serialize)]
pub struct Decision {
    pub timestamp: DateTime<Utc>,
    pub correlation_id: String,
    pub tier: ModelTierLabel,
    pub model: String,
    pub latency_ms: u64,
}

/// `Serialize`-friendly mirror of `ModelTier` (the tier type itself stays
/// free of serde so `qo-llm`'s pure decision functions have no I/O
/// dependency).
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelTierLabel {
    Small,
    Medium,
    Large,
}

impl From<ModelTier> for ModelTierLabel {
    fn from(t: ModelTier) -> Self {
        match t {
            ModelTier::Small => ModelTierLabel::Small,
            ModelTier::Medium => ModelTierLabel::Medium,
            ModelTier::Large => ModelTierLabel::Large,
        }
    }
}

/// Thread-safe ring buffer of recent routing decisions.
pub struct DecisionLog {
    inner: Mutex<VecDeque<Decision>>,
    capacity: usize,
}

impl DecisionLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    pub fn record(&self, decision: Decision) {
        let mut buf = self.inner.lock();
        if buf.len() >= self.capacity {
            buf.pop_front();
        }
        buf.push_back(decision);
    }

    /// The `limit` most recent decisions, newest first.
    pub fn recent(&self, limit: usize) -> Vec<Decision> {
        let buf = self.inner.lock();
        buf.iter().rev().take(limit).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make(latency_ms: u64) -> Decision {
        Decision {
            timestamp: Utc::now(),
            correlation_id: "c1".into(),
            tier: ModelTierLabel::Small,
            model: "test-model".into(),
            latency_ms,
        }
    }

    #[test]
    fn ring_buffer_stores_up_to_capacity() {
        let log = DecisionLog::new(3);
        for i in 0..5 {
            log.record(make(i));
        }
        assert_eq!(log.recent(10).len(), 3);
    }

    #[test]
    fn recent_is_newest_first() {
        let log = DecisionLog::new(10);
        for i in 0..5 {
            log.record(make(i));
        }
        let recent = log.recent(5);
        assert_eq!(recent[0].latency_ms, 4);
        assert_eq!(recent[4].latency_ms, 0);
    }
}
