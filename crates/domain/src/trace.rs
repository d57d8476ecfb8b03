use serde::Serialize;

/// Structured trace events emitted across all query-orchestrator crates.
///
/// Every stage boundary, fallback, cache hit/miss, and config fallback
/// emits one of these rather than an ad hoc log line, so per-stage timings
/// and cancellations can be reconstructed from the log stream alone.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event")]
pub enum TraceEvent {
    StageStarted {
        correlation_id: String,
        stage: String,
    },
    StageCompleted {
        correlation_id: String,
        stage: String,
        duration_ms: u64,
        outcome: String,
    },
    StageBudgetExceeded {
        correlation_id: String,
        stage: String,
        budget_ms: u64,
        elapsed_ms: u64,
    },
    RequestCancelled {
        correlation_id: String,
        stage: String,
    },
    ClassifierLlmParseFailed {
        correlation_id: String,
        reason: String,
    },
    CoreferenceResolved {
        correlation_id: String,
        entity_kind: String,
        resolved_intent: Option<String>,
    },
    IntentPromoted {
        correlation_id: String,
        from: String,
        to: String,
    },
    RouteFallback {
        correlation_id: String,
        from_intent: String,
        to_intent: String,
        reason: String,
    },
    AdapterCallFailed {
        correlation_id: String,
        adapter: String,
        reason: String,
    },
    CircuitBreakerOpened {
        provider: String,
        cooldown_ms: u64,
    },
    CircuitBreakerClosed {
        provider: String,
    },
    SearchProviderTimedOut {
        correlation_id: String,
        provider: String,
        budget_ms: u64,
    },
    LlmRequest {
        correlation_id: String,
        provider: String,
        model: String,
        tier: String,
        duration_ms: u64,
        prompt_tokens: Option<u32>,
        completion_tokens: Option<u32>,
    },
    LlmRetry {
        correlation_id: String,
        provider: String,
        attempt: u32,
        reason: String,
    },
    ValidationVerdict {
        correlation_id: String,
        verdict: String,
        reason: String,
    },
    CacheHit {
        correlation_id: String,
        key_prefix: String,
    },
    CacheMiss {
        correlation_id: String,
        key_prefix: String,
    },
    ConfigFallback {
        key: String,
        reason: String,
    },
    SessionEvicted {
        session_id: String,
        reason: String,
    },
}

impl TraceEvent {
    pub fn emit(&self) {
        let json = serde_json::to_string(self).unwrap_or_default();
        tracing::info!(trace_event = %json, "qo_event");
    }
}
