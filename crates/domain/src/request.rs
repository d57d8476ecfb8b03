use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::intent::{Entities, Intent};
use crate::source::Source;

/// A single chat message, the shape `POST /v1/chat/completions` expects in
/// its `messages` array. Only the final user message drives this call;
/// earlier entries are accepted for API compatibility but the session
/// store, not the request body, is the source of truth for history.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Message {
    pub role: String,
    pub content: String,
}

/// Recognized `metadata` options on the chat-completions request. Unknown
/// keys are ignored by the deserializer (`serde(default)` on every field).
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct RequestOptions {
    #[serde(default)]
    pub bypass_cache: bool,
    #[serde(default)]
    pub model_tier: Option<String>,
    #[serde(default)]
    pub trace: bool,
    #[serde(default)]
    pub max_history_turns: Option<u32>,
}

/// The ephemeral, per-call inbound request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Request {
    pub messages: Vec<Message>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub metadata: RequestOptions,
}

impl Request {
    /// The current user query: the content of the last `user` message.
    pub fn query(&self) -> &str {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == "user")
            .map(|m| m.content.as_str())
            .unwrap_or("")
    }
}

/// Explicit orchestrator states. Transitions move strictly forward; a
/// failure at any stage jumps directly to `Finalized` with a degraded
/// payload rather than to `Failed` — `Failed` is reserved for cases that
/// escape finalize entirely (see `qo_domain::error`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    New,
    Classified,
    Routed,
    Retrieved,
    Synthesized,
    Validated,
    Finalized,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Pass,
    FailUnsupported,
    FailUnsafe,
}

impl Verdict {
    pub fn passed(&self) -> bool {
        matches!(self, Verdict::Pass)
    }
}

/// Per-stage wall-clock timings, reported back in the HTTP response.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct Timings {
    pub classify_ms: u64,
    pub retrieve_ms: u64,
    pub synth_ms: u64,
    pub validate_ms: u64,
    pub total_ms: u64,
}

/// The state object threaded through the stage graph for one request.
/// Owned exclusively by the orchestrator for the lifetime of one `run()`
/// call; never shared across requests. Once `stage` reaches `Finalized` or
/// `Failed` the remaining fields must not be mutated further.
#[derive(Debug, Clone)]
pub struct RequestState {
    pub correlation_id: Uuid,
    pub session_id: String,
    pub normalized_query: String,
    pub stage: Stage,
    pub intent: Option<Intent>,
    pub confidence: f32,
    pub entities: Option<Entities>,
    pub sources: Vec<Source>,
    pub candidate_answer: Option<String>,
    pub verdict: Option<Verdict>,
    pub timings: Timings,
    pub errors: Vec<String>,
    pub degraded: bool,
}

impl RequestState {
    pub fn new(session_id: String, normalized_query: String) -> RequestState {
        RequestState {
            correlation_id: Uuid::new_v4(),
            session_id,
            normalized_query,
            stage: Stage::New,
            intent: None,
            confidence: 0.0,
            entities: None,
            sources: Vec::new(),
            candidate_answer: None,
            verdict: None,
            timings: Timings::default(),
            errors: Vec::new(),
            degraded: false,
        }
    }

    pub fn mark_degraded(&mut self, reason: impl Into<String>) {
        self.degraded = true;
        self.errors.push(reason.into());
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ChatChoice {
    pub message: Message,
}

/// The finalized response payload returned from `POST /v1/chat/completions`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ChatResponse {
    pub id: String,
    pub choices: Vec<ChatChoice>,
    pub session_id: String,
    pub sources: Vec<Source>,
    pub intent: Intent,
    pub confidence: f32,
    pub validated: bool,
    pub model_used: Option<String>,
    pub timings: Timings,
}

/// Normalizes a raw query for fingerprinting: lowercase, trimmed, internal
/// whitespace collapsed. Used by both the classifier and the cache key.
pub fn normalize_query(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, ToSchema)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub components: HealthComponents,
}

/// Per-collaborator liveness, nested so `components.adapters.weather`
/// resolves directly instead of a flattened `"adapter:weather"` key.
#[derive(Debug, Clone, Serialize, Deserialize, Default, ToSchema)]
pub struct HealthComponents {
    pub llm: bool,
    pub config: bool,
    pub cache: bool,
    pub adapters: HashMap<String, bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    #[default]
    Healthy,
    Degraded,
    Unhealthy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_query_collapses_whitespace_and_case() {
        assert_eq!(
            normalize_query("  What's the   Weather In Baltimore?  "),
            "what's the weather in baltimore?"
        );
    }

    #[test]
    fn query_picks_last_user_message() {
        let req = Request {
            messages: vec![
                Message {
                    role: "user".into(),
                    content: "first".into(),
                },
                Message {
                    role: "assistant".into(),
                    content: "reply".into(),
                },
                Message {
                    role: "user".into(),
                    content: "second".into(),
                },
            ],
            session_id: None,
            user_id: None,
            metadata: RequestOptions::default(),
        };
        assert_eq!(req.query(), "second");
    }
}
