use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A piece of retrieved evidence, used by the validator and surfaced as a
/// citation in the final response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Source {
    pub provider: String,
    pub kind: SourceKind,
    #[schema(value_type = Object)]
    pub payload: serde_json::Value,
    pub fetched_at: DateTime<Utc>,
    pub latency_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Rag,
    Websearch,
    LlmKnowledge,
}

impl Source {
    pub fn is_grounded(&self) -> bool {
        !matches!(self.kind, SourceKind::LlmKnowledge)
    }
}
