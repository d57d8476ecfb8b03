use serde::{Deserialize, Serialize};

/// A feature flag pulled from the admin control plane. A disabled flag
/// must never fail a request; it only shapes which branch the orchestrator
/// takes. `required` flags cannot be toggled off at runtime — the config
/// client treats an attempt to do so as a fetch anomaly, not a valid state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureFlag {
    pub id: i64,
    pub name: String,
    pub enabled: bool,
    pub required: bool,
}

impl FeatureFlag {
    /// Effective enabled state: a `required` flag is always treated as on,
    /// even if the control plane reports it disabled.
    pub fn effective(&self) -> bool {
        self.required || self.enabled
    }
}

/// Well-known flag names referenced directly by orchestrator stage logic.
pub mod names {
    pub const CONVERSATION_CONTEXT: &str = "conversation_context";
    pub const ENABLE_LLM_INTENT_CLASSIFICATION: &str = "enable_llm_intent_classification";
    pub const RESPONSE_CACHE: &str = "response_cache";
    pub const WEATHER_ADAPTER: &str = "weather_adapter";
    pub const SPORTS_ADAPTER: &str = "sports_adapter";
    pub const AIRPORTS_ADAPTER: &str = "airports_adapter";
}
