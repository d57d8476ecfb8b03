use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Static tier-to-model mapping, loaded at startup. The config client may
/// override individual entries from the control plane's routing feed, but
/// this table is always the fallback of last resort.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub base_url: String,
    pub api_key_env: String,
    pub tier_models: HashMap<String, String>,
    pub request_timeout_ms: u64,
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        let mut tier_models = HashMap::new();
        tier_models.insert("small".to_string(), "gpt-4o-mini".to_string());
        tier_models.insert("medium".to_string(), "gpt-4o".to_string());
        tier_models.insert("large".to_string(), "gpt-4.1".to_string());
        LlmConfig {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key_env: "QO_LLM_API_KEY".to_string(),
            tier_models,
            request_timeout_ms: 20_000,
            max_retries: 1,
        }
    }
}
