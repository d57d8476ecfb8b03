use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionsConfig {
    pub max_turns: usize,
    pub idle_ttl_secs: u64,
    /// How many recent turns the classifier/synthesizer may read as
    /// conversational context (`max_history_turns` request option caps
    /// this further, per-call).
    pub default_context_turns: usize,
}

impl Default for SessionsConfig {
    fn default() -> Self {
        SessionsConfig {
            max_turns: 20,
            idle_ttl_secs: 3_600,
            default_context_turns: 3,
        }
    }
}
