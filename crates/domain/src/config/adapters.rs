use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdapterEndpoint {
    pub base_url: String,
    pub timeout_ms: u64,
    /// Consecutive failures within the window before the breaker opens.
    pub breaker_threshold: u32,
    pub breaker_window_secs: u64,
    pub breaker_cooldown_secs: u64,
}

impl Default for AdapterEndpoint {
    fn default() -> Self {
        AdapterEndpoint {
            base_url: String::new(),
            timeout_ms: 10_000,
            breaker_threshold: 3,
            breaker_window_secs: 60,
            breaker_cooldown_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdaptersConfig {
    pub weather: AdapterEndpoint,
    pub sports: AdapterEndpoint,
    pub airports: AdapterEndpoint,
    pub websearch_providers: Vec<AdapterEndpoint>,
    /// Aggregate budget for the parallel search fan-out (spec §4.4).
    pub parallel_search_budget_ms: u64,
}

impl Default for AdaptersConfig {
    fn default() -> Self {
        AdaptersConfig {
            weather: AdapterEndpoint::default(),
            sports: AdapterEndpoint::default(),
            airports: AdapterEndpoint::default(),
            websearch_providers: Vec::new(),
            parallel_search_budget_ms: 15_000,
        }
    }
}
